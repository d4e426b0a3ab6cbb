// Window + OpenGL context
//
// Responsibilities:
// - Create the winit window, then a GL config compatible with it
// - Create a core-profile context of the requested version
// - Make it current on a window surface
// - Resolve GL functions through the display
//
// Drop order of the fields is surface/context first, then the window.

use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{Display, DisplayApiPreference, GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::GlWindow as _;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawWindowHandle};
use std::num::NonZeroU32;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use super::gl::Gl;
use crate::config::Config;
use crate::error::StartupError;
use crate::session::{Presenter, WindowSystem};

/// The one window and its current GL context.
pub struct GlWindow {
    // Field order matters for Drop: surface and context go before the window
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl GlWindow {
    /// Open the window and make a fresh GL context current on it.
    pub fn open(event_loop: &ActiveEventLoop, config: &Config) -> Result<Self, StartupError> {
        let size = PhysicalSize::new(config.window.width, config.window.height);
        let attributes = WindowAttributes::default()
            .with_title(&config.window.title)
            .with_inner_size(size)
            .with_resizable(false);

        log::info!(
            "Creating window: {}x{} \"{}\"",
            config.window.width,
            config.window.height,
            config.window.title
        );

        // ─────────────────────────────────────────────────────────────────────
        // STEP 1: Window
        // ─────────────────────────────────────────────────────────────────────
        let window = event_loop
            .create_window(attributes)
            .map_err(|e| StartupError::WindowCreation(e.to_string()))?;
        let raw_window_handle = window
            .window_handle()
            .map_err(|e| StartupError::WindowCreation(e.to_string()))?
            .as_raw();

        // ─────────────────────────────────────────────────────────────────────
        // STEP 2: GL display + a framebuffer config the window can use
        // ─────────────────────────────────────────────────────────────────────
        let raw_display_handle = event_loop
            .display_handle()
            .map_err(|e| StartupError::WindowCreation(e.to_string()))?
            .as_raw();
        let preference = display_preference(raw_window_handle);
        // SAFETY: the display handle belongs to the running event loop
        let display = unsafe { Display::new(raw_display_handle, preference) }
            .map_err(|e| StartupError::ContextCreation(e.to_string()))?;

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(0)
            .compatible_with_native_window(raw_window_handle)
            .build();
        // SAFETY: the template's native window is alive for this whole call
        let configs = unsafe { display.find_configs(template) }
            .map_err(|e| StartupError::WindowCreation(e.to_string()))?;
        let gl_config = pick_config(configs, |candidate| candidate.num_samples())?;
        log::debug!("Framebuffer config: {} samples", gl_config.num_samples());

        // ─────────────────────────────────────────────────────────────────────
        // STEP 3: Core-profile context of the requested version
        // ─────────────────────────────────────────────────────────────────────
        let version = Version::new(config.gl.major, config.gl.minor);
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(version)))
            .build(Some(raw_window_handle));

        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| {
                StartupError::ContextCreation(format!(
                    "OpenGL {}.{} core: {}",
                    config.gl.major, config.gl.minor, e
                ))
            })?;

        // ─────────────────────────────────────────────────────────────────────
        // STEP 4: Window surface, then make current
        // ─────────────────────────────────────────────────────────────────────
        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .map_err(|e| StartupError::ContextCreation(e.to_string()))?;
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|e| StartupError::ContextCreation(e.to_string()))?;
        let context = not_current
            .make_current(&surface)
            .map_err(|e| StartupError::ContextCreation(e.to_string()))?;

        let interval = if config.graphics.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            log::warn!("Failed to set swap interval: {}", e);
        }

        Ok(Self {
            surface,
            context,
            window,
        })
    }

    /// Resolve GL entry points for this window's context.
    pub fn load_gl(&self) -> Result<Gl, StartupError> {
        let display = self.context.display();
        // SAFETY: `context` was made current in `open` and stays current until
        // this `GlWindow` drops, which the session orders after every GL object.
        unsafe { Gl::load(|symbol| display.get_proc_address(symbol)) }
    }
}

impl Presenter for GlWindow {
    fn present(&self) -> anyhow::Result<()> {
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }

    fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

impl Drop for GlWindow {
    fn drop(&mut self) {
        log::info!("Destroying window");
    }
}

/// winit + glutin, borrowed for the duration of one `resumed` callback.
pub struct Platform<'a> {
    event_loop: &'a ActiveEventLoop,
}

impl<'a> Platform<'a> {
    pub fn new(event_loop: &'a ActiveEventLoop) -> Self {
        Self { event_loop }
    }
}

impl WindowSystem for Platform<'_> {
    type Window = GlWindow;
    type Gl = Gl;

    fn create_window(&self, config: &Config) -> Result<GlWindow, StartupError> {
        GlWindow::open(self.event_loop, config)
    }

    fn load_functions(&self, window: &GlWindow) -> Result<Gl, StartupError> {
        window.load_gl()
    }
}

/// GL display API for this platform.
#[cfg(target_os = "windows")]
fn display_preference(window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Wgl(Some(window))
}

#[cfg(target_os = "macos")]
fn display_preference(_window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Cgl
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn display_preference(_window: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Egl
}

/// Pick the candidate with the most samples, the first one on ties.
///
/// The platform may filter every config out for the window's visual, so an
/// empty list is a start-up failure like any other.
fn pick_config<C>(
    candidates: impl Iterator<Item = C>,
    samples: impl Fn(&C) -> u8,
) -> Result<C, StartupError> {
    candidates
        .reduce(|best, candidate| {
            if samples(&candidate) > samples(&best) {
                candidate
            } else {
                best
            }
        })
        .ok_or_else(|| {
            StartupError::WindowCreation("no framebuffer config matches the window".to_string())
        })
}
