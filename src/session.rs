// =============================================================================
// SESSION - One window, one context, one scene
// =============================================================================
//
// START-UP:  create window -> load GL functions -> upload + compile
// FRAME:     scene.draw() -> present
// TEARDOWN:  GPU objects -> window/context
//
// The windowing subsystem (the event loop) outlives the session and shuts
// down after it.

use std::rc::Rc;
use std::time::Instant;

use crate::backend::gl::{ContextInfo, GlApi};
use crate::config::Config;
use crate::error::StartupError;
use crate::scene::TriangleScene;

/// A window that can show finished frames.
pub trait Presenter {
    /// Swap the back buffer to the screen.
    fn present(&self) -> anyhow::Result<()>;
    fn request_redraw(&self);
    fn set_title(&self, title: &str);
}

/// Platform side of start-up.
pub trait WindowSystem {
    type Window: Presenter;
    type Gl: GlApi;

    fn create_window(&self, config: &Config) -> Result<Self::Window, StartupError>;
    fn load_functions(&self, window: &Self::Window) -> Result<Self::Gl, StartupError>;
}

pub struct Session<G: GlApi, W: Presenter> {
    scene: Option<TriangleScene<G>>,
    window: Option<W>,
    fps: Option<FpsCounter>,
    title: String,
}

impl<G: GlApi, W: Presenter> Session<G, W> {
    /// Run start-up in order, stopping at the first failure.
    pub fn open<S>(system: &S, config: &Config) -> Result<Self, StartupError>
    where
        S: WindowSystem<Window = W, Gl = G>,
    {
        let window = system.create_window(config)?;
        let gl = Rc::new(system.load_functions(&window)?);

        let info = ContextInfo::query(&*gl);
        log::info!("{}", info);
        if !info.satisfies(config.gl.major, config.gl.minor) {
            let profile = if info.core_profile {
                "core"
            } else {
                "not core"
            };
            log::warn!(
                "Requested OpenGL {}.{} core, driver reports {}.{} ({})",
                config.gl.major,
                config.gl.minor,
                info.major,
                info.minor,
                profile
            );
        }

        let scene = TriangleScene::new(gl, config)?;
        log::info!("Session ready");

        Ok(Self {
            scene: Some(scene),
            window: Some(window),
            fps: config.debug.show_fps.then(|| FpsCounter::new(Instant::now())),
            title: config.window.title.clone(),
        })
    }

    /// Draw and present one frame.
    pub fn frame(&mut self) -> anyhow::Result<()> {
        let (Some(scene), Some(window)) = (&self.scene, &self.window) else {
            return Ok(());
        };

        scene.draw();
        window.present()?;

        if let Some(rate) = self.fps.as_mut().and_then(|fps| fps.tick(Instant::now())) {
            window.set_title(&format!("{} - {}", self.title, rate));
        }

        Ok(())
    }

    pub fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Release GPU objects, then the window. Idempotent.
    pub fn close(&mut self) {
        if self.scene.take().is_some() {
            log::info!("Released GPU objects");
        }
        if self.window.take().is_some() {
            log::info!("Closed window");
        }
    }
}

impl<G: GlApi, W: Presenter> Drop for Session<G, W> {
    fn drop(&mut self) {
        self.close();
    }
}

// =============================================================================
// FPS TRACKING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRate {
    pub fps: f32,
    pub frame_ms: f32,
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0} FPS ({:.2}ms)", self.fps, self.frame_ms)
    }
}

/// Counts frames and reports a rate about once per second.
pub struct FpsCounter {
    frame_count: u32,
    last_update: Instant,
    last_frame: Instant,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            frame_count: 0,
            last_update: now,
            last_frame: now,
        }
    }

    pub fn tick(&mut self, now: Instant) -> Option<FrameRate> {
        let frame_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let elapsed = now.duration_since(self.last_update).as_secs_f32();
        if elapsed < 1.0 {
            return None;
        }

        let rate = FrameRate {
            fps: self.frame_count as f32 / elapsed,
            frame_ms: frame_time * 1000.0,
        };
        self.frame_count = 0;
        self.last_update = now;
        Some(rate)
    }
}
