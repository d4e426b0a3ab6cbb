// =============================================================================
// TRIANGLE - Minimal OpenGL renderer
// =============================================================================
//
// Opens one window, compiles one shader pair, uploads one triangle and draws
// it every frame until the window is closed.
//
// ARCHITECTURE OVERVIEW:
// ┌─────────────────────────────────────────────────────────────────┐
// │  winit EventLoop (windowing subsystem)                          │
// │    └── App (start-up failure, teardown, exit status)            │
// │          └── Session                                            │
// │                └── GlWindow (window + glutin context)           │
// │                      └── TriangleScene (program, VAO, VBO)      │
// └─────────────────────────────────────────────────────────────────┘
//
// FRAME FLOW:
// 1. Clear the color buffer
// 2. Use the program, bind the vertex array
// 3. Draw 3 vertices as a triangle list
// 4. Swap buffers, keep pumping events
//
// EXIT STATUS: 0 when the window is closed, -1 on any start-up failure.
//
// =============================================================================

mod app;
mod backend;
mod config;
mod error;
mod scene;
mod session;
mod vertex;

use app::{App, Subsystem};
use backend::{Gl, GlWindow, Platform};
use config::Config;
use error::StartupError;
use std::fs::OpenOptions;
use std::io::Write;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
};

const CONFIG_PATH: &str = "config.toml";

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() {
    // Load configuration from config.toml
    let (config, config_error) = match Config::load_from_path(CONFIG_PATH) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Initialize logging
    init_logging(&config);
    if let Some(e) = config_error {
        log::warn!("{:#}. Using defaults.", e);
    }
    log::debug!("Config: {:?}", config);

    let result = app::run(init_subsystem, config);
    if let Err(e) = &result {
        log::error!("{}", e);
    }

    // Everything has been dropped by now: GPU objects, window, event loop
    std::process::exit(app::exit_code(&result));
}

/// Bring up winit. No window exists yet.
fn init_subsystem() -> Result<EventLoop<()>, StartupError> {
    EventLoop::new()
        .map_err(|e| StartupError::SubsystemInit(e.to_string()))
}

/// Initialize logging, optionally writing to the configured log file
fn init_logging(config: &Config) {
    use env_logger::{Builder, Target};
    use log::LevelFilter;

    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info);
    builder.parse_default_env();

    // Create/clear log file if enabled
    if config.debug.log_to_file {
        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&config.debug.log_file)
        {
            Ok(mut file) => {
                let _ = writeln!(file, "=== Triangle Log ===");
                let _ = writeln!(file, "Started: {:?}", std::time::SystemTime::now());
                let _ = writeln!(file);
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                builder.init();
                log::warn!("Failed to open log file {:?}: {}", config.debug.log_file, e);
                return;
            }
        }
    }

    builder.init();
}

// =============================================================================
// EVENT HANDLING
// =============================================================================

impl Subsystem for EventLoop<()> {
    type Gl = Gl;
    type Window = GlWindow;

    fn run(self, app: &mut App<Gl, GlWindow>) -> Result<(), StartupError> {
        self.run_app(&mut WinitApp { app })
            .map_err(|e| StartupError::EventLoop(e.to_string()))
    }
}

/// Forwards winit callbacks to the lifecycle.
struct WinitApp<'a> {
    app: &'a mut App<Gl, GlWindow>,
}

impl ApplicationHandler for WinitApp<'_> {
    /// Called when the application is ready to create windows.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.resume(&Platform::new(event_loop)).is_break() {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down...");
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => self.app.redraw(),

            _ => {}
        }
    }

    /// Keep redrawing as fast as presentation allows.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.app.request_redraw();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.app.teardown();
    }
}
