// =============================================================================
// APPLICATION LIFECYCLE - Subsystem up, session in, session out, subsystem down
// =============================================================================
//
// RUN:    init subsystem -> event loop { resume -> redraw* -> exiting }
// AFTER:  subsystem shut down -> result -> exit status
//
// Nothing here names winit. The event loop is reached through `Subsystem`,
// so every start-up and shutdown path can run without a display.

use std::ops::ControlFlow;

use crate::backend::gl::GlApi;
use crate::config::Config;
use crate::error::StartupError;
use crate::session::{Presenter, Session, WindowSystem};

/// Windowing subsystem that drives an `App` through its event loop.
pub trait Subsystem {
    type Gl: GlApi;
    type Window: Presenter;

    /// Run the event loop until it exits.
    ///
    /// Takes `self` so the subsystem is shut down by the time this returns.
    fn run(self, app: &mut App<Self::Gl, Self::Window>) -> Result<(), StartupError>;
}

/// Bring the subsystem up, run the app on it and report how it ended.
///
/// A failing `init` returns before any window is requested.
pub fn run<S, F>(init: F, config: Config) -> Result<(), StartupError>
where
    S: Subsystem,
    F: FnOnce() -> Result<S, StartupError>,
{
    let subsystem = init()?;
    log::debug!("Windowing subsystem initialized");

    let mut app = App::new(config);
    subsystem.run(&mut app)?;
    log::debug!("Windowing subsystem shut down");

    app.into_result()
}

/// Process exit status for the outcome of `run`.
pub fn exit_code(result: &Result<(), StartupError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => e.exit_code(),
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Owns the session between `resume` and `teardown`.
pub struct App<G: GlApi, W: Presenter> {
    config: Config,
    session: Option<Session<G, W>>,
    /// First start-up failure, reported once the event loop has returned.
    failure: Option<StartupError>,
}

impl<G: GlApi, W: Presenter> App<G, W> {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session: None,
            failure: None,
        }
    }

    /// Open the session the first time the platform is ready.
    ///
    /// `Break` means start-up failed and the event loop should exit.
    pub fn resume<S>(&mut self, system: &S) -> ControlFlow<()>
    where
        S: WindowSystem<Window = W, Gl = G>,
    {
        if self.failure.is_some() {
            return ControlFlow::Break(());
        }
        if self.session.is_some() {
            return ControlFlow::Continue(());
        }

        match Session::open(system, &self.config) {
            Ok(session) => {
                session.request_redraw();
                self.session = Some(session);
                ControlFlow::Continue(())
            }
            Err(e) => {
                self.failure = Some(e);
                ControlFlow::Break(())
            }
        }
    }

    pub fn redraw(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if let Err(e) = session.frame() {
                log::error!("Render error: {:?}", e);
            }
        }
    }

    pub fn request_redraw(&self) {
        if let Some(session) = &self.session {
            session.request_redraw();
        }
    }

    pub fn into_result(mut self) -> Result<(), StartupError> {
        self.teardown();
        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // =========================================================================
    // CLEANUP
    // =========================================================================

    /// GPU objects, then the window. The subsystem goes last, once
    /// `Subsystem::run` returns.
    pub fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            log::info!("Cleaning up...");
            session.close();
            log::info!("Cleanup complete");
        }
    }
}

impl<G: GlApi, W: Presenter> Drop for App<G, W> {
    fn drop(&mut self) {
        self.teardown();
    }
}
