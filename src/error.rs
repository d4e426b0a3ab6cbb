// Start-up errors
//
// Everything that can go wrong before the first frame. All of it is fatal:
// the error is logged once and the process exits with `EXIT_FAILURE`.

use thiserror::Error;

use crate::backend::shader::ShaderError;

/// Process exit status for any start-up failure.
pub const EXIT_FAILURE: i32 = -1;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to initialize the windowing subsystem: {0}")]
    SubsystemInit(String),

    #[error("Failed to create a window: {0}")]
    WindowCreation(String),

    #[error("Failed to create an OpenGL context: {0}")]
    ContextCreation(String),

    #[error("Failed to load OpenGL functions (missing: {0})")]
    FunctionLoader(String),

    #[error("Failed to upload triangle geometry: {0}")]
    Geometry(String),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("Event loop failed: {0}")]
    EventLoop(String),
}

impl StartupError {
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::shader::ShaderStage;

    #[test]
    fn every_failure_exits_with_minus_one() {
        let errors = [
            StartupError::SubsystemInit("no display".into()),
            StartupError::WindowCreation("no visual".into()),
            StartupError::ContextCreation("4.6 unsupported".into()),
            StartupError::FunctionLoader("glDrawArrays".into()),
            StartupError::Geometry("out of names".into()),
            StartupError::Shader(ShaderError::Link { log: "boom".into() }),
        ];
        for error in &errors {
            assert_eq!(error.exit_code(), -1, "{error}");
        }
    }

    #[test]
    fn shader_errors_keep_their_message() {
        let error: StartupError = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "0:3: syntax error".into(),
        }
        .into();
        let message = error.to_string();
        assert!(message.contains("fragment"));
        assert!(message.contains("syntax error"));
    }
}
