// Backend module - OpenGL abstraction layer
//
// Design: thin owned wrappers over glow; every GL object has exactly one
// owner and is released by Drop.

pub mod buffer;
#[cfg(test)]
pub mod fake;
pub mod gl;
pub mod shader;
pub mod window;

pub use gl::Gl;
pub use window::{GlWindow, Platform};
