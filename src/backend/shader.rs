// Shader compilation and program linking
//
// GLSL is compiled by the driver at start-up. Stage objects only live long
// enough to be linked; the linked program is the one thing kept around.
//
// STAGE:   created -> source set -> compiled -> attached -> released
// PROGRAM: created -> stages attached -> linked -> active (per frame)

use std::fmt;
use std::rc::Rc;
use thiserror::Error;

use super::gl::GlApi;

/// Per-vertex color passthrough.
pub const VERTEX_SOURCE: &str = include_str!("../../shaders/triangle.vert");
/// Writes the interpolated color.
pub const FRAGMENT_SOURCE: &str = include_str!("../../shaders/triangle.frag");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_kind(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Failed to create {what}: {reason}")]
    CreateObject { what: &'static str, reason: String },

    #[error("Failed to compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("Failed to link shader program: {log}")]
    Link { log: String },
}

/// A compiled stage. Deleted on drop, which after linking only flags it:
/// the driver keeps the code alive inside the program.
struct Stage<'gl, G: GlApi> {
    gl: &'gl G,
    stage: ShaderStage,
    shader: G::Shader,
}

impl<'gl, G: GlApi> Stage<'gl, G> {
    fn compile(
        gl: &'gl G,
        stage: ShaderStage,
        source: &str,
        strict: bool,
    ) -> Result<Self, ShaderError> {
        let shader = gl
            .create_shader(stage.gl_kind())
            .map_err(|reason| ShaderError::CreateObject {
                what: "shader object",
                reason,
            })?;
        let compiled = Self { gl, stage, shader };

        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.shader_compile_status(shader) {
            let error = ShaderError::Compile {
                stage,
                log: gl.shader_info_log(shader),
            };
            if strict {
                return Err(error);
            }
            log::warn!("{} (continuing)", error);
        }

        log::debug!("Compiled {} shader", stage);
        Ok(compiled)
    }
}

impl<G: GlApi> Drop for Stage<'_, G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.shader);
        log::trace!("Released {} shader", self.stage);
    }
}

/// Linked vertex + fragment program.
pub struct ShaderProgram<G: GlApi> {
    gl: Rc<G>,
    program: G::Program,
}

impl<G: GlApi> ShaderProgram<G> {
    /// Compile both stages, link them and release the stage objects.
    ///
    /// With `strict` set, any compile or link failure is returned. Without
    /// it, failures are only logged and the (possibly broken) program is
    /// returned anyway.
    pub fn build(
        gl: Rc<G>,
        vertex_source: &str,
        fragment_source: &str,
        strict: bool,
    ) -> Result<Self, ShaderError> {
        let vertex = Stage::compile(&*gl, ShaderStage::Vertex, vertex_source, strict)?;
        let fragment = Stage::compile(&*gl, ShaderStage::Fragment, fragment_source, strict)?;

        let program = gl
            .create_program()
            .map_err(|reason| ShaderError::CreateObject {
                what: "program object",
                reason,
            })?;

        gl.attach_shader(program, vertex.shader);
        gl.attach_shader(program, fragment.shader);
        gl.link_program(program);

        let linked = gl.program_link_status(program);
        let log = if linked {
            String::new()
        } else {
            gl.program_info_log(program)
        };

        // Stages are not needed once the link has happened, successful or not
        gl.detach_shader(program, vertex.shader);
        gl.detach_shader(program, fragment.shader);
        drop(vertex);
        drop(fragment);

        let program = Self {
            gl: gl.clone(),
            program,
        };

        if !linked {
            let error = ShaderError::Link { log };
            if strict {
                return Err(error);
            }
            log::warn!("{} (continuing)", error);
        }

        log::info!("Shader program linked");
        Ok(program)
    }

    /// Built-in triangle shaders.
    pub fn triangle(gl: Rc<G>, strict: bool) -> Result<Self, ShaderError> {
        Self::build(gl, VERTEX_SOURCE, FRAGMENT_SOURCE, strict)
    }

    /// Make this the current program. Drawing requires the returned token.
    pub fn activate(&self) -> ActiveProgram<'_, G> {
        self.gl.use_program(Some(self.program));
        ActiveProgram { program: self }
    }
}

impl<G: GlApi> Drop for ShaderProgram<G> {
    fn drop(&mut self) {
        self.gl.delete_program(self.program);
        log::debug!("Released shader program");
    }
}

/// Proof that a program has been made current this frame.
pub struct ActiveProgram<'a, G: GlApi> {
    program: &'a ShaderProgram<G>,
}

impl<G: GlApi> ActiveProgram<'_, G> {
    pub(crate) fn gl(&self) -> &G {
        &self.program.gl
    }
}
