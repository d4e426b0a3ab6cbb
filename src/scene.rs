// =============================================================================
// TRIANGLE SCENE - Everything that lives on the GPU
// =============================================================================
//
// Owns the geometry and the program. Drawing goes through the type chain
//
//   ShaderProgram::activate -> TriangleGeometry::bind -> draw_triangles
//
// so a draw cannot be issued without both binds happening first.

use std::rc::Rc;

use crate::backend::buffer::TriangleGeometry;
use crate::backend::gl::GlApi;
use crate::backend::shader::ShaderProgram;
use crate::config::Config;
use crate::error::StartupError;
use crate::vertex::TRIANGLE;

pub struct TriangleScene<G: GlApi> {
    // Dropped top to bottom: vertex array + buffer, then program
    geometry: TriangleGeometry<G>,
    program: ShaderProgram<G>,
    gl: Rc<G>,
}

impl<G: GlApi> TriangleScene<G> {
    /// Upload the triangle, build the program and set the clear color.
    pub fn new(gl: Rc<G>, config: &Config) -> Result<Self, StartupError> {
        let geometry = TriangleGeometry::upload(gl.clone(), &TRIANGLE)?;
        let program = ShaderProgram::triangle(gl.clone(), config.shaders.strict)?;

        gl.clear_color(config.graphics.clear_color);

        Ok(Self {
            geometry,
            program,
            gl,
        })
    }

    /// Record one frame: clear, bind, one draw call.
    pub fn draw(&self) {
        self.gl.clear(glow::COLOR_BUFFER_BIT);

        let program = self.program.activate();
        let geometry = self.geometry.bind(&program);
        geometry.draw_triangles();
    }
}
