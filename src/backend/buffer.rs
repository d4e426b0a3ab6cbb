// Vertex buffer + vertex array for the triangle
//
// One buffer object holds the raw vertex bytes; one vertex array object
// records how those bytes feed shader inputs 0 and 1. Both are uploaded
// once and never touched again until drop.

use std::rc::Rc;

use super::gl::GlApi;
use super::shader::ActiveProgram;
use crate::error::StartupError;
use crate::vertex::Vertex;

/// GPU copy of a fixed vertex list.
pub struct TriangleGeometry<G: GlApi> {
    gl: Rc<G>,
    vertex_array: G::VertexArray,
    buffer: G::Buffer,
    vertex_count: i32,
}

impl<G: GlApi> TriangleGeometry<G> {
    /// Create the vertex array and buffer, upload `vertices` as static data
    /// and describe the attribute layout.
    pub fn upload(gl: Rc<G>, vertices: &[Vertex]) -> Result<Self, StartupError> {
        let vertex_array = gl.create_vertex_array().map_err(StartupError::Geometry)?;
        let buffer = match gl.create_buffer() {
            Ok(buffer) => buffer,
            Err(e) => {
                gl.delete_vertex_array(vertex_array);
                return Err(StartupError::Geometry(e));
            }
        };

        gl.bind_vertex_array(Some(vertex_array));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
        gl.buffer_data(glow::ARRAY_BUFFER, bytemuck::cast_slice(vertices), glow::STATIC_DRAW);

        let layout = Vertex::layout();
        for attribute in &layout.attributes {
            gl.vertex_attrib_pointer_f32(attribute, layout.stride);
            gl.enable_vertex_attrib_array(attribute.location);
        }

        log::info!(
            "Uploaded {} vertices ({} bytes, stride {})",
            vertices.len(),
            std::mem::size_of_val(vertices),
            layout.stride
        );

        Ok(Self {
            gl,
            vertex_array,
            buffer,
            vertex_count: vertices.len() as i32,
        })
    }

    /// Bind the vertex array under an active program.
    pub fn bind<'a>(&'a self, program: &'a ActiveProgram<'a, G>) -> BoundGeometry<'a, G> {
        program.gl().bind_vertex_array(Some(self.vertex_array));
        BoundGeometry { geometry: self }
    }
}

impl<G: GlApi> Drop for TriangleGeometry<G> {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.vertex_array);
        self.gl.delete_buffer(self.buffer);
        log::debug!("Released vertex array and buffer");
    }
}

/// Program active + vertex array bound: the only state a draw accepts.
pub struct BoundGeometry<'a, G: GlApi> {
    geometry: &'a TriangleGeometry<G>,
}

impl<G: GlApi> BoundGeometry<'_, G> {
    /// Single draw of every vertex as a triangle list.
    pub fn draw_triangles(&self) {
        self.geometry
            .gl
            .draw_arrays(glow::TRIANGLES, 0, self.geometry.vertex_count);
    }
}
