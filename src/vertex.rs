// =============================================================================
// VERTEX DATA - The one hardcoded triangle and its memory layout
// =============================================================================
//
// Each vertex is 6 contiguous f32s: position (xyz) followed by color (rgb).
//
//   byte:   0        12        24
//           ├─ pos ──┼─ color ─┤
//           └──── stride 24 ───┘

use glam::Vec3;
use std::mem::{offset_of, size_of};

/// Interleaved position + color vertex, laid out exactly as the GPU reads it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Vec3,
}

impl Vertex {
    pub const fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }

    /// Attribute layout matching `layout (location = N)` in `triangle.vert`.
    pub fn layout() -> VertexLayout {
        VertexLayout {
            stride: size_of::<Vertex>() as i32,
            attributes: [
                // location 0: aPos
                VertexAttribute {
                    location: 0,
                    components: 3,
                    offset: offset_of!(Vertex, position) as i32,
                },
                // location 1: aColor
                VertexAttribute {
                    location: 1,
                    components: 3,
                    offset: offset_of!(Vertex, color) as i32,
                },
            ],
        }
    }
}

/// Bottom-left red, bottom-right green, top blue.
pub const TRIANGLE: [Vertex; 3] = [
    Vertex::new(Vec3::new(-0.5, -0.5, 0.0), Vec3::new(1.0, 0.0, 0.0)),
    Vertex::new(Vec3::new(0.5, -0.5, 0.0), Vec3::new(0.0, 1.0, 0.0)),
    Vertex::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, 0.0, 1.0)),
];

/// One float attribute read out of the vertex buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input slot.
    pub location: u32,
    /// Number of f32 components.
    pub components: i32,
    /// Byte offset from the start of a vertex.
    pub offset: i32,
}

/// Byte stride plus the attributes sharing it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: i32,
    pub attributes: [VertexAttribute; 2],
}
