// OpenGL entry points used by the renderer
//
// Design: the renderer only ever talks to `GlApi`, a thin slice of
// `glow::HasContext`. The real implementation is `Gl` (glow over the
// current glutin context); tests swap in a recording fake.

use glow::HasContext;
use std::ffi::{c_void, CStr, CString};
use std::fmt;

use crate::error::StartupError;
use crate::vertex::VertexAttribute;

/// Symbols that must resolve before glow is allowed to load the rest.
/// glow itself reads GL_VERSION while loading, so a missing `glGetString`
/// has to be caught here.
pub const REQUIRED_SYMBOLS: &[&str] = &[
    "glGetString",
    "glGetIntegerv",
    "glCreateShader",
    "glCreateProgram",
    "glGenBuffers",
    "glGenVertexArrays",
    "glClear",
    "glDrawArrays",
];

/// The GL calls the triangle needs, nothing more.
///
/// Every method assumes the implementor's context is current on this thread.
pub trait GlApi {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type VertexArray: Copy + fmt::Debug;

    // Shaders
    fn create_shader(&self, kind: u32) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    // Programs
    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    // Geometry
    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn vertex_attrib_pointer_f32(&self, attribute: &VertexAttribute, stride: i32);
    fn enable_vertex_attrib_array(&self, location: u32);

    // Frame
    fn clear_color(&self, rgba: [f32; 4]);
    fn clear(&self, mask: u32);
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);

    // Queries
    fn get_parameter_string(&self, parameter: u32) -> String;
    fn get_parameter_i32(&self, parameter: u32) -> i32;
}

// =============================================================================
// GLOW IMPLEMENTATION
// =============================================================================

/// glow context bound to the window's current GL context.
pub struct Gl {
    inner: glow::Context,
}

impl Gl {
    /// Resolve all GL function pointers through `loader`.
    ///
    /// # Safety
    /// The context the loader belongs to must be current on this thread and
    /// must stay current for as long as the returned `Gl` is used.
    pub unsafe fn load<F>(mut loader: F) -> Result<Self, StartupError>
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        let missing = missing_symbols(&mut loader);
        if !missing.is_empty() {
            return Err(StartupError::FunctionLoader(missing.join(", ")));
        }

        let inner = glow::Context::from_loader_function_cstr(|symbol| loader(symbol));
        log::debug!("Loaded OpenGL functions");
        Ok(Self { inner })
    }
}

/// Names from `REQUIRED_SYMBOLS` that `loader` cannot resolve.
pub fn missing_symbols<F>(loader: &mut F) -> Vec<&'static str>
where
    F: FnMut(&CStr) -> *const c_void,
{
    REQUIRED_SYMBOLS
        .iter()
        .copied()
        .filter(|name| match CString::new(*name) {
            Ok(symbol) => loader(&symbol).is_null(),
            Err(_) => true,
        })
        .collect()
}

// SAFETY (all methods): `Gl` is only constructed through `Gl::load`, whose
// contract keeps the context current while the wrapper is alive.
impl GlApi for Gl {
    type Shader = glow::NativeShader;
    type Program = glow::NativeProgram;
    type Buffer = glow::NativeBuffer;
    type VertexArray = glow::NativeVertexArray;

    fn create_shader(&self, kind: u32) -> Result<Self::Shader, String> {
        unsafe { self.inner.create_shader(kind) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.inner.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.inner.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.inner.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.inner.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.inner.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.inner.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.inner.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.inner.detach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.inner.link_program(program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.inner.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.inner.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.inner.use_program(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.inner.delete_program(program) }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { self.inner.create_vertex_array() }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { self.inner.bind_vertex_array(vertex_array) }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { self.inner.delete_vertex_array(vertex_array) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { self.inner.create_buffer() }
    }

    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>) {
        unsafe { self.inner.bind_buffer(target, buffer) }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.inner.buffer_data_u8_slice(target, data, usage) }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.inner.delete_buffer(buffer) }
    }

    fn vertex_attrib_pointer_f32(&self, attribute: &VertexAttribute, stride: i32) {
        unsafe {
            self.inner.vertex_attrib_pointer_f32(
                attribute.location,
                attribute.components,
                glow::FLOAT,
                false,
                stride,
                attribute.offset,
            )
        }
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        unsafe { self.inner.enable_vertex_attrib_array(location) }
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        let [r, g, b, a] = rgba;
        unsafe { self.inner.clear_color(r, g, b, a) }
    }

    fn clear(&self, mask: u32) {
        unsafe { self.inner.clear(mask) }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe { self.inner.draw_arrays(mode, first, count) }
    }

    fn get_parameter_string(&self, parameter: u32) -> String {
        unsafe { self.inner.get_parameter_string(parameter) }
    }

    fn get_parameter_i32(&self, parameter: u32) -> i32 {
        unsafe { self.inner.get_parameter_i32(parameter) }
    }
}

// =============================================================================
// CONTEXT INFO
// =============================================================================

/// What the driver reports about the context we ended up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInfo {
    pub version: String,
    pub renderer: String,
    pub major: i32,
    pub minor: i32,
    pub core_profile: bool,
}

impl ContextInfo {
    pub fn query<G: GlApi>(gl: &G) -> Self {
        let profile_mask = gl.get_parameter_i32(glow::CONTEXT_PROFILE_MASK) as u32;
        Self {
            version: gl.get_parameter_string(glow::VERSION),
            renderer: gl.get_parameter_string(glow::RENDERER),
            major: gl.get_parameter_i32(glow::MAJOR_VERSION),
            minor: gl.get_parameter_i32(glow::MINOR_VERSION),
            core_profile: profile_mask & glow::CONTEXT_CORE_PROFILE_BIT != 0,
        }
    }

    /// True when the context is a core profile of at least `major.minor`.
    pub fn satisfies(&self, major: u8, minor: u8) -> bool {
        self.core_profile && (self.major, self.minor) >= (i32::from(major), i32::from(minor))
    }
}

impl fmt::Display for ContextInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = if self.core_profile {
            "core"
        } else {
            "compatibility"
        };
        write!(
            f,
            "OpenGL {}.{} {} ({}) on {}",
            self.major, self.minor, profile, self.version, self.renderer
        )
    }
}
