// Recording GL and window system for tests
//
// Hands out sequential u32 names and logs every call so tests can assert on
// ordering without a GPU. A shared `Journal` lets GL deletes, window
// teardown and subsystem shutdown land in one timeline.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::gl::GlApi;
use crate::config::Config;
use crate::error::StartupError;
use crate::session::{Presenter, WindowSystem};
use crate::vertex::VertexAttribute;

pub type Journal = Rc<RefCell<Vec<String>>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader { shader: u32, kind: u32 },
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader { program: u32, shader: u32 },
    DetachShader { program: u32, shader: u32 },
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindBuffer { target: u32, buffer: Option<u32> },
    BufferData {
        target: u32,
        len: usize,
        usage: u32,
    },
    DeleteBuffer(u32),
    VertexAttribPointer {
        location: u32,
        components: i32,
        stride: i32,
        offset: i32,
    },
    EnableVertexAttribArray(u32),
    ClearColor([f32; 4]),
    Clear(u32),
    DrawArrays { mode: u32, first: i32, count: i32 },
}

pub struct FakeGl {
    calls: RefCell<Vec<Call>>,
    next_name: Cell<u32>,
    shader_kinds: RefCell<HashMap<u32, u32>>,
    uploaded: RefCell<Vec<u8>>,
    failing_stage: Option<u32>,
    failing_link: bool,
    failing_vertex_array: bool,
    context: (i32, i32, bool),
    journal: Option<Journal>,
}

impl FakeGl {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            next_name: Cell::new(1),
            shader_kinds: RefCell::new(HashMap::new()),
            uploaded: RefCell::new(Vec::new()),
            failing_stage: None,
            failing_link: false,
            failing_vertex_array: false,
            context: (4, 6, true),
            journal: None,
        }
    }

    /// Compiling a shader of `kind` reports failure.
    pub fn failing_compile(mut self, kind: u32) -> Self {
        self.failing_stage = Some(kind);
        self
    }

    pub fn failing_link(mut self) -> Self {
        self.failing_link = true;
        self
    }

    pub fn failing_vertex_array(mut self) -> Self {
        self.failing_vertex_array = true;
        self
    }

    pub fn with_context(mut self, major: i32, minor: i32, core: bool) -> Self {
        self.context = (major, minor, core);
        self
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn uploaded(&self) -> Vec<u8> {
        self.uploaded.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn note(&self, entry: String) {
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push(entry);
        }
    }

    fn name(&self) -> u32 {
        let name = self.next_name.get();
        self.next_name.set(name + 1);
        name
    }
}

impl GlApi for FakeGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;

    fn create_shader(&self, kind: u32) -> Result<u32, String> {
        let shader = self.name();
        self.shader_kinds.borrow_mut().insert(shader, kind);
        self.record(Call::CreateShader { shader, kind });
        Ok(shader)
    }

    fn shader_source(&self, shader: u32, _source: &str) {
        self.record(Call::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: u32) {
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        let kind = self.shader_kinds.borrow().get(&shader).copied();
        kind.is_none() || kind != self.failing_stage
    }

    fn shader_info_log(&self, shader: u32) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            "0:1: error: fake compile failure".to_string()
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        let program = self.name();
        self.record(Call::CreateProgram(program));
        Ok(program)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader { program, shader });
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(Call::DetachShader { program, shader });
    }

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, _program: u32) -> bool {
        !self.failing_link
    }

    fn program_info_log(&self, _program: u32) -> String {
        if self.failing_link {
            "error: fake link failure".to_string()
        } else {
            String::new()
        }
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
        self.note(format!("delete program {program}"));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        if self.failing_vertex_array {
            return Err("out of vertex array names".to_string());
        }
        let vertex_array = self.name();
        self.record(Call::CreateVertexArray(vertex_array));
        Ok(vertex_array)
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.record(Call::DeleteVertexArray(vertex_array));
        self.note(format!("delete vertex array {vertex_array}"));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let buffer = self.name();
        self.record(Call::CreateBuffer(buffer));
        Ok(buffer)
    }

    fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        self.record(Call::BindBuffer { target, buffer });
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        *self.uploaded.borrow_mut() = data.to_vec();
        self.record(Call::BufferData {
            target,
            len: data.len(),
            usage,
        });
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(Call::DeleteBuffer(buffer));
        self.note(format!("delete buffer {buffer}"));
    }

    fn vertex_attrib_pointer_f32(&self, attribute: &VertexAttribute, stride: i32) {
        self.record(Call::VertexAttribPointer {
            location: attribute.location,
            components: attribute.components,
            stride,
            offset: attribute.offset,
        });
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(Call::EnableVertexAttribArray(location));
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.record(Call::ClearColor(rgba));
    }

    fn clear(&self, mask: u32) {
        self.record(Call::Clear(mask));
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.record(Call::DrawArrays { mode, first, count });
    }

    fn get_parameter_string(&self, parameter: u32) -> String {
        match parameter {
            glow::VERSION => format!("{}.{}.0 Fake", self.context.0, self.context.1),
            glow::RENDERER => "FakeGL".to_string(),
            _ => String::new(),
        }
    }

    fn get_parameter_i32(&self, parameter: u32) -> i32 {
        match parameter {
            glow::MAJOR_VERSION => self.context.0,
            glow::MINOR_VERSION => self.context.1,
            glow::CONTEXT_PROFILE_MASK if self.context.2 => glow::CONTEXT_CORE_PROFILE_BIT as i32,
            glow::CONTEXT_PROFILE_MASK => glow::CONTEXT_COMPATIBILITY_PROFILE_BIT as i32,
            _ => 0,
        }
    }
}

// =============================================================================
// WINDOW SYSTEM
// =============================================================================

pub struct FakeWindow {
    journal: Journal,
    presented: Rc<Cell<u32>>,
    pub title: RefCell<String>,
}

impl Presenter for FakeWindow {
    fn present(&self) -> anyhow::Result<()> {
        self.presented.set(self.presented.get() + 1);
        Ok(())
    }

    fn request_redraw(&self) {}

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }
}

impl Drop for FakeWindow {
    fn drop(&mut self) {
        self.journal.borrow_mut().push("destroy window".to_string());
    }
}

/// Window system whose start-up steps land in `journal`.
#[derive(Default)]
pub struct FakeSystem {
    pub journal: Journal,
    pub presented: Rc<Cell<u32>>,
    pub fail_window: bool,
    pub fail_load: bool,
    pub fail_compile: bool,
}

impl FakeSystem {
    pub fn entries(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }
}

impl WindowSystem for FakeSystem {
    type Window = FakeWindow;
    type Gl = FakeGl;

    fn create_window(&self, _config: &Config) -> Result<FakeWindow, StartupError> {
        self.journal.borrow_mut().push("create window".to_string());
        if self.fail_window {
            return Err(StartupError::WindowCreation("no visual".to_string()));
        }
        Ok(FakeWindow {
            journal: self.journal.clone(),
            presented: self.presented.clone(),
            title: RefCell::new(String::new()),
        })
    }

    fn load_functions(&self, _window: &FakeWindow) -> Result<FakeGl, StartupError> {
        self.journal.borrow_mut().push("load functions".to_string());
        if self.fail_load {
            return Err(StartupError::FunctionLoader("glGetString".to_string()));
        }
        let gl = FakeGl::new().with_journal(self.journal.clone());
        if self.fail_compile {
            Ok(gl.failing_compile(glow::FRAGMENT_SHADER))
        } else {
            Ok(gl)
        }
    }
}
