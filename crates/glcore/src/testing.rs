//! Recording [`GlApi`] fake backing the unit tests.
//!
//! Hands out sequential handles, records every call as a tagged line, and
//! can be told to fail creation, compilation, or linking. Reflection serves
//! whatever property records the test pushed into `reflected`.

use std::cell::{Cell, RefCell};

use crate::api::{
    BufferTarget, DeviceInfo, GlApi, RawHandle, ShaderStage, UniformProps, NULL_HANDLE,
};

pub(crate) struct RecordingGl {
    next_handle: Cell<RawHandle>,
    calls: RefCell<Vec<String>>,
    /// Fail the next create_* call with a null handle.
    pub fail_next_create: Cell<bool>,
    /// Report compile failures for every shader.
    pub fail_compile: Cell<bool>,
    /// Report link failures for every program.
    pub fail_link: Cell<bool>,
    /// Uniform property records served by reflection, in index order.
    pub reflected: RefCell<Vec<UniformProps>>,
}

impl RecordingGl {
    pub const BINARY_FORMAT: u32 = 0xbeef;

    pub fn new() -> Self {
        Self {
            next_handle: Cell::new(1),
            calls: RefCell::new(Vec::new()),
            fail_next_create: Cell::new(false),
            fail_compile: Cell::new(false),
            fail_link: Cell::new(false),
            reflected: RefCell::new(Vec::new()),
        }
    }

    fn allocate(&self) -> RawHandle {
        if self.fail_next_create.take() {
            return NULL_HANDLE;
        }
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        handle
    }

    fn record(&self, line: String) {
        self.calls.borrow_mut().push(line);
    }

    /// Number of recorded calls whose tag matches `name`.
    pub fn count_calls(&self, name: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|line| line.split(' ').next() == Some(name))
            .count()
    }
}

impl GlApi for RecordingGl {
    fn create_shader(&self, stage: ShaderStage) -> RawHandle {
        let handle = self.allocate();
        self.record(format!("create_shader {stage} -> {handle}"));
        handle
    }

    fn shader_source(&self, shader: RawHandle, source: &str) {
        self.record(format!("shader_source {shader} len={}", source.len()));
    }

    fn compile_shader(&self, shader: RawHandle) {
        self.record(format!("compile_shader {shader}"));
    }

    fn compile_status(&self, _shader: RawHandle) -> bool {
        !self.fail_compile.get()
    }

    fn shader_info_log(&self, shader: RawHandle) -> String {
        format!("fake compile log for shader {shader}")
    }

    fn delete_shader(&self, shader: RawHandle) {
        self.record(format!("delete_shader {shader}"));
    }

    fn create_program(&self) -> RawHandle {
        let handle = self.allocate();
        self.record(format!("create_program -> {handle}"));
        handle
    }

    fn attach_shader(&self, program: RawHandle, shader: RawHandle) {
        self.record(format!("attach_shader {program} {shader}"));
    }

    fn detach_shader(&self, program: RawHandle, shader: RawHandle) {
        self.record(format!("detach_shader {program} {shader}"));
    }

    fn link_program(&self, program: RawHandle) {
        self.record(format!("link_program {program}"));
    }

    fn link_status(&self, _program: RawHandle) -> bool {
        !self.fail_link.get()
    }

    fn program_info_log(&self, program: RawHandle) -> String {
        format!("fake link log for program {program}")
    }

    fn use_program(&self, program: RawHandle) {
        self.record(format!("use_program {program}"));
    }

    fn delete_program(&self, program: RawHandle) {
        self.record(format!("delete_program {program}"));
    }

    fn program_binary(&self, program: RawHandle) -> (u32, Vec<u8>) {
        self.record(format!("program_binary {program}"));
        (Self::BINARY_FORMAT, vec![0xca, 0xfe])
    }

    fn set_program_binary(&self, program: RawHandle, format: u32, image: &[u8]) {
        self.record(format!(
            "set_program_binary {program} format={format} len={}",
            image.len()
        ));
    }

    fn active_uniform_count(&self, _program: RawHandle) -> u32 {
        self.reflected.borrow().len() as u32
    }

    fn uniform_properties(&self, _program: RawHandle, index: u32) -> UniformProps {
        self.reflected.borrow()[index as usize].clone()
    }

    fn uniform_f32v(&self, program: RawHandle, location: i32, components: u8, data: &[f32]) {
        self.record(format!(
            "uniform_f32v {program} loc={location} n={components} data={data:?}"
        ));
    }

    fn uniform_i32v(&self, program: RawHandle, location: i32, components: u8, data: &[i32]) {
        self.record(format!(
            "uniform_i32v {program} loc={location} n={components} data={data:?}"
        ));
    }

    fn uniform_u32v(&self, program: RawHandle, location: i32, components: u8, data: &[u32]) {
        self.record(format!(
            "uniform_u32v {program} loc={location} n={components} data={data:?}"
        ));
    }

    fn uniform_matrix_f32v(
        &self,
        program: RawHandle,
        location: i32,
        cols: u8,
        rows: u8,
        _data: &[f32],
    ) {
        self.record(format!(
            "uniform_matrix_f32v {program} loc={location} dims={cols}x{rows}"
        ));
    }

    fn create_buffer(&self) -> RawHandle {
        let handle = self.allocate();
        self.record(format!("create_buffer -> {handle}"));
        handle
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: RawHandle) {
        self.record(format!("bind_buffer {} {buffer}", target.label()));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        self.record(format!("buffer_data {} len={}", target.label(), data.len()));
    }

    fn delete_buffer(&self, buffer: RawHandle) {
        self.record(format!("delete_buffer {buffer}"));
    }

    fn create_vertex_array(&self) -> RawHandle {
        let handle = self.allocate();
        self.record(format!("create_vertex_array -> {handle}"));
        handle
    }

    fn bind_vertex_array(&self, vao: RawHandle) {
        self.record(format!("bind_vertex_array {vao}"));
    }

    fn delete_vertex_array(&self, vao: RawHandle) {
        self.record(format!("delete_vertex_array {vao}"));
    }

    fn float_attribute_pointer(&self, index: u32, components: i32, stride: i32, offset: usize) {
        self.record(format!(
            "float_attribute_pointer {index} n={components} stride={stride} offset={offset}"
        ));
    }

    fn enable_attribute(&self, index: u32) {
        self.record(format!("enable_attribute {index}"));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(format!("viewport {x} {y} {width} {height}"));
    }

    fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(format!("set_clear_color {r} {g} {b} {a}"));
    }

    fn clear(&self) {
        self.record("clear".to_owned());
    }

    fn draw_indexed_triangles(&self, index_count: i32) {
        self.record(format!("draw_indexed_triangles {index_count}"));
    }

    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            vendor: "reticle-test".to_owned(),
            renderer: "recording".to_owned(),
            version: "4.5".to_owned(),
            shading_language: "4.50".to_owned(),
        }
    }
}
