//! [`GlApi`] implementation over loaded OpenGL function pointers.
//!
//! The `gl` crate exposes the driver as process-global function pointers;
//! [`RawGl::load`] resolves them through the windowing layer's
//! `get_proc_address` and hands back a value implementing the trait. Calls
//! are `unsafe` FFI underneath, contained entirely in this module.

use std::ffi::{c_void, CStr};

use crate::api::{
    BufferTarget, DeviceInfo, GlApi, RawHandle, ShaderStage, StageMask, UniformProps,
};

/// The uniform property set queried per reflection index, in query order.
const UNIFORM_PROPS: [gl::types::GLenum; 16] = [
    gl::NAME_LENGTH,
    gl::TYPE,
    gl::ARRAY_SIZE,
    gl::OFFSET,
    gl::BLOCK_INDEX,
    gl::ARRAY_STRIDE,
    gl::MATRIX_STRIDE,
    gl::IS_ROW_MAJOR,
    gl::ATOMIC_COUNTER_BUFFER_INDEX,
    gl::REFERENCED_BY_VERTEX_SHADER,
    gl::REFERENCED_BY_TESS_CONTROL_SHADER,
    gl::REFERENCED_BY_TESS_EVALUATION_SHADER,
    gl::REFERENCED_BY_GEOMETRY_SHADER,
    gl::REFERENCED_BY_FRAGMENT_SHADER,
    gl::REFERENCED_BY_COMPUTE_SHADER,
    gl::LOCATION,
];

/// Production GL backend. Construct with [`RawGl::load`] once a context is
/// current; the loaded pointers are only valid on the owning thread.
pub struct RawGl {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl RawGl {
    /// Resolves every GL entry point through `loader` (typically the
    /// display's `get_proc_address`).
    pub fn load<F>(mut loader: F) -> Self
    where
        F: FnMut(&str) -> *const c_void,
    {
        gl::load_with(|symbol| loader(symbol));
        Self {
            _not_send: std::marker::PhantomData,
        }
    }
}

fn stage_to_gl(stage: ShaderStage) -> gl::types::GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    }
}

fn target_to_gl(target: BufferTarget) -> gl::types::GLenum {
    match target {
        BufferTarget::Array => gl::ARRAY_BUFFER,
        BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
    }
}

fn read_gl_string(name: gl::types::GLenum) -> String {
    let ptr = unsafe { gl::GetString(name) };
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr.cast()) }
        .to_string_lossy()
        .into_owned()
}

impl GlApi for RawGl {
    fn create_shader(&self, stage: ShaderStage) -> RawHandle {
        unsafe { gl::CreateShader(stage_to_gl(stage)) }
    }

    fn shader_source(&self, shader: RawHandle, source: &str) {
        let ptr = source.as_ptr() as *const gl::types::GLchar;
        let len = source.len() as gl::types::GLint;
        unsafe { gl::ShaderSource(shader, 1, &ptr, &len) }
    }

    fn compile_shader(&self, shader: RawHandle) {
        unsafe { gl::CompileShader(shader) }
    }

    fn compile_status(&self, shader: RawHandle) -> bool {
        let mut status = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status) };
        status != 0
    }

    fn shader_info_log(&self, shader: RawHandle) -> String {
        let mut len = 0;
        unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len) };
        if len <= 0 {
            return String::new();
        }
        let mut buf = vec![0u8; len as usize];
        let mut written = 0;
        unsafe { gl::GetShaderInfoLog(shader, len, &mut written, buf.as_mut_ptr().cast()) };
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn delete_shader(&self, shader: RawHandle) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> RawHandle {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: RawHandle, shader: RawHandle) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn detach_shader(&self, program: RawHandle, shader: RawHandle) {
        unsafe { gl::DetachShader(program, shader) }
    }

    fn link_program(&self, program: RawHandle) {
        unsafe { gl::LinkProgram(program) }
    }

    fn link_status(&self, program: RawHandle) -> bool {
        let mut status = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut status) };
        status != 0
    }

    fn program_info_log(&self, program: RawHandle) -> String {
        let mut len = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len) };
        if len <= 0 {
            return String::new();
        }
        let mut buf = vec![0u8; len as usize];
        let mut written = 0;
        unsafe { gl::GetProgramInfoLog(program, len, &mut written, buf.as_mut_ptr().cast()) };
        buf.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn use_program(&self, program: RawHandle) {
        unsafe { gl::UseProgram(program) }
    }

    fn delete_program(&self, program: RawHandle) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn program_binary(&self, program: RawHandle) -> (u32, Vec<u8>) {
        let mut len = 0;
        unsafe { gl::GetProgramiv(program, gl::PROGRAM_BINARY_LENGTH, &mut len) };
        let mut image = vec![0u8; len.max(0) as usize];
        let mut written = 0;
        let mut format = 0;
        unsafe {
            gl::GetProgramBinary(
                program,
                len,
                &mut written,
                &mut format,
                image.as_mut_ptr().cast(),
            )
        };
        image.truncate(written.max(0) as usize);
        (format, image)
    }

    fn set_program_binary(&self, program: RawHandle, format: u32, image: &[u8]) {
        unsafe {
            gl::ProgramBinary(
                program,
                format,
                image.as_ptr().cast(),
                image.len() as gl::types::GLsizei,
            )
        }
    }

    fn active_uniform_count(&self, program: RawHandle) -> u32 {
        let mut count = 0;
        unsafe {
            gl::GetProgramInterfaceiv(program, gl::UNIFORM, gl::ACTIVE_RESOURCES, &mut count)
        };
        count.max(0) as u32
    }

    fn uniform_properties(&self, program: RawHandle, index: u32) -> UniformProps {
        let mut values = [0 as gl::types::GLint; UNIFORM_PROPS.len()];
        let mut written = 0;
        unsafe {
            gl::GetProgramResourceiv(
                program,
                gl::UNIFORM,
                index,
                UNIFORM_PROPS.len() as gl::types::GLsizei,
                UNIFORM_PROPS.as_ptr(),
                values.len() as gl::types::GLsizei,
                &mut written,
                values.as_mut_ptr(),
            )
        };

        // NAME_LENGTH includes the trailing nul.
        let name_len = values[0].max(1);
        let mut name_buf = vec![0u8; name_len as usize];
        let mut name_written = 0;
        unsafe {
            gl::GetProgramResourceName(
                program,
                gl::UNIFORM,
                index,
                name_len,
                &mut name_written,
                name_buf.as_mut_ptr().cast(),
            )
        };
        name_buf.truncate(name_written.max(0) as usize);

        let mut referenced_by = StageMask::empty();
        for (flag, value) in [
            (StageMask::VERTEX, values[9]),
            (StageMask::TESS_CONTROL, values[10]),
            (StageMask::TESS_EVALUATION, values[11]),
            (StageMask::GEOMETRY, values[12]),
            (StageMask::FRAGMENT, values[13]),
            (StageMask::COMPUTE, values[14]),
        ] {
            if value != 0 {
                referenced_by |= flag;
            }
        }

        UniformProps {
            name: String::from_utf8_lossy(&name_buf).into_owned(),
            name_length: values[0],
            type_code: values[1] as u32,
            array_size: values[2],
            offset: values[3],
            block_index: values[4],
            array_stride: values[5],
            matrix_stride: values[6],
            row_major: values[7] != 0,
            atomic_counter_buffer_index: values[8],
            referenced_by,
            location: values[15],
        }
    }

    fn uniform_f32v(&self, program: RawHandle, location: i32, components: u8, data: &[f32]) {
        let ptr = data.as_ptr();
        unsafe {
            match components {
                1 => gl::ProgramUniform1fv(program, location, 1, ptr),
                2 => gl::ProgramUniform2fv(program, location, 1, ptr),
                3 => gl::ProgramUniform3fv(program, location, 1, ptr),
                _ => gl::ProgramUniform4fv(program, location, 1, ptr),
            }
        }
    }

    fn uniform_i32v(&self, program: RawHandle, location: i32, components: u8, data: &[i32]) {
        let ptr = data.as_ptr();
        unsafe {
            match components {
                1 => gl::ProgramUniform1iv(program, location, 1, ptr),
                2 => gl::ProgramUniform2iv(program, location, 1, ptr),
                3 => gl::ProgramUniform3iv(program, location, 1, ptr),
                _ => gl::ProgramUniform4iv(program, location, 1, ptr),
            }
        }
    }

    fn uniform_u32v(&self, program: RawHandle, location: i32, components: u8, data: &[u32]) {
        let ptr = data.as_ptr();
        unsafe {
            match components {
                1 => gl::ProgramUniform1uiv(program, location, 1, ptr),
                2 => gl::ProgramUniform2uiv(program, location, 1, ptr),
                3 => gl::ProgramUniform3uiv(program, location, 1, ptr),
                _ => gl::ProgramUniform4uiv(program, location, 1, ptr),
            }
        }
    }

    fn uniform_matrix_f32v(
        &self,
        program: RawHandle,
        location: i32,
        cols: u8,
        rows: u8,
        data: &[f32],
    ) {
        let ptr = data.as_ptr();
        let transpose = gl::FALSE;
        unsafe {
            match (cols, rows) {
                (2, 2) => gl::ProgramUniformMatrix2fv(program, location, 1, transpose, ptr),
                (3, 3) => gl::ProgramUniformMatrix3fv(program, location, 1, transpose, ptr),
                (4, 4) => gl::ProgramUniformMatrix4fv(program, location, 1, transpose, ptr),
                (2, 3) => gl::ProgramUniformMatrix2x3fv(program, location, 1, transpose, ptr),
                (3, 2) => gl::ProgramUniformMatrix3x2fv(program, location, 1, transpose, ptr),
                (2, 4) => gl::ProgramUniformMatrix2x4fv(program, location, 1, transpose, ptr),
                (4, 2) => gl::ProgramUniformMatrix4x2fv(program, location, 1, transpose, ptr),
                (3, 4) => gl::ProgramUniformMatrix3x4fv(program, location, 1, transpose, ptr),
                _ => gl::ProgramUniformMatrix4x3fv(program, location, 1, transpose, ptr),
            }
        }
    }

    fn create_buffer(&self) -> RawHandle {
        let mut handle = 0;
        unsafe { gl::GenBuffers(1, &mut handle) };
        handle
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: RawHandle) {
        unsafe { gl::BindBuffer(target_to_gl(target), buffer) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            gl::BufferData(
                target_to_gl(target),
                data.len() as gl::types::GLsizeiptr,
                data.as_ptr().cast(),
                gl::STATIC_DRAW,
            )
        }
    }

    fn delete_buffer(&self, buffer: RawHandle) {
        unsafe { gl::DeleteBuffers(1, &buffer) }
    }

    fn create_vertex_array(&self) -> RawHandle {
        let mut handle = 0;
        unsafe { gl::GenVertexArrays(1, &mut handle) };
        handle
    }

    fn bind_vertex_array(&self, vao: RawHandle) {
        unsafe { gl::BindVertexArray(vao) }
    }

    fn delete_vertex_array(&self, vao: RawHandle) {
        unsafe { gl::DeleteVertexArrays(1, &vao) }
    }

    fn float_attribute_pointer(&self, index: u32, components: i32, stride: i32, offset: usize) {
        unsafe {
            gl::VertexAttribPointer(
                index,
                components,
                gl::FLOAT,
                gl::FALSE,
                stride,
                offset as *const c_void,
            )
        }
    }

    fn enable_attribute(&self, index: u32) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Viewport(x, y, width, height) }
    }

    fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear(&self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) }
    }

    fn draw_indexed_triangles(&self, index_count: i32) {
        unsafe { gl::DrawElements(gl::TRIANGLES, index_count, gl::UNSIGNED_INT, std::ptr::null()) }
    }

    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            vendor: read_gl_string(gl::VENDOR),
            renderer: read_gl_string(gl::RENDERER),
            version: read_gl_string(gl::VERSION),
            shading_language: read_gl_string(gl::SHADING_LANGUAGE_VERSION),
        }
    }
}
