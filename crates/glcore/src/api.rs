//! The native graphics interface the object layer is written against.
//!
//! [`GlApi`] is deliberately narrow: it lists exactly the driver entry
//! points the wrappers consume, in their GL shapes (integer handles, info
//! logs, program-interface reflection, typed uniform uploads). Keeping it a
//! trait lets the object state machines run against a recording fake in
//! tests while [`crate::RawGl`] talks to the real driver.

use bitflags::bitflags;

/// Native handle for a GPU object. Unique within its resource class for the
/// lifetime of the owning context.
pub type RawHandle = u32;

/// The value drivers return when handle allocation fails.
pub const NULL_HANDLE: RawHandle = 0;

/// The two shader stages this layer builds. There is no abstract "shader"
/// to instantiate; every shader is one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Buffer binding points the layer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data.
    Array,
    /// Index data for indexed draws.
    ElementArray,
}

impl BufferTarget {
    pub fn label(self) -> &'static str {
        match self {
            BufferTarget::Array => "array",
            BufferTarget::ElementArray => "element-array",
        }
    }
}

bitflags! {
    /// Which pipeline stages reference a uniform, as reported by the
    /// program-interface query.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StageMask: u32 {
        const VERTEX = 1;
        const TESS_CONTROL = 1 << 1;
        const TESS_EVALUATION = 1 << 2;
        const GEOMETRY = 1 << 3;
        const FRAGMENT = 1 << 4;
        const COMPUTE = 1 << 5;
    }
}

/// The fixed property record reflection reads for every active uniform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformProps {
    pub name: String,
    pub name_length: i32,
    /// Raw GL type code; decoded into [`crate::UniformKind`] by the cache.
    pub type_code: u32,
    pub array_size: i32,
    pub offset: i32,
    pub block_index: i32,
    pub array_stride: i32,
    pub matrix_stride: i32,
    pub row_major: bool,
    pub atomic_counter_buffer_index: i32,
    pub referenced_by: StageMask,
    pub location: i32,
}

/// Identification strings reported by the driver.
#[derive(Debug, Clone, Default)]
pub struct DeviceInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub shading_language: String,
}

/// The raw driver surface consumed by the object layer.
///
/// Callers never touch these entry points directly; the wrappers do. All
/// calls are non-reentrant and must stay on the thread that owns the GL
/// context.
pub trait GlApi {
    // Shader objects.
    fn create_shader(&self, stage: ShaderStage) -> RawHandle;
    fn shader_source(&self, shader: RawHandle, source: &str);
    fn compile_shader(&self, shader: RawHandle);
    fn compile_status(&self, shader: RawHandle) -> bool;
    fn shader_info_log(&self, shader: RawHandle) -> String;
    fn delete_shader(&self, shader: RawHandle);

    // Program objects.
    fn create_program(&self) -> RawHandle;
    fn attach_shader(&self, program: RawHandle, shader: RawHandle);
    fn detach_shader(&self, program: RawHandle, shader: RawHandle);
    fn link_program(&self, program: RawHandle);
    fn link_status(&self, program: RawHandle) -> bool;
    fn program_info_log(&self, program: RawHandle) -> String;
    /// Pass [`NULL_HANDLE`] to unbind the current program.
    fn use_program(&self, program: RawHandle);
    fn delete_program(&self, program: RawHandle);
    /// Returns the driver binary as a (format, image) pair.
    fn program_binary(&self, program: RawHandle) -> (u32, Vec<u8>);
    fn set_program_binary(&self, program: RawHandle, format: u32, image: &[u8]);

    // Uniform reflection.
    fn active_uniform_count(&self, program: RawHandle) -> u32;
    fn uniform_properties(&self, program: RawHandle, index: u32) -> UniformProps;

    // Uniform upload, program-targeted. `components` selects the 1–4 wide
    // variant; matrix dimensions are (columns, rows).
    fn uniform_f32v(&self, program: RawHandle, location: i32, components: u8, data: &[f32]);
    fn uniform_i32v(&self, program: RawHandle, location: i32, components: u8, data: &[i32]);
    fn uniform_u32v(&self, program: RawHandle, location: i32, components: u8, data: &[u32]);
    fn uniform_matrix_f32v(
        &self,
        program: RawHandle,
        location: i32,
        cols: u8,
        rows: u8,
        data: &[f32],
    );

    // Buffer objects.
    fn create_buffer(&self) -> RawHandle;
    fn bind_buffer(&self, target: BufferTarget, buffer: RawHandle);
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&self, buffer: RawHandle);

    // Vertex array objects.
    fn create_vertex_array(&self) -> RawHandle;
    fn bind_vertex_array(&self, vao: RawHandle);
    fn delete_vertex_array(&self, vao: RawHandle);
    fn float_attribute_pointer(&self, index: u32, components: i32, stride: i32, offset: usize);
    fn enable_attribute(&self, index: u32);

    // Frame operations.
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self);
    /// Draws `index_count` indices as triangles from the bound element buffer.
    fn draw_indexed_triangles(&self, index_count: i32);

    fn device_info(&self) -> DeviceInfo;
}
