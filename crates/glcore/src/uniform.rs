//! Uniform typing, values, and the type→upload dispatch table.
//!
//! [`UniformKind`] mirrors the full GL 4.5 uniform type set so reflection
//! can decode whatever the driver reports. Only the value types (scalars,
//! vectors, float matrices) and the opaque binding-unit types (samplers,
//! images) have upload paths; everything else surfaces as an operation
//! error at `uniform_set` time.

use crate::api::{GlApi, RawHandle, UniformProps};
use crate::GlError;

/// Decoded uniform type, one variant per GL type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    FloatVec2,
    FloatVec3,
    FloatVec4,
    Double,
    DoubleVec2,
    DoubleVec3,
    DoubleVec4,
    Int,
    IntVec2,
    IntVec3,
    IntVec4,
    UInt,
    UIntVec2,
    UIntVec3,
    UIntVec4,
    Bool,
    BoolVec2,
    BoolVec3,
    BoolVec4,
    FloatMat2,
    FloatMat3,
    FloatMat4,
    FloatMat2x3,
    FloatMat2x4,
    FloatMat3x2,
    FloatMat3x4,
    FloatMat4x2,
    FloatMat4x3,
    DoubleMat2,
    DoubleMat3,
    DoubleMat4,
    DoubleMat2x3,
    DoubleMat2x4,
    DoubleMat3x2,
    DoubleMat3x4,
    DoubleMat4x2,
    DoubleMat4x3,
    Sampler1D,
    Sampler2D,
    Sampler3D,
    SamplerCube,
    Sampler1DShadow,
    Sampler2DShadow,
    Sampler1DArray,
    Sampler2DArray,
    Sampler1DArrayShadow,
    Sampler2DArrayShadow,
    Sampler2DMultisample,
    Sampler2DMultisampleArray,
    SamplerCubeShadow,
    SamplerBuffer,
    Sampler2DRect,
    Sampler2DRectShadow,
    IntSampler1D,
    IntSampler2D,
    IntSampler3D,
    IntSamplerCube,
    IntSampler1DArray,
    IntSampler2DArray,
    IntSampler2DMultisample,
    IntSampler2DMultisampleArray,
    IntSamplerBuffer,
    IntSampler2DRect,
    UIntSampler1D,
    UIntSampler2D,
    UIntSampler3D,
    UIntSamplerCube,
    UIntSampler1DArray,
    UIntSampler2DArray,
    UIntSampler2DMultisample,
    UIntSampler2DMultisampleArray,
    UIntSamplerBuffer,
    UIntSampler2DRect,
    Image1D,
    Image2D,
    Image3D,
    Image2DRect,
    ImageCube,
    ImageBuffer,
    Image1DArray,
    Image2DArray,
    Image2DMultisample,
    Image2DMultisampleArray,
    IntImage1D,
    IntImage2D,
    IntImage3D,
    IntImage2DRect,
    IntImageCube,
    IntImageBuffer,
    IntImage1DArray,
    IntImage2DArray,
    IntImage2DMultisample,
    IntImage2DMultisampleArray,
    UIntImage1D,
    UIntImage2D,
    UIntImage3D,
    UIntImage2DRect,
    UIntImageCube,
    UIntImageBuffer,
    UIntImage1DArray,
    UIntImage2DArray,
    UIntImage2DMultisample,
    UIntImage2DMultisampleArray,
    AtomicCounter,
    /// A type code this layer does not recognize.
    Unknown(u32),
}

impl UniformKind {
    /// Decodes a raw GL type code as reported by reflection.
    pub fn from_gl(code: u32) -> Self {
        match code {
            gl::FLOAT => Self::Float,
            gl::FLOAT_VEC2 => Self::FloatVec2,
            gl::FLOAT_VEC3 => Self::FloatVec3,
            gl::FLOAT_VEC4 => Self::FloatVec4,
            gl::DOUBLE => Self::Double,
            gl::DOUBLE_VEC2 => Self::DoubleVec2,
            gl::DOUBLE_VEC3 => Self::DoubleVec3,
            gl::DOUBLE_VEC4 => Self::DoubleVec4,
            gl::INT => Self::Int,
            gl::INT_VEC2 => Self::IntVec2,
            gl::INT_VEC3 => Self::IntVec3,
            gl::INT_VEC4 => Self::IntVec4,
            gl::UNSIGNED_INT => Self::UInt,
            gl::UNSIGNED_INT_VEC2 => Self::UIntVec2,
            gl::UNSIGNED_INT_VEC3 => Self::UIntVec3,
            gl::UNSIGNED_INT_VEC4 => Self::UIntVec4,
            gl::BOOL => Self::Bool,
            gl::BOOL_VEC2 => Self::BoolVec2,
            gl::BOOL_VEC3 => Self::BoolVec3,
            gl::BOOL_VEC4 => Self::BoolVec4,
            gl::FLOAT_MAT2 => Self::FloatMat2,
            gl::FLOAT_MAT3 => Self::FloatMat3,
            gl::FLOAT_MAT4 => Self::FloatMat4,
            gl::FLOAT_MAT2x3 => Self::FloatMat2x3,
            gl::FLOAT_MAT2x4 => Self::FloatMat2x4,
            gl::FLOAT_MAT3x2 => Self::FloatMat3x2,
            gl::FLOAT_MAT3x4 => Self::FloatMat3x4,
            gl::FLOAT_MAT4x2 => Self::FloatMat4x2,
            gl::FLOAT_MAT4x3 => Self::FloatMat4x3,
            gl::DOUBLE_MAT2 => Self::DoubleMat2,
            gl::DOUBLE_MAT3 => Self::DoubleMat3,
            gl::DOUBLE_MAT4 => Self::DoubleMat4,
            gl::DOUBLE_MAT2x3 => Self::DoubleMat2x3,
            gl::DOUBLE_MAT2x4 => Self::DoubleMat2x4,
            gl::DOUBLE_MAT3x2 => Self::DoubleMat3x2,
            gl::DOUBLE_MAT3x4 => Self::DoubleMat3x4,
            gl::DOUBLE_MAT4x2 => Self::DoubleMat4x2,
            gl::DOUBLE_MAT4x3 => Self::DoubleMat4x3,
            gl::SAMPLER_1D => Self::Sampler1D,
            gl::SAMPLER_2D => Self::Sampler2D,
            gl::SAMPLER_3D => Self::Sampler3D,
            gl::SAMPLER_CUBE => Self::SamplerCube,
            gl::SAMPLER_1D_SHADOW => Self::Sampler1DShadow,
            gl::SAMPLER_2D_SHADOW => Self::Sampler2DShadow,
            gl::SAMPLER_1D_ARRAY => Self::Sampler1DArray,
            gl::SAMPLER_2D_ARRAY => Self::Sampler2DArray,
            gl::SAMPLER_1D_ARRAY_SHADOW => Self::Sampler1DArrayShadow,
            gl::SAMPLER_2D_ARRAY_SHADOW => Self::Sampler2DArrayShadow,
            gl::SAMPLER_2D_MULTISAMPLE => Self::Sampler2DMultisample,
            gl::SAMPLER_2D_MULTISAMPLE_ARRAY => Self::Sampler2DMultisampleArray,
            gl::SAMPLER_CUBE_SHADOW => Self::SamplerCubeShadow,
            gl::SAMPLER_BUFFER => Self::SamplerBuffer,
            gl::SAMPLER_2D_RECT => Self::Sampler2DRect,
            gl::SAMPLER_2D_RECT_SHADOW => Self::Sampler2DRectShadow,
            gl::INT_SAMPLER_1D => Self::IntSampler1D,
            gl::INT_SAMPLER_2D => Self::IntSampler2D,
            gl::INT_SAMPLER_3D => Self::IntSampler3D,
            gl::INT_SAMPLER_CUBE => Self::IntSamplerCube,
            gl::INT_SAMPLER_1D_ARRAY => Self::IntSampler1DArray,
            gl::INT_SAMPLER_2D_ARRAY => Self::IntSampler2DArray,
            gl::INT_SAMPLER_2D_MULTISAMPLE => Self::IntSampler2DMultisample,
            gl::INT_SAMPLER_2D_MULTISAMPLE_ARRAY => Self::IntSampler2DMultisampleArray,
            gl::INT_SAMPLER_BUFFER => Self::IntSamplerBuffer,
            gl::INT_SAMPLER_2D_RECT => Self::IntSampler2DRect,
            gl::UNSIGNED_INT_SAMPLER_1D => Self::UIntSampler1D,
            gl::UNSIGNED_INT_SAMPLER_2D => Self::UIntSampler2D,
            gl::UNSIGNED_INT_SAMPLER_3D => Self::UIntSampler3D,
            gl::UNSIGNED_INT_SAMPLER_CUBE => Self::UIntSamplerCube,
            gl::UNSIGNED_INT_SAMPLER_1D_ARRAY => Self::UIntSampler1DArray,
            gl::UNSIGNED_INT_SAMPLER_2D_ARRAY => Self::UIntSampler2DArray,
            gl::UNSIGNED_INT_SAMPLER_2D_MULTISAMPLE => Self::UIntSampler2DMultisample,
            gl::UNSIGNED_INT_SAMPLER_2D_MULTISAMPLE_ARRAY => Self::UIntSampler2DMultisampleArray,
            gl::UNSIGNED_INT_SAMPLER_BUFFER => Self::UIntSamplerBuffer,
            gl::UNSIGNED_INT_SAMPLER_2D_RECT => Self::UIntSampler2DRect,
            gl::IMAGE_1D => Self::Image1D,
            gl::IMAGE_2D => Self::Image2D,
            gl::IMAGE_3D => Self::Image3D,
            gl::IMAGE_2D_RECT => Self::Image2DRect,
            gl::IMAGE_CUBE => Self::ImageCube,
            gl::IMAGE_BUFFER => Self::ImageBuffer,
            gl::IMAGE_1D_ARRAY => Self::Image1DArray,
            gl::IMAGE_2D_ARRAY => Self::Image2DArray,
            gl::IMAGE_2D_MULTISAMPLE => Self::Image2DMultisample,
            gl::IMAGE_2D_MULTISAMPLE_ARRAY => Self::Image2DMultisampleArray,
            gl::INT_IMAGE_1D => Self::IntImage1D,
            gl::INT_IMAGE_2D => Self::IntImage2D,
            gl::INT_IMAGE_3D => Self::IntImage3D,
            gl::INT_IMAGE_2D_RECT => Self::IntImage2DRect,
            gl::INT_IMAGE_CUBE => Self::IntImageCube,
            gl::INT_IMAGE_BUFFER => Self::IntImageBuffer,
            gl::INT_IMAGE_1D_ARRAY => Self::IntImage1DArray,
            gl::INT_IMAGE_2D_ARRAY => Self::IntImage2DArray,
            gl::INT_IMAGE_2D_MULTISAMPLE => Self::IntImage2DMultisample,
            gl::INT_IMAGE_2D_MULTISAMPLE_ARRAY => Self::IntImage2DMultisampleArray,
            gl::UNSIGNED_INT_IMAGE_1D => Self::UIntImage1D,
            gl::UNSIGNED_INT_IMAGE_2D => Self::UIntImage2D,
            gl::UNSIGNED_INT_IMAGE_3D => Self::UIntImage3D,
            gl::UNSIGNED_INT_IMAGE_2D_RECT => Self::UIntImage2DRect,
            gl::UNSIGNED_INT_IMAGE_CUBE => Self::UIntImageCube,
            gl::UNSIGNED_INT_IMAGE_BUFFER => Self::UIntImageBuffer,
            gl::UNSIGNED_INT_IMAGE_1D_ARRAY => Self::UIntImage1DArray,
            gl::UNSIGNED_INT_IMAGE_2D_ARRAY => Self::UIntImage2DArray,
            gl::UNSIGNED_INT_IMAGE_2D_MULTISAMPLE => Self::UIntImage2DMultisample,
            gl::UNSIGNED_INT_IMAGE_2D_MULTISAMPLE_ARRAY => Self::UIntImage2DMultisampleArray,
            gl::UNSIGNED_INT_ATOMIC_COUNTER => Self::AtomicCounter,
            other => Self::Unknown(other),
        }
    }

    /// True for every texture sampler kind, signed/unsigned included.
    pub fn is_sampler(self) -> bool {
        matches!(
            self,
            Self::Sampler1D
                | Self::Sampler2D
                | Self::Sampler3D
                | Self::SamplerCube
                | Self::Sampler1DShadow
                | Self::Sampler2DShadow
                | Self::Sampler1DArray
                | Self::Sampler2DArray
                | Self::Sampler1DArrayShadow
                | Self::Sampler2DArrayShadow
                | Self::Sampler2DMultisample
                | Self::Sampler2DMultisampleArray
                | Self::SamplerCubeShadow
                | Self::SamplerBuffer
                | Self::Sampler2DRect
                | Self::Sampler2DRectShadow
                | Self::IntSampler1D
                | Self::IntSampler2D
                | Self::IntSampler3D
                | Self::IntSamplerCube
                | Self::IntSampler1DArray
                | Self::IntSampler2DArray
                | Self::IntSampler2DMultisample
                | Self::IntSampler2DMultisampleArray
                | Self::IntSamplerBuffer
                | Self::IntSampler2DRect
                | Self::UIntSampler1D
                | Self::UIntSampler2D
                | Self::UIntSampler3D
                | Self::UIntSamplerCube
                | Self::UIntSampler1DArray
                | Self::UIntSampler2DArray
                | Self::UIntSampler2DMultisample
                | Self::UIntSampler2DMultisampleArray
                | Self::UIntSamplerBuffer
                | Self::UIntSampler2DRect
        )
    }

    /// True for every image kind, signed/unsigned included.
    pub fn is_image(self) -> bool {
        matches!(
            self,
            Self::Image1D
                | Self::Image2D
                | Self::Image3D
                | Self::Image2DRect
                | Self::ImageCube
                | Self::ImageBuffer
                | Self::Image1DArray
                | Self::Image2DArray
                | Self::Image2DMultisample
                | Self::Image2DMultisampleArray
                | Self::IntImage1D
                | Self::IntImage2D
                | Self::IntImage3D
                | Self::IntImage2DRect
                | Self::IntImageCube
                | Self::IntImageBuffer
                | Self::IntImage1DArray
                | Self::IntImage2DArray
                | Self::IntImage2DMultisample
                | Self::IntImage2DMultisampleArray
                | Self::UIntImage1D
                | Self::UIntImage2D
                | Self::UIntImage3D
                | Self::UIntImage2DRect
                | Self::UIntImageCube
                | Self::UIntImageBuffer
                | Self::UIntImage1DArray
                | Self::UIntImage2DArray
                | Self::UIntImage2DMultisample
                | Self::UIntImage2DMultisampleArray
        )
    }
}

/// A named, typed input slot discovered on a linked program.
///
/// Constructed only by program reflection; callers read them out of the
/// program's uniform cache.
#[derive(Debug, Clone)]
pub struct Uniform {
    name: String,
    location: i32,
    kind: UniformKind,
    array_size: i32,
    props: UniformProps,
}

impl Uniform {
    pub(crate) fn from_props(props: UniformProps) -> Self {
        Self {
            name: props.name.clone(),
            location: props.location,
            kind: UniformKind::from_gl(props.type_code),
            array_size: props.array_size,
            props,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> i32 {
        self.location
    }

    pub fn kind(&self) -> UniformKind {
        self.kind
    }

    pub fn array_size(&self) -> i32 {
        self.array_size
    }

    /// The raw property record reflection captured for this uniform.
    pub fn props(&self) -> &UniformProps {
        &self.props
    }
}

impl std::fmt::Display for Uniform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "uniform `{}` ({:?}) at location {}",
            self.name, self.kind, self.location
        )
    }
}

/// A value handed to `uniform_set`. Matrices are column-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    F32(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    I32(i32),
    IVec2([i32; 2]),
    IVec3([i32; 3]),
    IVec4([i32; 4]),
    U32(u32),
    UVec2([u32; 2]),
    UVec3([u32; 3]),
    UVec4([u32; 4]),
    Mat2([f32; 4]),
    Mat3([f32; 9]),
    Mat4([f32; 16]),
    Mat2x3([f32; 6]),
    Mat3x2([f32; 6]),
    Mat2x4([f32; 8]),
    Mat4x2([f32; 8]),
    Mat3x4([f32; 12]),
    Mat4x3([f32; 12]),
}

impl UniformValue {
    fn shape_name(&self) -> &'static str {
        match self {
            Self::F32(_) => "float",
            Self::Vec2(_) => "vec2",
            Self::Vec3(_) => "vec3",
            Self::Vec4(_) => "vec4",
            Self::I32(_) => "int",
            Self::IVec2(_) => "ivec2",
            Self::IVec3(_) => "ivec3",
            Self::IVec4(_) => "ivec4",
            Self::U32(_) => "uint",
            Self::UVec2(_) => "uvec2",
            Self::UVec3(_) => "uvec3",
            Self::UVec4(_) => "uvec4",
            Self::Mat2(_) => "mat2",
            Self::Mat3(_) => "mat3",
            Self::Mat4(_) => "mat4",
            Self::Mat2x3(_) => "mat2x3",
            Self::Mat3x2(_) => "mat3x2",
            Self::Mat2x4(_) => "mat2x4",
            Self::Mat4x2(_) => "mat4x2",
            Self::Mat3x4(_) => "mat3x4",
            Self::Mat4x3(_) => "mat4x3",
        }
    }
}

/// Upload function signature used by the dispatch table.
pub(crate) type UploadFn = fn(&dyn GlApi, RawHandle, i32, &UniformValue) -> Result<(), GlError>;

fn mismatch(expected: &'static str, value: &UniformValue) -> GlError {
    GlError::Operation(format!(
        "uniform expects {expected}, got {}",
        value.shape_name()
    ))
}

fn upload_f32(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::F32(v) => Ok(gl.uniform_f32v(program, location, 1, &[*v])),
        other => Err(mismatch("float", other)),
    }
}

fn upload_vec2(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::Vec2(v) => Ok(gl.uniform_f32v(program, location, 2, v)),
        other => Err(mismatch("vec2", other)),
    }
}

fn upload_vec3(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::Vec3(v) => Ok(gl.uniform_f32v(program, location, 3, v)),
        other => Err(mismatch("vec3", other)),
    }
}

fn upload_vec4(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::Vec4(v) => Ok(gl.uniform_f32v(program, location, 4, v)),
        other => Err(mismatch("vec4", other)),
    }
}

fn upload_i32(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::I32(v) => Ok(gl.uniform_i32v(program, location, 1, &[*v])),
        other => Err(mismatch("int", other)),
    }
}

fn upload_ivec2(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::IVec2(v) => Ok(gl.uniform_i32v(program, location, 2, v)),
        other => Err(mismatch("ivec2", other)),
    }
}

fn upload_ivec3(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::IVec3(v) => Ok(gl.uniform_i32v(program, location, 3, v)),
        other => Err(mismatch("ivec3", other)),
    }
}

fn upload_ivec4(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::IVec4(v) => Ok(gl.uniform_i32v(program, location, 4, v)),
        other => Err(mismatch("ivec4", other)),
    }
}

fn upload_u32(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::U32(v) => Ok(gl.uniform_u32v(program, location, 1, &[*v])),
        other => Err(mismatch("uint", other)),
    }
}

fn upload_uvec2(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::UVec2(v) => Ok(gl.uniform_u32v(program, location, 2, v)),
        other => Err(mismatch("uvec2", other)),
    }
}

fn upload_uvec3(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::UVec3(v) => Ok(gl.uniform_u32v(program, location, 3, v)),
        other => Err(mismatch("uvec3", other)),
    }
}

fn upload_uvec4(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::UVec4(v) => Ok(gl.uniform_u32v(program, location, 4, v)),
        other => Err(mismatch("uvec4", other)),
    }
}

fn upload_mat2(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::Mat2(v) => Ok(gl.uniform_matrix_f32v(program, location, 2, 2, v)),
        other => Err(mismatch("mat2", other)),
    }
}

fn upload_mat3(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::Mat3(v) => Ok(gl.uniform_matrix_f32v(program, location, 3, 3, v)),
        other => Err(mismatch("mat3", other)),
    }
}

fn upload_mat4(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::Mat4(v) => Ok(gl.uniform_matrix_f32v(program, location, 4, 4, v)),
        other => Err(mismatch("mat4", other)),
    }
}

fn upload_mat2x3(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::Mat2x3(v) => Ok(gl.uniform_matrix_f32v(program, location, 2, 3, v)),
        other => Err(mismatch("mat2x3", other)),
    }
}

fn upload_mat3x2(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::Mat3x2(v) => Ok(gl.uniform_matrix_f32v(program, location, 3, 2, v)),
        other => Err(mismatch("mat3x2", other)),
    }
}

fn upload_mat2x4(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::Mat2x4(v) => Ok(gl.uniform_matrix_f32v(program, location, 2, 4, v)),
        other => Err(mismatch("mat2x4", other)),
    }
}

fn upload_mat4x2(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::Mat4x2(v) => Ok(gl.uniform_matrix_f32v(program, location, 4, 2, v)),
        other => Err(mismatch("mat4x2", other)),
    }
}

fn upload_mat3x4(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::Mat3x4(v) => Ok(gl.uniform_matrix_f32v(program, location, 3, 4, v)),
        other => Err(mismatch("mat3x4", other)),
    }
}

fn upload_mat4x3(gl: &dyn GlApi, program: RawHandle, location: i32, value: &UniformValue) -> Result<(), GlError> {
    match value {
        UniformValue::Mat4x3(v) => Ok(gl.uniform_matrix_f32v(program, location, 4, 3, v)),
        other => Err(mismatch("mat4x3", other)),
    }
}

/// The static type→upload dispatch table. Bool kinds share the int
/// uploaders (GL represents bool uniforms as ints on the wire).
static UPLOADERS: &[(UniformKind, UploadFn)] = &[
    (UniformKind::Float, upload_f32),
    (UniformKind::FloatVec2, upload_vec2),
    (UniformKind::FloatVec3, upload_vec3),
    (UniformKind::FloatVec4, upload_vec4),
    (UniformKind::Int, upload_i32),
    (UniformKind::IntVec2, upload_ivec2),
    (UniformKind::IntVec3, upload_ivec3),
    (UniformKind::IntVec4, upload_ivec4),
    (UniformKind::UInt, upload_u32),
    (UniformKind::UIntVec2, upload_uvec2),
    (UniformKind::UIntVec3, upload_uvec3),
    (UniformKind::UIntVec4, upload_uvec4),
    (UniformKind::Bool, upload_i32),
    (UniformKind::BoolVec2, upload_ivec2),
    (UniformKind::BoolVec3, upload_ivec3),
    (UniformKind::BoolVec4, upload_ivec4),
    (UniformKind::FloatMat2, upload_mat2),
    (UniformKind::FloatMat3, upload_mat3),
    (UniformKind::FloatMat4, upload_mat4),
    (UniformKind::FloatMat2x3, upload_mat2x3),
    (UniformKind::FloatMat3x2, upload_mat3x2),
    (UniformKind::FloatMat2x4, upload_mat2x4),
    (UniformKind::FloatMat4x2, upload_mat4x2),
    (UniformKind::FloatMat3x4, upload_mat3x4),
    (UniformKind::FloatMat4x3, upload_mat4x3),
];

/// Resolves the upload function for a declared uniform type. Samplers and
/// images take binding units through the scalar int path; kinds with no
/// entry (doubles, atomic counters, unknown codes) have no upload path.
pub(crate) fn uploader_for(kind: UniformKind) -> Option<UploadFn> {
    UPLOADERS
        .iter()
        .find(|(entry, _)| *entry == kind)
        .map(|(_, upload)| *upload)
        .or_else(|| (kind.is_sampler() || kind.is_image()).then_some(upload_i32 as UploadFn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingGl;

    #[test]
    fn decodes_known_type_codes() {
        assert_eq!(UniformKind::from_gl(gl::FLOAT_VEC2), UniformKind::FloatVec2);
        assert_eq!(UniformKind::from_gl(gl::SAMPLER_2D), UniformKind::Sampler2D);
        assert_eq!(
            UniformKind::from_gl(gl::UNSIGNED_INT_ATOMIC_COUNTER),
            UniformKind::AtomicCounter
        );
        assert_eq!(UniformKind::from_gl(0xdead), UniformKind::Unknown(0xdead));
    }

    #[test]
    fn value_types_resolve_to_uploaders() {
        for kind in [
            UniformKind::Float,
            UniformKind::FloatVec4,
            UniformKind::IntVec3,
            UniformKind::UIntVec2,
            UniformKind::Bool,
            UniformKind::FloatMat4,
            UniformKind::FloatMat3x4,
        ] {
            assert!(uploader_for(kind).is_some(), "{kind:?} should upload");
        }
    }

    #[test]
    fn samplers_and_images_take_binding_units() {
        let gl = RecordingGl::new();
        let upload = uploader_for(UniformKind::Sampler2D).expect("sampler uploader");
        upload(&gl, 4, 2, &UniformValue::I32(0)).expect("sampler upload");
        assert_eq!(gl.count_calls("uniform_i32v"), 1);

        assert!(uploader_for(UniformKind::Image2D).is_some());
    }

    #[test]
    fn unsupported_kinds_have_no_upload_path() {
        assert!(uploader_for(UniformKind::Double).is_none());
        assert!(uploader_for(UniformKind::DoubleMat4).is_none());
        assert!(uploader_for(UniformKind::AtomicCounter).is_none());
        assert!(uploader_for(UniformKind::Unknown(42)).is_none());
    }

    #[test]
    fn shape_mismatch_is_an_operation_error() {
        let gl = RecordingGl::new();
        let upload = uploader_for(UniformKind::FloatVec2).unwrap();
        let err = upload(&gl, 1, 0, &UniformValue::F32(1.0)).unwrap_err();
        assert!(matches!(err, crate::GlError::Operation(_)));
        assert_eq!(gl.count_calls("uniform_f32v"), 0);
    }
}
