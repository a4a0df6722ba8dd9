//! GPU object layer for reticle.
//!
//! Everything the renderer touches on the GPU side goes through typed
//! wrappers built on top of a narrow native-interface trait:
//!
//! ```text
//!   Shader ──┐
//!            ├─▶ Program ──▶ Uniform cache ──▶ dispatch table ──▶ GlApi
//!   Buffer ──┤
//!   VertexArray
//! ```
//!
//! [`GlApi`] captures the raw driver surface (create/compile/link, uniform
//! reflection and upload, buffers, vertex arrays, draws); [`RawGl`] is the
//! production implementation over loaded OpenGL function pointers. Wrappers
//! own one native handle each and request deletion on drop. [`Catalog`]
//! indexes wrappers by their native handle with last-write-wins semantics.

mod api;
mod buffer;
mod catalog;
mod program;
mod raw;
mod shader;
mod uniform;
mod vao;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{
    BufferTarget, DeviceInfo, GlApi, RawHandle, ShaderStage, StageMask, UniformProps, NULL_HANDLE,
};
pub use buffer::Buffer;
pub use catalog::{Catalog, CatalogItem};
pub use program::Program;
pub use raw::RawGl;
pub use shader::Shader;
pub use uniform::{Uniform, UniformKind, UniformValue};
pub use vao::VertexArray;

/// Errors raised by the GPU object layer.
///
/// Everything propagates to the immediate caller; nothing here retries.
#[derive(Debug, thiserror::Error)]
pub enum GlError {
    /// The driver did not hand back a valid handle.
    #[error("failed to allocate a native {0} handle")]
    Creation(&'static str),
    /// A compile, link, or binary upload failed; carries the driver log.
    #[error("{stage} failed: {log}")]
    Build { stage: &'static str, log: String },
    /// The object is not in the state the operation requires.
    #[error("invalid object state: {0}")]
    State(&'static str),
    /// A runtime GL call could not be carried out as requested.
    #[error("GL operation failed: {0}")]
    Operation(String),
    /// `uniform_set` was handed a name the linked program does not expose.
    #[error("uniform `{0}` is not defined for this program")]
    UniformNotFound(String),
}
