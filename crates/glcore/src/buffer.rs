//! Buffer object wrapper.
//!
//! Buffers are immutable once uploaded: content is fixed at creation, and
//! "mutating" one means creating a new buffer. The wrapper remembers the
//! byte size, the target it was last bound to, and optionally a CPU-side
//! copy of the data.

use std::rc::Rc;

use crate::api::{BufferTarget, GlApi, RawHandle, NULL_HANDLE};
use crate::catalog::CatalogItem;
use crate::GlError;

pub struct Buffer {
    gl: Rc<dyn GlApi>,
    handle: RawHandle,
    target: BufferTarget,
    len: usize,
    retained: Option<Vec<u8>>,
}

impl Buffer {
    /// Creates a buffer, binds it to `target`, and uploads `data` once.
    /// Set `retain` to keep a CPU-side copy alongside the GPU storage.
    pub fn with_data(
        gl: Rc<dyn GlApi>,
        target: BufferTarget,
        data: &[u8],
        retain: bool,
    ) -> Result<Self, GlError> {
        let handle = gl.create_buffer();
        if handle == NULL_HANDLE {
            return Err(GlError::Creation("buffer"));
        }

        gl.bind_buffer(target, handle);
        gl.buffer_data(target, data);

        Ok(Self {
            gl,
            handle,
            target,
            len: data.len(),
            retained: retain.then(|| data.to_vec()),
        })
    }

    /// Uploads a float slice (vertex data).
    pub fn from_f32s(
        gl: Rc<dyn GlApi>,
        target: BufferTarget,
        data: &[f32],
        retain: bool,
    ) -> Result<Self, GlError> {
        Self::with_data(gl, target, bytemuck::cast_slice(data), retain)
    }

    /// Uploads a u32 slice (index data).
    pub fn from_u32s(
        gl: Rc<dyn GlApi>,
        target: BufferTarget,
        data: &[u32],
        retain: bool,
    ) -> Result<Self, GlError> {
        Self::with_data(gl, target, bytemuck::cast_slice(data), retain)
    }

    /// Rebinds the buffer to the target it was created against.
    pub fn bind(&self) {
        self.gl.bind_buffer(self.target, self.handle);
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    /// Size of the uploaded content in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The retained CPU-side copy, if one was requested at creation.
    pub fn retained(&self) -> Option<&[u8]> {
        self.retained.as_deref()
    }
}

impl CatalogItem for Buffer {
    fn handle(&self) -> RawHandle {
        self.handle
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("handle", &self.handle)
            .field("target", &self.target)
            .field("len", &self.len)
            .field("retained", &self.retained.is_some())
            .finish()
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.handle);
    }
}
