//! Vertex array object wrapper.

use std::rc::Rc;

use crate::api::{GlApi, RawHandle, NULL_HANDLE};
use crate::catalog::CatalogItem;
use crate::GlError;

pub struct VertexArray {
    gl: Rc<dyn GlApi>,
    handle: RawHandle,
}

impl VertexArray {
    pub fn create(gl: Rc<dyn GlApi>) -> Result<Self, GlError> {
        let handle = gl.create_vertex_array();
        if handle == NULL_HANDLE {
            return Err(GlError::Creation("vertex array"));
        }
        Ok(Self { gl, handle })
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(self.handle);
    }

    pub fn unbind(&self) {
        self.gl.bind_vertex_array(NULL_HANDLE);
    }

    /// Declares a float attribute on the currently bound vertex buffer and
    /// enables it. Stride and offset are in bytes.
    pub fn float_attribute(&self, index: u32, components: i32, stride: i32, offset: usize) {
        self.gl
            .float_attribute_pointer(index, components, stride, offset);
        self.gl.enable_attribute(index);
    }
}

impl CatalogItem for VertexArray {
    fn handle(&self) -> RawHandle {
        self.handle
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.handle);
    }
}
