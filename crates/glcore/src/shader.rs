//! Shader object wrapper.

use std::rc::Rc;

use tracing::debug;

use crate::api::{GlApi, RawHandle, ShaderStage, NULL_HANDLE};
use crate::catalog::CatalogItem;
use crate::GlError;

/// One compiled shader object. Compiles at construction and again whenever
/// the source is replaced; a failed compile surfaces the driver log.
pub struct Shader {
    gl: Rc<dyn GlApi>,
    handle: RawHandle,
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

impl Shader {
    /// Creates a shader of `stage` and compiles `source` synchronously.
    pub fn compile(
        gl: Rc<dyn GlApi>,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self, GlError> {
        let handle = gl.create_shader(stage);
        if handle == NULL_HANDLE {
            return Err(GlError::Creation("shader"));
        }

        let mut shader = Self {
            gl,
            handle,
            stage,
            source: String::new(),
            compiled: false,
        };
        // A failed compile drops the wrapper, which deletes the handle.
        shader.set_source(source)?;
        debug!(handle, stage = %stage, "shader compiled");
        Ok(shader)
    }

    /// Replaces the source text and recompiles immediately.
    pub fn set_source(&mut self, source: &str) -> Result<(), GlError> {
        self.source = source.to_owned();
        self.gl.shader_source(self.handle, &self.source);
        self.gl.compile_shader(self.handle);
        if self.gl.compile_status(self.handle) {
            self.compiled = true;
            Ok(())
        } else {
            self.compiled = false;
            Err(GlError::Build {
                stage: "shader compile",
                log: self.gl.shader_info_log(self.handle),
            })
        }
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Current driver diagnostic text for this shader.
    pub fn info_log(&self) -> String {
        self.gl.shader_info_log(self.handle)
    }
}

impl CatalogItem for Shader {
    fn handle(&self) -> RawHandle {
        self.handle
    }
}

impl std::fmt::Debug for Shader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shader")
            .field("handle", &self.handle)
            .field("stage", &self.stage)
            .field("source_len", &self.source.len())
            .field("compiled", &self.compiled)
            .finish()
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        // Best-effort; the driver ignores deletes of dead handles.
        self.gl.delete_shader(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingGl;

    #[test]
    fn compiles_and_records_state() {
        let gl = Rc::new(RecordingGl::new());
        let shader = Shader::compile(gl.clone(), ShaderStage::Vertex, "void main() {}")
            .expect("compile");

        assert!(shader.is_compiled());
        assert_eq!(shader.stage(), ShaderStage::Vertex);
        assert_eq!(shader.source(), "void main() {}");
        assert_eq!(gl.count_calls("compile_shader"), 1);
    }

    #[test]
    fn creation_failure_is_a_creation_error() {
        let gl = Rc::new(RecordingGl::new());
        gl.fail_next_create.set(true);

        let err = Shader::compile(gl, ShaderStage::Fragment, "x").unwrap_err();
        assert!(matches!(err, GlError::Creation("shader")));
    }

    #[test]
    fn compile_failure_carries_the_driver_log() {
        let gl = Rc::new(RecordingGl::new());
        gl.fail_compile.set(true);

        let err = Shader::compile(gl.clone(), ShaderStage::Vertex, "broken").unwrap_err();
        match err {
            GlError::Build { stage, log } => {
                assert_eq!(stage, "shader compile");
                assert!(log.contains("compile"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // The failed wrapper was dropped, deleting its handle.
        assert_eq!(gl.count_calls("delete_shader"), 1);
    }

    #[test]
    fn recompile_failure_clears_the_compiled_flag() {
        let gl = Rc::new(RecordingGl::new());
        let mut shader =
            Shader::compile(gl.clone(), ShaderStage::Vertex, "void main() {}").unwrap();

        gl.fail_compile.set(true);
        assert!(shader.set_source("nonsense").is_err());
        assert!(!shader.is_compiled());
        assert_eq!(shader.source(), "nonsense");
    }

    #[test]
    fn drop_requests_native_deletion() {
        let gl = Rc::new(RecordingGl::new());
        let shader = Shader::compile(gl.clone(), ShaderStage::Vertex, "void main() {}").unwrap();
        drop(shader);
        assert_eq!(gl.count_calls("delete_shader"), 1);
    }
}
