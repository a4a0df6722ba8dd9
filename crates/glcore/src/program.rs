//! Program object wrapper and its link/reflect state machine.
//!
//! A program moves Unlinked → Linked on a successful `build` and falls
//! back to Unlinked whenever its shader set changes or a rebuild fails.
//! Shaders are attached only for the duration of the link and detached
//! unconditionally afterwards — a program never keeps shaders attached,
//! even when the link fails.

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

use crate::api::{GlApi, RawHandle, NULL_HANDLE};
use crate::catalog::{Catalog, CatalogItem};
use crate::shader::Shader;
use crate::uniform::{uploader_for, Uniform, UniformValue};
use crate::GlError;

pub struct Program {
    gl: Rc<dyn GlApi>,
    handle: RawHandle,
    shaders: Catalog<Shader>,
    linked: bool,
    uniforms: BTreeMap<String, Uniform>,
}

impl Program {
    /// Creates an empty, unlinked program object.
    pub fn create(gl: Rc<dyn GlApi>) -> Result<Self, GlError> {
        let handle = gl.create_program();
        if handle == NULL_HANDLE {
            return Err(GlError::Creation("program"));
        }
        Ok(Self {
            gl,
            handle,
            shaders: Catalog::new(),
            linked: false,
            uniforms: BTreeMap::new(),
        })
    }

    /// Adds (or replaces, by handle) a shader. Any change to the shader set
    /// unlinks the program and wipes the uniform cache.
    pub fn add_shader(&mut self, shader: Shader) -> RawHandle {
        self.linked = false;
        self.uniforms.clear();
        self.shaders.insert(shader)
    }

    pub fn shaders(&self) -> &Catalog<Shader> {
        &self.shaders
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Attaches every shader, links, then detaches every shader regardless
    /// of the link outcome.
    pub fn build(&mut self) -> Result<(), GlError> {
        if self.shaders.is_empty() {
            return Err(GlError::State("no shaders to link"));
        }

        for shader in self.shaders.handles() {
            self.gl.attach_shader(self.handle, shader);
        }
        self.gl.link_program(self.handle);
        // Collect the outcome now; detach must happen either way.
        let linked = self.gl.link_status(self.handle);
        for shader in self.shaders.handles() {
            self.gl.detach_shader(self.handle, shader);
        }

        if !linked {
            self.linked = false;
            self.uniforms.clear();
            return Err(GlError::Build {
                stage: "program link",
                log: self.gl.program_info_log(self.handle),
            });
        }

        self.linked = true;
        let count = self.reload_uniforms();
        debug!(handle = self.handle, uniforms = count, "program linked");
        Ok(())
    }

    /// Rebuilds the uniform cache from reflection. On an unlinked program
    /// the cache is simply wiped. Returns the number of uniforms loaded.
    pub fn reload_uniforms(&mut self) -> usize {
        self.uniforms.clear();

        if !self.linked {
            debug!(handle = self.handle, "program not linked, uniform cache emptied");
            return 0;
        }

        let count = self.gl.active_uniform_count(self.handle);
        for index in 0..count {
            let props = self.gl.uniform_properties(self.handle, index);
            let uniform = Uniform::from_props(props);
            self.uniforms.insert(uniform.name().to_owned(), uniform);
        }

        self.uniforms.len()
    }

    /// Read-only view of the uniform cache.
    pub fn uniforms(&self) -> impl Iterator<Item = &Uniform> {
        self.uniforms.values()
    }

    pub fn uniform(&self, name: &str) -> Option<&Uniform> {
        self.uniforms.get(name)
    }

    /// Uploads `value` to the named uniform through the type dispatch
    /// table. The value passes through unchanged; matching the declared
    /// shape is the caller's responsibility.
    pub fn uniform_set(&self, name: &str, value: UniformValue) -> Result<(), GlError> {
        let uniform = self
            .uniforms
            .get(name)
            .ok_or_else(|| GlError::UniformNotFound(name.to_owned()))?;
        let upload = uploader_for(uniform.kind()).ok_or_else(|| {
            GlError::Operation(format!(
                "no upload path for {:?} uniform `{name}`",
                uniform.kind()
            ))
        })?;
        upload(self.gl.as_ref(), self.handle, uniform.location(), &value)
    }

    /// Makes this program current. Requires a linked program.
    pub fn activate(&self) -> Result<(), GlError> {
        if !self.linked {
            return Err(GlError::State("program is not linked"));
        }
        self.gl.use_program(self.handle);
        Ok(())
    }

    /// Fetches the driver binary as a (format, image) pair.
    pub fn binary(&self) -> Result<(u32, Vec<u8>), GlError> {
        if !self.linked {
            return Err(GlError::State("program is not linked"));
        }
        Ok(self.gl.program_binary(self.handle))
    }

    /// Replaces the program with a previously fetched binary. The uniform
    /// cache is reloaded before the link status is checked, so a failed
    /// upload still leaves the cache consistent (empty).
    pub fn set_binary(&mut self, format: u32, image: &[u8]) -> Result<(), GlError> {
        self.gl.set_program_binary(self.handle, format, image);
        self.linked = self.gl.link_status(self.handle);
        self.reload_uniforms();

        if self.linked {
            Ok(())
        } else {
            Err(GlError::Build {
                stage: "program binary upload",
                log: self.gl.program_info_log(self.handle),
            })
        }
    }

    pub fn info_log(&self) -> String {
        self.gl.program_info_log(self.handle)
    }
}

impl CatalogItem for Program {
    fn handle(&self) -> RawHandle {
        self.handle
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("handle", &self.handle)
            .field("shaders", &self.shaders.len())
            .field("linked", &self.linked)
            .field("uniforms", &self.uniforms.len())
            .finish()
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        self.gl.delete_program(self.handle);
    }
}
