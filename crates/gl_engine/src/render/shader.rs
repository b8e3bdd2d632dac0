//! Shader compilation and the uniform binding contract
//!
//! A [`ShaderProgram`] owns up to one compiled [`Shader`] per pipeline stage
//! and, once linked, a GL program object. Uniforms are bound by name (with a
//! per-program location cache) or by a pre-resolved location for hot paths.
//! A missing uniform is a warning, not an error: shader variants that
//! optimize a uniform out must not break the draw loop.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glow::HasContext;
use thiserror::Error;

use super::GlContext;
use crate::foundation::math::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

/// Shader compilation and linking errors
#[derive(Error, Debug)]
pub enum ShaderError {
    /// Shader source file could not be read
    #[error("Failed to read shader file {path}: {source}")]
    Io {
        /// Path of the unreadable file
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Shader source file was empty
    #[error("Shader file is empty: {0}")]
    EmptySource(String),

    /// The driver could not allocate a shader or program object
    #[error("Failed to allocate shader object: {0}")]
    Allocation(String),

    /// Compilation failed; carries the driver's info log
    #[error("{stage:?} shader compilation failed: {log}")]
    Compile {
        /// Stage that failed to compile
        stage: ShaderStage,
        /// Driver-provided diagnostic text
        log: String,
    },

    /// Linking failed; carries the driver's info log
    #[error("Shader program link failed: {0}")]
    Link(String),
}

/// Programmable pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Tessellation evaluation shader
    TessellationEvaluation,
    /// Tessellation control shader
    TessellationControl,
    /// Geometry shader
    Geometry,
    /// Fragment shader
    Fragment,
}

impl ShaderStage {
    /// Number of distinct stages
    pub const COUNT: usize = 5;

    fn index(self) -> usize {
        match self {
            Self::Vertex => 0,
            Self::TessellationEvaluation => 1,
            Self::TessellationControl => 2,
            Self::Geometry => 3,
            Self::Fragment => 4,
        }
    }

    fn gl_type(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::TessellationEvaluation => glow::TESS_EVALUATION_SHADER,
            Self::TessellationControl => glow::TESS_CONTROL_SHADER,
            Self::Geometry => glow::GEOMETRY_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

/// A single compiled shader stage
pub struct Shader {
    gl: GlContext,
    handle: glow::Shader,
    stage: ShaderStage,
}

impl Shader {
    /// Compile a shader stage from source text
    pub fn from_source(gl: GlContext, stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        let handle = unsafe { gl.create_shader(stage.gl_type()) }.map_err(ShaderError::Allocation)?;

        unsafe {
            gl.shader_source(handle, source);
            gl.compile_shader(handle);

            if !gl.get_shader_compile_status(handle) {
                let log = gl.get_shader_info_log(handle);
                gl.delete_shader(handle);
                return Err(ShaderError::Compile { stage, log });
            }
        }

        Ok(Self { gl, handle, stage })
    }

    /// Load and compile a shader stage from a file
    pub fn from_file<P: AsRef<Path>>(
        gl: GlContext,
        stage: ShaderStage,
        path: P,
    ) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.display().to_string(),
            source,
        })?;

        if source.trim().is_empty() {
            return Err(ShaderError::EmptySource(path.display().to_string()));
        }

        Self::from_source(gl, stage, &source)
    }

    /// The pipeline stage this shader was compiled for
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn handle(&self) -> glow::Shader {
        self.handle
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.handle);
        }
    }
}

/// A linked shader program with a typed uniform-binding contract
///
/// Uniform binds are only valid after a successful [`link`](Self::link);
/// binding earlier is a programming error and fails loudly.
pub struct ShaderProgram {
    gl: GlContext,
    stages: [Option<Shader>; ShaderStage::COUNT],
    program: Option<glow::Program>,
    // Name lookups hit the driver once per uniform, then come from here.
    uniform_cache: RefCell<HashMap<String, Option<glow::UniformLocation>>>,
}

impl ShaderProgram {
    /// Create an empty, unlinked program
    pub fn new(gl: GlContext) -> Self {
        Self {
            gl,
            stages: [None, None, None, None, None],
            program: None,
            uniform_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Load and compile a stage from a file
    ///
    /// A failed compile is reported in the returned error (with the driver's
    /// diagnostic text) and leaves any previously compiled stage in place.
    pub fn load_shader<P: AsRef<Path>>(
        &mut self,
        stage: ShaderStage,
        path: P,
    ) -> Result<(), ShaderError> {
        let shader = Shader::from_file(self.gl.clone(), stage, path)?;
        self.stages[stage.index()] = Some(shader);
        Ok(())
    }

    /// Compile a stage from source text
    pub fn create_shader(&mut self, stage: ShaderStage, source: &str) -> Result<(), ShaderError> {
        let shader = Shader::from_source(self.gl.clone(), stage, source)?;
        self.stages[stage.index()] = Some(shader);
        Ok(())
    }

    /// Attach every compiled stage and link the program
    ///
    /// On failure the program stays unusable and the driver's info log is
    /// carried in the error. Relinking clears the uniform location cache.
    pub fn link(&mut self) -> Result<(), ShaderError> {
        let program = unsafe { self.gl.create_program() }.map_err(ShaderError::Allocation)?;

        unsafe {
            for shader in self.stages.iter().flatten() {
                self.gl.attach_shader(program, shader.handle());
            }
            self.gl.link_program(program);

            if !self.gl.get_program_link_status(program) {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(ShaderError::Link(log));
            }
        }

        self.uniform_cache.borrow_mut().clear();
        if let Some(old) = self.program.take() {
            unsafe { self.gl.delete_program(old) };
        }
        self.program = Some(program);
        Ok(())
    }

    /// Whether [`link`](Self::link) has succeeded
    pub fn is_linked(&self) -> bool {
        self.program.is_some()
    }

    /// Make this program current
    ///
    /// # Panics
    /// Panics if the program was never successfully linked.
    pub fn bind(&self) {
        let program = self
            .program
            .expect("ShaderProgram::bind called before a successful link");
        unsafe {
            self.gl.use_program(Some(program));
        }
    }

    /// Resolve a uniform name to its location, if the program declares it
    ///
    /// Locations are cached per program; the cache is invalidated on relink.
    ///
    /// # Panics
    /// Panics if the program was never successfully linked.
    pub fn uniform_location(&self, name: &str) -> Option<glow::UniformLocation> {
        let program = self
            .program
            .expect("Uniform lookup before a successful link");

        if let Some(cached) = self.uniform_cache.borrow().get(name) {
            return cached.clone();
        }

        let location = unsafe { self.gl.get_uniform_location(program, name) };
        self.uniform_cache
            .borrow_mut()
            .insert(name.to_string(), location.clone());
        location
    }

    /// Bind a uniform by name
    ///
    /// Returns `false` (after logging a warning) when the program does not
    /// declare the uniform — tolerated so shader variants that optimize a
    /// uniform out keep drawing.
    ///
    /// # Panics
    /// Panics if the program was never successfully linked.
    pub fn bind_uniform<T: UniformValue>(&self, name: &str, value: T) -> bool {
        match self.uniform_location(name) {
            Some(location) => {
                value.apply(&self.gl, &location);
                true
            }
            None => {
                log::warn!("Shader uniform [{name}] not found! Is it being used?");
                false
            }
        }
    }

    /// Bind a uniform by pre-resolved location, skipping the name lookup
    pub fn bind_uniform_at<T: UniformValue>(&self, location: &glow::UniformLocation, value: T) {
        value.apply(&self.gl, location);
    }

    /// Read back a mat4 uniform from the driver
    ///
    /// Values come back in the same column-major layout the upload used.
    ///
    /// # Panics
    /// Panics if the program was never successfully linked.
    pub fn read_uniform_mat4(&self, location: &glow::UniformLocation) -> Mat4 {
        let program = self
            .program
            .expect("Uniform readback before a successful link");
        let mut values = [0.0_f32; 16];
        unsafe {
            self.gl.get_uniform_f32(program, location, &mut values);
        }
        Mat4::from_column_slice(&values)
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if let Some(program) = self.program.take() {
            unsafe {
                self.gl.delete_program(program);
            }
        }
    }
}

/// A value that can be uploaded to a shader uniform
///
/// Implemented for scalars, vectors, matrices, and slices of each (fixed-count
/// uniform arrays). Matrices upload in nalgebra's native column-major layout.
pub trait UniformValue {
    /// Upload this value to the given location of the current program
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

impl UniformValue for i32 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_1_i32(Some(location), *self) }
    }
}

impl UniformValue for f32 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_1_f32(Some(location), *self) }
    }
}

impl UniformValue for Vec2 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_2_f32(Some(location), self.x, self.y) }
    }
}

impl UniformValue for Vec3 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_3_f32(Some(location), self.x, self.y, self.z) }
    }
}

impl UniformValue for Vec4 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_4_f32(Some(location), self.x, self.y, self.z, self.w) }
    }
}

impl UniformValue for Mat2 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_matrix_2_f32_slice(Some(location), false, self.as_slice()) }
    }
}

impl UniformValue for Mat3 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_matrix_3_f32_slice(Some(location), false, self.as_slice()) }
    }
}

impl UniformValue for Mat4 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_matrix_4_f32_slice(Some(location), false, self.as_slice()) }
    }
}

impl UniformValue for &[i32] {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_1_i32_slice(Some(location), self) }
    }
}

impl UniformValue for &[f32] {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe { gl.uniform_1_f32_slice(Some(location), self) }
    }
}

impl UniformValue for &[Vec2] {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        let flat: Vec<f32> = self.iter().flat_map(|v| [v.x, v.y]).collect();
        unsafe { gl.uniform_2_f32_slice(Some(location), &flat) }
    }
}

impl UniformValue for &[Vec3] {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        let flat: Vec<f32> = self.iter().flat_map(|v| [v.x, v.y, v.z]).collect();
        unsafe { gl.uniform_3_f32_slice(Some(location), &flat) }
    }
}

impl UniformValue for &[Vec4] {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        let flat: Vec<f32> = self.iter().flat_map(|v| [v.x, v.y, v.z, v.w]).collect();
        unsafe { gl.uniform_4_f32_slice(Some(location), &flat) }
    }
}

impl UniformValue for &[Mat2] {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        let flat: Vec<f32> = self.iter().flat_map(|m| m.as_slice().to_vec()).collect();
        unsafe { gl.uniform_matrix_2_f32_slice(Some(location), false, &flat) }
    }
}

impl UniformValue for &[Mat3] {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        let flat: Vec<f32> = self.iter().flat_map(|m| m.as_slice().to_vec()).collect();
        unsafe { gl.uniform_matrix_3_f32_slice(Some(location), false, &flat) }
    }
}

impl UniformValue for &[Mat4] {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        let flat: Vec<f32> = self.iter().flat_map(|m| m.as_slice().to_vec()).collect();
        unsafe { gl.uniform_matrix_4_f32_slice(Some(location), false, &flat) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stage_indices_are_distinct() {
        let stages = [
            ShaderStage::Vertex,
            ShaderStage::TessellationEvaluation,
            ShaderStage::TessellationControl,
            ShaderStage::Geometry,
            ShaderStage::Fragment,
        ];
        let mut seen = [false; ShaderStage::COUNT];
        for stage in stages {
            assert!(!seen[stage.index()]);
            seen[stage.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_mat4_column_major_round_trip() {
        // The same column-major layout feeds both the upload and the driver
        // readback path, so a slice round trip must be lossless.
        let m = Mat4::new_perspective(16.0 / 9.0, 0.9, 0.1, 1000.0)
            * Mat4::new_translation(&Vec3::new(1.5, -2.25, 3.0));
        let slice: Vec<f32> = m.as_slice().to_vec();
        assert_eq!(slice.len(), 16);

        let restored = Mat4::from_column_slice(&slice);
        assert_relative_eq!(m, restored);
    }
}
