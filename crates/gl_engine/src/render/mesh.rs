//! Mesh representation and GPU geometry packaging
//!
//! A [`Mesh`] owns an ordered sequence of [`SubMesh`]es, one per mesh entry
//! in the source file. Each submesh owns its own vertex array, vertex buffer,
//! and index buffer, released exactly once when the mesh is dropped.

use bytemuck::{Pod, Zeroable};
use glow::HasContext;
use thiserror::Error;

use super::{GlContext, MaterialTable, ShaderProgram};
use crate::assets::obj_loader::{load_sub_meshes, ObjError, SubMeshData};

/// Mesh loading errors
#[derive(Error, Debug)]
pub enum MeshError {
    /// Geometry extraction from the model file failed
    #[error(transparent)]
    Obj(#[from] ObjError),

    /// The driver could not allocate a buffer or vertex array
    #[error("Failed to allocate GPU buffer: {0}")]
    Allocation(String),
}

/// Vertex layout for 3D models
///
/// Homogeneous position (w = 1) and direction normal (w = 0), plus a 2D
/// texture coordinate. `#[repr(C)]` keeps the layout stable for the GPU
/// upload: stride 40, offsets 0/16/32.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in model space (w = 1)
    pub position: [f32; 4],
    /// Normal direction (w = 0)
    pub normal: [f32; 4],
    /// Texture coordinate
    pub tex_coord: [f32; 2],
}

/// One independently drawable geometry unit within a mesh
///
/// Owns its GL vertex array and buffers plus the raw material-name tag copied
/// from the source asset.
pub struct SubMesh {
    gl: GlContext,
    vao: Option<glow::VertexArray>,
    vbo: Option<glow::Buffer>,
    ibo: Option<glow::Buffer>,
    index_count: i32,
    material_name: String,
}

impl SubMesh {
    fn upload(gl: &GlContext, data: &SubMeshData) -> Result<Self, MeshError> {
        // Handles are stored as they are created so a failure part-way leaves
        // Drop able to release exactly what was allocated
        let mut sub = Self {
            gl: gl.clone(),
            vao: None,
            vbo: None,
            ibo: None,
            index_count: data.indices.len() as i32,
            material_name: data.material_name.clone(),
        };

        unsafe {
            let vao = gl.create_vertex_array().map_err(MeshError::Allocation)?;
            sub.vao = Some(vao);
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer().map_err(MeshError::Allocation)?;
            sub.vbo = Some(vbo);
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&data.vertices),
                glow::STATIC_DRAW,
            );

            let stride = std::mem::size_of::<Vertex>() as i32;
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 4, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, true, stride, 16);
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(2, 2, glow::FLOAT, false, stride, 32);

            let ibo = gl.create_buffer().map_err(MeshError::Allocation)?;
            sub.ibo = Some(ibo);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&data.indices),
                glow::STATIC_DRAW,
            );

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        }

        Ok(sub)
    }

    /// Raw material-name tag from the source asset
    pub fn material_name(&self) -> &str {
        &self.material_name
    }

    /// Number of indices in the triangle list
    pub fn index_count(&self) -> i32 {
        self.index_count
    }
}

impl Drop for SubMesh {
    fn drop(&mut self) {
        // Tolerates handles that were never allocated
        unsafe {
            if let Some(vao) = self.vao.take() {
                self.gl.delete_vertex_array(vao);
            }
            if let Some(vbo) = self.vbo.take() {
                self.gl.delete_buffer(vbo);
            }
            if let Some(ibo) = self.ibo.take() {
                self.gl.delete_buffer(ibo);
            }
        }
    }
}

/// A 3D model with one or more submeshes
pub struct Mesh {
    gl: GlContext,
    sub_meshes: Vec<SubMesh>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new(gl: GlContext) -> Self {
        Self {
            gl,
            sub_meshes: Vec::new(),
        }
    }

    /// Load a model file, replacing any previously loaded geometry
    ///
    /// Builds one submesh per mesh entry in the file, in file order, and
    /// uploads the geometry with static usage. On any failure the mesh is
    /// left empty (previously loaded submeshes are released).
    pub fn initialise_from_file<P: AsRef<std::path::Path>>(
        &mut self,
        path: P,
    ) -> Result<(), MeshError> {
        // Re-entrant load: drop old GPU state before parsing the new file
        self.sub_meshes.clear();

        let data = load_sub_meshes(path)?;
        for sub_data in &data {
            match SubMesh::upload(&self.gl, sub_data) {
                Ok(sub) => self.sub_meshes.push(sub),
                Err(e) => {
                    self.sub_meshes.clear();
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Draw every submesh in load order
    ///
    /// Resolves and binds each submesh's material through `materials`, then
    /// issues an indexed triangle-list draw. Leaves no vertex array bound.
    /// Assumes `shader` is already bound for this frame.
    pub fn draw(&self, shader: &ShaderProgram, materials: &MaterialTable) {
        for sub in &self.sub_meshes {
            materials.apply(shader, &sub.material_name);

            unsafe {
                self.gl.bind_vertex_array(sub.vao);
                self.gl
                    .draw_elements(glow::TRIANGLES, sub.index_count, glow::UNSIGNED_INT, 0);
            }
        }

        unsafe {
            self.gl.bind_vertex_array(None);
        }
    }

    /// The loaded submeshes, in source-file order
    pub fn sub_meshes(&self) -> &[SubMesh] {
        &self.sub_meshes
    }

    /// Whether the mesh holds no geometry
    pub fn is_empty(&self) -> bool {
        self.sub_meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        // The GPU attribute pointers rely on this exact layout
        assert_eq!(std::mem::size_of::<Vertex>(), 40);

        let vertex = Vertex {
            position: [1.0, 2.0, 3.0, 1.0],
            normal: [0.0, 1.0, 0.0, 0.0],
            tex_coord: [0.5, 0.25],
        };
        let bytes: &[u8] = bytemuck::bytes_of(&vertex);
        assert_eq!(bytes.len(), 40);

        // Position at offset 0, normal at 16, tex coord at 32
        let floats: &[f32] = bytemuck::cast_slice(bytes);
        assert_eq!(floats[0..4], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(floats[4..8], [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(floats[8..10], [0.5, 0.25]);
    }
}
