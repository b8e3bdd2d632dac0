//! OBJ file loader for 3D models
//!
//! Extracts per-submesh geometry from a Wavefront OBJ file into CPU-side
//! buffers ready for GPU upload. Triangulation is deliberately left off: only
//! triangular faces contribute indices, everything else is skipped.

use crate::render::mesh::Vertex;
use std::path::Path;
use thiserror::Error;

/// Sentinel material tag used when a mesh declares no material
pub const DEFAULT_MATERIAL_NAME: &str = "default-grey.jpg";

/// OBJ loading errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// The file could not be opened or parsed
    #[error("Failed to load OBJ file: {0}")]
    Load(#[from] tobj::LoadError),

    /// The file parsed but contains no mesh data
    #[error("Model file contains no mesh data")]
    NoMeshes,
}

/// CPU-side geometry for one submesh, in source-file order
#[derive(Debug, Clone)]
pub struct SubMeshData {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle-list indices into `vertices`
    pub indices: Vec<u32>,
    /// Raw material-name tag declared by the source asset
    pub material_name: String,
}

/// Load all submeshes from an OBJ file
///
/// One `SubMeshData` per mesh entry in the file. Vertices without normals
/// default to world-up, vertices without texture coordinates to (0, 0), and
/// the V coordinate is flipped for GL's bottom-left image origin. Meshes with
/// no material (or an unresolvable material reference) are tagged with
/// [`DEFAULT_MATERIAL_NAME`].
pub fn load_sub_meshes<P: AsRef<Path>>(path: P) -> Result<Vec<SubMeshData>, ObjError> {
    let path = path.as_ref();

    let mut load_options = tobj::LoadOptions::default();
    load_options.single_index = true;
    load_options.ignore_points = true;
    load_options.ignore_lines = true;
    // triangulate stays off: non-triangular faces are skipped, not split

    let (models, materials) = tobj::load_obj(path, &load_options)?;

    // A missing or unreadable MTL reference only costs us material names
    let materials = materials.unwrap_or_else(|e| {
        log::warn!("Could not read materials referenced by {}: {}", path.display(), e);
        Vec::new()
    });

    let mut sub_meshes = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        if mesh.positions.is_empty() {
            continue;
        }

        let vertex_count = mesh.positions.len() / 3;
        let has_normals = mesh.normals.len() == mesh.positions.len();
        let has_texcoords = mesh.texcoords.len() / 2 == vertex_count && !mesh.texcoords.is_empty();

        let mut vertices = Vec::with_capacity(vertex_count);
        for v in 0..vertex_count {
            let position = [
                mesh.positions[3 * v],
                mesh.positions[3 * v + 1],
                mesh.positions[3 * v + 2],
                1.0,
            ];

            let normal = if has_normals {
                [
                    mesh.normals[3 * v],
                    mesh.normals[3 * v + 1],
                    mesh.normals[3 * v + 2],
                    0.0,
                ]
            } else {
                [0.0, 1.0, 0.0, 0.0]
            };

            let tex_coord = if has_texcoords {
                // Flip V: OBJ uses a bottom-left origin, our textures load top-down
                [mesh.texcoords[2 * v], 1.0 - mesh.texcoords[2 * v + 1]]
            } else {
                [0.0, 0.0]
            };

            vertices.push(Vertex {
                position,
                normal,
                tex_coord,
            });
        }

        let indices = gather_triangle_indices(&mesh.indices, &mesh.face_arities);

        let material_name = mesh
            .material_id
            .and_then(|id| materials.get(id))
            .map_or_else(|| DEFAULT_MATERIAL_NAME.to_string(), |m| m.name.clone());

        sub_meshes.push(SubMeshData {
            vertices,
            indices,
            material_name,
        });
    }

    if sub_meshes.is_empty() {
        return Err(ObjError::NoMeshes);
    }

    Ok(sub_meshes)
}

/// Collect indices of triangular faces only
///
/// `face_arities` is empty when every face in the source was already a
/// triangle; otherwise it gives the vertex count of each face in turn.
fn gather_triangle_indices(indices: &[u32], face_arities: &[u32]) -> Vec<u32> {
    if face_arities.is_empty() {
        return indices.chunks_exact(3).flatten().copied().collect();
    }

    let mut out = Vec::with_capacity(indices.len());
    let mut cursor = 0;
    for &arity in face_arities {
        let arity = arity as usize;
        if arity == 3 {
            out.extend_from_slice(&indices[cursor..cursor + 3]);
        }
        cursor += arity;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_obj(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_simple_triangle() {
        let dir = TempDir::new().unwrap();
        let path = write_obj(
            &dir,
            "tri.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nvn 0 0 1\nvn 0 0 1\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1/1 2/2/2 3/3/3\n",
        );

        let sub_meshes = load_sub_meshes(&path).unwrap();
        assert_eq!(sub_meshes.len(), 1);
        assert_eq!(sub_meshes[0].indices.len(), 3);
        assert_eq!(sub_meshes[0].vertices.len(), 3);

        for vertex in &sub_meshes[0].vertices {
            assert_eq!(vertex.position[3], 1.0);
            assert_eq!(vertex.normal[3], 0.0);
            assert_eq!(vertex.normal[..3], [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_quads_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_obj(
            &dir,
            "mixed.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 2 3 4\n",
        );

        let sub_meshes = load_sub_meshes(&path).unwrap();
        assert_eq!(sub_meshes.len(), 1);
        // Only the triangle contributes an index triple; the quad is skipped
        assert_eq!(sub_meshes[0].indices.len(), 3);
    }

    #[test]
    fn test_missing_normals_default_to_world_up() {
        let dir = TempDir::new().unwrap();
        let path = write_obj(&dir, "flat.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");

        let sub_meshes = load_sub_meshes(&path).unwrap();
        for vertex in &sub_meshes[0].vertices {
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0, 0.0]);
            assert_eq!(vertex.tex_coord, [0.0, 0.0]);
        }
    }

    #[test]
    fn test_uv_flip() {
        let dir = TempDir::new().unwrap();
        let path = write_obj(
            &dir,
            "uv.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.25 0.1\nvt 0.5 0.2\nvt 0.75 0.3\nf 1/1 2/2 3/3\n",
        );

        let sub_meshes = load_sub_meshes(&path).unwrap();
        let uvs: Vec<[f32; 2]> = sub_meshes[0].vertices.iter().map(|v| v.tex_coord).collect();
        let has_uv = |u: f32, v: f32| {
            uvs.iter()
                .any(|uv| (uv[0] - u).abs() < 1e-6 && (uv[1] - v).abs() < 1e-6)
        };
        assert!(has_uv(0.25, 0.9));
        assert!(has_uv(0.5, 0.8));
    }

    #[test]
    fn test_no_mesh_data_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_obj(&dir, "empty.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\n");

        let result = load_sub_meshes(&path);
        assert!(matches!(result, Err(ObjError::NoMeshes)));
    }

    #[test]
    fn test_missing_file_fails() {
        let result = load_sub_meshes("does/not/exist.obj");
        assert!(matches!(result, Err(ObjError::Load(_))));
    }

    #[test]
    fn test_material_name_from_mtl() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("ship.mtl"),
            "newmtl mat_0-texture014.jpg\nKd 1.0 1.0 1.0\n",
        )
        .unwrap();
        let path = write_obj(
            &dir,
            "ship.obj",
            "mtllib ship.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl mat_0-texture014.jpg\nf 1 2 3\n",
        );

        let sub_meshes = load_sub_meshes(&path).unwrap();
        assert_eq!(sub_meshes[0].material_name, "mat_0-texture014.jpg");
    }

    #[test]
    fn test_missing_material_uses_sentinel() {
        let dir = TempDir::new().unwrap();
        let path = write_obj(&dir, "plain.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");

        let sub_meshes = load_sub_meshes(&path).unwrap();
        assert_eq!(sub_meshes[0].material_name, DEFAULT_MATERIAL_NAME);
    }
}
