//! Asset parsing
//!
//! CPU-side file parsing, kept separate from GPU resource creation so the
//! parsers stay pure and testable.

pub mod material_file;
pub mod obj_loader;

pub use material_file::{parse_material_file, MaterialFileData};
pub use obj_loader::{load_sub_meshes, ObjError, SubMeshData, DEFAULT_MATERIAL_NAME};
