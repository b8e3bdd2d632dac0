//! Rendering subsystem
//!
//! OpenGL resource wrappers and the draw-time material/uniform contract.
//! Every GPU object (buffer, vertex array, texture, shader, program) has
//! exactly one owning wrapper which releases it exactly once on drop.

pub mod camera;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod shader;
pub mod texture;
pub mod window;

pub use camera::Camera;
pub use lighting::{DirectionalLight, SceneLighting};
pub use material::{default_exporter_overrides, resolve_texture_key, MaterialError, MaterialTable};
pub use mesh::{Mesh, MeshError, SubMesh, Vertex};
pub use shader::{Shader, ShaderError, ShaderProgram, ShaderStage, UniformValue};
pub use texture::{Texture, TextureError, TextureFormat};
pub use window::{Window, WindowError};

use std::rc::Rc;

/// Shared handle to the OpenGL function table
///
/// The engine is single-threaded; resource wrappers keep an `Rc` to the
/// context so they can release their GPU objects on drop.
pub type GlContext = Rc<glow::Context>;
