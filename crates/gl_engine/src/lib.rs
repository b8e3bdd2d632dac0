//! # GL Engine
//!
//! A small OpenGL rendering engine for loading and drawing textured
//! multi-submesh models with a single-pass Phong lighting pipeline.
//!
//! ## Features
//!
//! - **Mesh Loading**: Wavefront OBJ import with per-submesh materials
//! - **Material System**: Line-oriented material files with texture maps
//! - **Shader Binding**: Typed uniform contract with name or location lookup
//! - **Resource Safety**: Every GPU object has exactly one owner and is
//!   released exactly once
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gl_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut window = Window::new("Demo", 1280, 720)?;
//!     let gl = window.create_gl_context();
//!
//!     let mut shader = ShaderProgram::new(gl.clone());
//!     shader.load_shader(ShaderStage::Vertex, "shaders/phong.vert")?;
//!     shader.load_shader(ShaderStage::Fragment, "shaders/phong.frag")?;
//!     shader.link()?;
//!
//!     let mut mesh = Mesh::new(gl.clone());
//!     mesh.initialise_from_file("models/ship.obj")?;
//!
//!     let mut materials = MaterialTable::new(gl.clone());
//!     materials.load_material("models/ship.mtl")?;
//!
//!     while !window.should_close() {
//!         window.poll_events();
//!         shader.bind();
//!         mesh.draw(&shader, &materials);
//!         window.swap_buffers();
//!     }
//!     Ok(())
//! }
//! ```

pub mod foundation;
pub mod assets;
pub mod render;

mod config;

pub use config::{ApplicationConfig, ConfigError, SceneObjectConfig, ShaderConfig, WindowConfig};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{MaterialFileData, SubMeshData},
        config::{ApplicationConfig, ShaderConfig, WindowConfig},
        foundation::{
            math::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4},
            time::Timer,
        },
        render::{
            Camera, DirectionalLight, GlContext, MaterialTable, Mesh, SceneLighting, Shader,
            ShaderProgram, ShaderStage, Texture, TextureFormat, Window,
        },
    };
}
