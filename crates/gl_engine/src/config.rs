//! Application configuration
//!
//! TOML-backed configuration for the window, shader paths, and scene assets.
//! Every field has a default matching the demo's asset layout, so a missing
//! config file is not an error.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file contents are not valid TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configured path does not exist
    #[error("Configured path not found: {0}")]
    MissingPath(String),
}

/// Window creation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Real-Time 3D OpenGL Application - LowPoly Pirate Ship".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Shader source file paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderConfig {
    /// Path to the vertex shader source
    pub vertex_shader_path: String,
    /// Path to the fragment shader source
    pub fragment_shader_path: String,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            vertex_shader_path: "shaders/phong.vert".to_string(),
            fragment_shader_path: "shaders/phong.frag".to_string(),
        }
    }
}

impl ShaderConfig {
    /// Create a new shader configuration
    pub fn new(vertex_path: impl Into<String>, fragment_path: impl Into<String>) -> Self {
        Self {
            vertex_shader_path: vertex_path.into(),
            fragment_shader_path: fragment_path.into(),
        }
    }
}

/// Model and material paths for one scene object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObjectConfig {
    /// Path to the model file
    pub model_path: String,
    /// Path to the material description file
    pub material_path: String,
    /// Texture coordinate tiling factor applied when drawing
    pub tiling_factor: f32,
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Window parameters
    #[serde(default)]
    pub window: WindowConfig,
    /// Shader source paths
    #[serde(default)]
    pub shaders: ShaderConfig,
    /// Ship model configuration
    #[serde(default = "ApplicationConfig::default_ship")]
    pub ship: SceneObjectConfig,
    /// Ocean model configuration
    #[serde(default = "ApplicationConfig::default_ocean")]
    pub ocean: SceneObjectConfig,
}

impl ApplicationConfig {
    fn default_ship() -> SceneObjectConfig {
        SceneObjectConfig {
            model_path: "assets/pirate_ship/pirate_ship.obj".to_string(),
            material_path: "assets/pirate_ship/pirate_ship.mtl".to_string(),
            tiling_factor: 1.0,
        }
    }

    fn default_ocean() -> SceneObjectConfig {
        SceneObjectConfig {
            model_path: "assets/ocean/Ocean.obj".to_string(),
            material_path: "assets/ocean/Ocean.obj.sxfil.mtl".to_string(),
            tiling_factor: 5.0,
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("Loading config from {}", path.display());
            Self::load(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate that all configured asset paths exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [
            &self.shaders.vertex_shader_path,
            &self.shaders.fragment_shader_path,
            &self.ship.model_path,
            &self.ship.material_path,
            &self.ocean.model_path,
            &self.ocean.material_path,
        ] {
            if !Path::new(path).exists() {
                return Err(ConfigError::MissingPath(path.clone()));
            }
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            shaders: ShaderConfig::default(),
            ship: Self::default_ship(),
            ocean: Self::default_ocean(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ApplicationConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.ship.tiling_factor, 1.0);
        assert_eq!(config.ocean.tiling_factor, 5.0);
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[window]
title = "Test"
width = 800
height = 600
"#
        )
        .unwrap();

        let config = ApplicationConfig::load(file.path()).unwrap();
        assert_eq!(config.window.title, "Test");
        assert_eq!(config.window.width, 800);
        // Unspecified sections fall back to defaults
        assert_eq!(config.shaders.vertex_shader_path, "shaders/phong.vert");
        assert!(config.ocean.model_path.contains("Ocean.obj"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ApplicationConfig::load_or_default("does/not/exist.toml").unwrap();
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not [valid toml").unwrap();
        assert!(ApplicationConfig::load(file.path()).is_err());
    }
}
