//! Material table and texture-name resolution
//!
//! A [`MaterialTable`] owns the reflectance coefficients and the textures
//! referenced by one material file, keyed by filename. At draw time a
//! submesh's raw material tag is resolved to a texture key by
//! [`resolve_texture_key`], which undoes exporter-dependent naming
//! conventions before the lookup.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use super::{GlContext, ShaderProgram, Texture};
use crate::assets::material_file::parse_material_file;
use crate::assets::DEFAULT_MATERIAL_NAME;
use crate::foundation::math::Vec3;

/// Material loading errors
#[derive(Error, Debug)]
pub enum MaterialError {
    /// The material file could not be opened or read
    #[error("Failed to open material file {path}: {source}")]
    Io {
        /// Path of the unreadable file
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Exporter material names with known canonical texture paths
///
/// The only entry today covers the ocean asset pipeline, whose exporter tags
/// materials `mtl_NNN` without carrying the texture filename.
pub fn default_exporter_overrides() -> Vec<(String, String)> {
    vec![("mtl_001".to_string(), "./textures/txt_001_diff.png".to_string())]
}

/// Resolve a raw material tag to a texture key
///
/// Deterministic and pure. Undoes two exporter conventions, in order:
///
/// 1. `mat_` tags encode a material index before the real texture filename
///    (`mat_0-texture014.jpg` → `texture014.jpg`); everything up to and
///    including the first `-` after the prefix is stripped. A `mat_` tag
///    without a `-` passes through unmodified.
/// 2. `mtl_` tags are looked up in the override table; unknown tags pass
///    through unmodified.
///
/// Any other tag is already a texture key and passes through unmodified.
pub fn resolve_texture_key<'a>(tag: &'a str, overrides: &'a [(String, String)]) -> &'a str {
    if let Some(rest) = tag.strip_prefix("mat_") {
        match rest.find('-') {
            Some(dash) => &rest[dash + 1..],
            None => tag,
        }
    } else if tag.starts_with("mtl_") {
        overrides
            .iter()
            .find(|(name, _)| name == tag)
            .map_or(tag, |(_, path)| path.as_str())
    } else {
        tag
    }
}

/// Reflectance coefficients and textures for one loaded material file
pub struct MaterialTable {
    gl: GlContext,
    ambient: Vec3,
    diffuse: Vec3,
    specular: Vec3,
    specular_power: f32,
    textures: HashMap<String, Texture>,
    exporter_overrides: Vec<(String, String)>,
}

impl MaterialTable {
    /// Create a table with default reflectance and the stock exporter overrides
    pub fn new(gl: GlContext) -> Self {
        Self::with_overrides(gl, default_exporter_overrides())
    }

    /// Create a table with a custom exporter override mapping
    pub fn with_overrides(gl: GlContext, exporter_overrides: Vec<(String, String)>) -> Self {
        Self {
            gl,
            ambient: Vec3::new(0.1, 0.1, 0.1),
            diffuse: Vec3::new(1.0, 1.0, 1.0),
            specular: Vec3::new(1.0, 1.0, 1.0),
            specular_power: 32.0,
            textures: HashMap::new(),
            exporter_overrides,
        }
    }

    /// Load a material description file
    ///
    /// Parses the recognized directives best-effort (see
    /// [`parse_material_file`]) and loads each `map_Kd` image, relative to the
    /// material file's directory, into a texture keyed by the filename as
    /// written. A texture that fails to decode is logged and kept as an
    /// uninitialized entry; the parse still runs to end of file. A file that
    /// cannot be opened returns an error and leaves the table untouched.
    pub fn load_material<P: AsRef<Path>>(&mut self, path: P) -> Result<(), MaterialError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| MaterialError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        let data = parse_material_file(&contents);

        if let Some(value) = data.ambient {
            self.ambient = value;
        }
        if let Some(value) = data.diffuse {
            self.diffuse = value;
        }
        if let Some(value) = data.specular {
            self.specular = value;
        }
        if let Some(value) = data.specular_power {
            self.specular_power = value;
        }

        for file_name in data.diffuse_maps {
            let texture_path = directory.join(&file_name);
            let mut texture = Texture::new(self.gl.clone());
            if let Err(e) = texture.load(&texture_path) {
                log::error!("Failed to load texture {}: {}", texture_path.display(), e);
            }
            // A failed load still records the entry; lookups fall back later
            self.textures.insert(file_name, texture);
        }

        Ok(())
    }

    /// Bind this table's reflectance and the submesh's resolved texture
    ///
    /// The four reflectance uniforms are bound unconditionally. The raw tag is
    /// then resolved and looked up; a present and initialized texture is bound
    /// to unit 0 with `diffuseTex` pointing at it. A missing key — or an entry
    /// whose earlier decode failed — warns and falls back to the
    /// `default-grey.jpg` entry. When the fallback is missing too, nothing is
    /// bound and whatever texture unit 0 held from the previous draw stays in
    /// effect; a known rough edge of the asset pipeline, kept as-is.
    pub fn apply(&self, shader: &ShaderProgram, material_tag: &str) {
        shader.bind_uniform("Ka", self.ambient);
        shader.bind_uniform("Kd", self.diffuse);
        shader.bind_uniform("Ks", self.specular);
        shader.bind_uniform("specularPower", self.specular_power);

        let key = resolve_texture_key(material_tag, &self.exporter_overrides);
        if self.bind_diffuse_texture(shader, key) {
            return;
        }

        log::warn!(
            "Texture not found for material: {material_tag}. Using {DEFAULT_MATERIAL_NAME}"
        );
        self.bind_diffuse_texture(shader, DEFAULT_MATERIAL_NAME);
    }

    fn bind_diffuse_texture(&self, shader: &ShaderProgram, key: &str) -> bool {
        match self.textures.get(key).filter(|t| t.is_initialised()) {
            Some(texture) => {
                texture.bind(0);
                shader.bind_uniform("diffuseTex", 0i32);
                true
            }
            None => false,
        }
    }

    /// Ambient reflectance (Ka)
    pub fn ambient(&self) -> Vec3 {
        self.ambient
    }

    /// Diffuse reflectance (Kd)
    pub fn diffuse(&self) -> Vec3 {
        self.diffuse
    }

    /// Specular reflectance (Ks)
    pub fn specular(&self) -> Vec3 {
        self.specular
    }

    /// Specular exponent (Ns)
    pub fn specular_power(&self) -> f32 {
        self.specular_power
    }

    /// Look up a loaded texture by its key
    pub fn texture(&self, key: &str) -> Option<&Texture> {
        self.textures.get(key)
    }

    /// Number of texture entries (including failed loads)
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mat_prefix_strips_through_first_dash() {
        let overrides = default_exporter_overrides();
        assert_eq!(
            resolve_texture_key("mat_0-texture014.jpg", &overrides),
            "texture014.jpg"
        );
        // Only the first dash after the prefix is the split point
        assert_eq!(
            resolve_texture_key("mat_7-foo-bar.png", &overrides),
            "foo-bar.png"
        );
    }

    #[test]
    fn test_mat_prefix_without_dash_passes_through() {
        let overrides = default_exporter_overrides();
        assert_eq!(resolve_texture_key("mat_noseparator", &overrides), "mat_noseparator");
    }

    #[test]
    fn test_mtl_prefix_uses_override_table() {
        let overrides = default_exporter_overrides();
        assert_eq!(
            resolve_texture_key("mtl_001", &overrides),
            "./textures/txt_001_diff.png"
        );
        assert_eq!(resolve_texture_key("mtl_999", &overrides), "mtl_999");
    }

    #[test]
    fn test_plain_tags_pass_through() {
        let overrides = default_exporter_overrides();
        assert_eq!(
            resolve_texture_key("texture014.jpg", &overrides),
            "texture014.jpg"
        );
        assert_eq!(
            resolve_texture_key("default-grey.jpg", &overrides),
            "default-grey.jpg"
        );
        assert_eq!(resolve_texture_key("", &overrides), "");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let overrides = default_exporter_overrides();
        for tag in ["mat_0-a.jpg", "mtl_001", "mtl_999", "plain.png", "mat_x"] {
            assert_eq!(
                resolve_texture_key(tag, &overrides),
                resolve_texture_key(tag, &overrides)
            );
        }
    }

    #[test]
    fn test_custom_override_table() {
        let overrides = vec![("mtl_042".to_string(), "waves.png".to_string())];
        assert_eq!(resolve_texture_key("mtl_042", &overrides), "waves.png");
        // The stock entry is gone when a custom table is supplied
        assert_eq!(resolve_texture_key("mtl_001", &overrides), "mtl_001");
    }
}
