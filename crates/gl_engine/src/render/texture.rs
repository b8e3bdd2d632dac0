//! OpenGL texture wrapper
//!
//! A [`Texture`] is either uninitialized (no GL handle) or fully initialized
//! with a handle and matching dimensions/format; no partially constructed
//! state is observable. Binding an uninitialized texture binds handle 0,
//! which is semantically a safe no-op.

use std::path::{Path, PathBuf};

use glow::HasContext;
use image::GenericImageView;
use thiserror::Error;

use super::GlContext;

/// Texture loading errors
#[derive(Error, Debug)]
pub enum TextureError {
    /// The image file could not be opened or decoded
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        /// Path of the undecodable file
        path: String,
        /// Underlying decode error
        #[source]
        source: image::ImageError,
    },

    /// The image has a channel count outside 1..=4
    #[error("Unsupported channel count {channels} in {path}")]
    UnsupportedFormat {
        /// Detected channel count
        channels: u8,
        /// Path of the offending file
        path: String,
    },

    /// The driver could not allocate a texture object
    #[error("Failed to allocate texture object: {0}")]
    Allocation(String),
}

/// Pixel formats, by channel count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// Single channel (greyscale)
    Red,
    /// Two channels
    Rg,
    /// Three channels
    Rgb,
    /// Four channels
    Rgba,
}

impl TextureFormat {
    /// Number of 8-bit channels per pixel
    pub fn channel_count(self) -> u32 {
        match self {
            Self::Red => 1,
            Self::Rg => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    fn from_channel_count(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(Self::Red),
            2 => Some(Self::Rg),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    fn gl_format(self) -> u32 {
        match self {
            Self::Red => glow::RED,
            Self::Rg => glow::RG,
            Self::Rgb => glow::RGB,
            Self::Rgba => glow::RGBA,
        }
    }
}

/// Owning wrapper over a GL texture object
pub struct Texture {
    gl: GlContext,
    handle: Option<glow::Texture>,
    width: u32,
    height: u32,
    format: Option<TextureFormat>,
    path: Option<PathBuf>,
}

impl Texture {
    /// Create an uninitialized texture
    pub fn new(gl: GlContext) -> Self {
        Self {
            gl,
            handle: None,
            width: 0,
            height: 0,
            format: None,
            path: None,
        }
    }

    /// Create a texture by loading an image file
    pub fn from_file<P: AsRef<Path>>(gl: GlContext, path: P) -> Result<Self, TextureError> {
        let mut texture = Self::new(gl);
        texture.load(path)?;
        Ok(texture)
    }

    /// Load an image file into this texture
    ///
    /// Any previously held GL texture is released first. The internal and
    /// transfer formats follow the image's channel count; the upload uses
    /// linear min/mag filtering and generates a full mipmap chain. On decode
    /// failure the texture is left uninitialized.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), TextureError> {
        self.release();

        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Decode {
            path: path.display().to_string(),
            source,
        })?;

        let channels = img.color().channel_count();
        let format = TextureFormat::from_channel_count(channels).ok_or_else(|| {
            TextureError::UnsupportedFormat {
                channels,
                path: path.display().to_string(),
            }
        })?;

        let (width, height) = img.dimensions();
        let pixels: Vec<u8> = match format {
            TextureFormat::Red => img.to_luma8().into_raw(),
            TextureFormat::Rg => img.to_luma_alpha8().into_raw(),
            TextureFormat::Rgb => img.to_rgb8().into_raw(),
            TextureFormat::Rgba => img.to_rgba8().into_raw(),
        };

        let handle = unsafe { self.gl.create_texture() }.map_err(TextureError::Allocation)?;
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(handle));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format.gl_format() as i32,
                width as i32,
                height as i32,
                0,
                format.gl_format(),
                glow::UNSIGNED_BYTE,
                Some(&pixels),
            );

            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            self.gl.generate_mipmap(glow::TEXTURE_2D);

            self.gl.bind_texture(glow::TEXTURE_2D, None);
        }

        self.handle = Some(handle);
        self.width = width;
        self.height = height;
        self.format = Some(format);
        self.path = Some(path.to_path_buf());

        log::debug!("Loaded texture {}x{} from {}", width, height, path.display());
        Ok(())
    }

    /// Build a texture directly from an in-memory buffer
    ///
    /// Uses nearest filtering and repeat wrapping, without mipmaps. A `None`
    /// pixel buffer allocates uninitialized storage (for render targets and
    /// procedurally filled textures).
    pub fn create(
        &mut self,
        width: u32,
        height: u32,
        format: TextureFormat,
        pixels: Option<&[u8]>,
    ) -> Result<(), TextureError> {
        self.release();

        let handle = unsafe { self.gl.create_texture() }.map_err(TextureError::Allocation)?;
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(handle));

            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);

            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format.gl_format() as i32,
                width as i32,
                height as i32,
                0,
                format.gl_format(),
                glow::UNSIGNED_BYTE,
                pixels,
            );

            self.gl.bind_texture(glow::TEXTURE_2D, None);
        }

        self.handle = Some(handle);
        self.width = width;
        self.height = height;
        self.format = Some(format);
        self.path = None;
        Ok(())
    }

    /// Bind this texture to the given texture unit
    ///
    /// Safe to call on an uninitialized texture (binds handle 0).
    pub fn bind(&self, slot: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + slot);
            self.gl.bind_texture(glow::TEXTURE_2D, self.handle);
        }
    }

    /// Whether a GL texture is held
    pub fn is_initialised(&self) -> bool {
        self.handle.is_some()
    }

    /// Width in pixels (0 when uninitialized)
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels (0 when uninitialized)
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format (`None` when uninitialized)
    pub fn format(&self) -> Option<TextureFormat> {
        self.format
    }

    /// Source file path, if file-backed
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            unsafe {
                self.gl.delete_texture(handle);
            }
        }
        self.width = 0;
        self.height = 0;
        self.format = None;
        self.path = None;
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_channel_count() {
        assert_eq!(TextureFormat::from_channel_count(1), Some(TextureFormat::Red));
        assert_eq!(TextureFormat::from_channel_count(2), Some(TextureFormat::Rg));
        assert_eq!(TextureFormat::from_channel_count(3), Some(TextureFormat::Rgb));
        assert_eq!(TextureFormat::from_channel_count(4), Some(TextureFormat::Rgba));
        assert_eq!(TextureFormat::from_channel_count(5), None);
        assert_eq!(TextureFormat::from_channel_count(0), None);
    }

    #[test]
    fn test_format_channel_counts_round_trip() {
        for format in [
            TextureFormat::Red,
            TextureFormat::Rg,
            TextureFormat::Rgb,
            TextureFormat::Rgba,
        ] {
            let channels = format.channel_count() as u8;
            assert_eq!(TextureFormat::from_channel_count(channels), Some(format));
        }
    }
}
