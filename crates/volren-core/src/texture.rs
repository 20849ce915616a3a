//! Contract between the data-preparation core and a GPU texture sink.

use crate::error::{Result, VolrenError};

/// Texel formats produced by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TexelFormat {
    /// Single-channel signed 16-bit integer (raw CT voxels).
    R16Sint,
    /// Single-channel 32-bit float (image-stack voxels).
    R32Float,
    /// Four-channel 32-bit float (lookup texture).
    Rgba32Float,
}

impl TexelFormat {
    /// Returns the size of one texel in bytes.
    #[must_use]
    pub fn bytes_per_texel(self) -> usize {
        match self {
            TexelFormat::R16Sint => 2,
            TexelFormat::R32Float => 4,
            TexelFormat::Rgba32Float => 16,
        }
    }
}

/// A texture ready to be uploaded: dimensions, format and raw bytes.
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub format: TexelFormat,
    pub bytes: &'a [u8],
    pub bytes_per_row: u32,
    pub bytes_per_image: u32,
    /// Sampled as a 3-D texture, even when `depth == 1`.
    pub volumetric: bool,
}

impl<'a> TextureUpload<'a> {
    /// Describes a tightly packed 3-D texture.
    #[must_use]
    pub fn new_3d(
        label: &'a str,
        width: u32,
        height: u32,
        depth: u32,
        format: TexelFormat,
        bytes: &'a [u8],
    ) -> Self {
        let bytes_per_row = width * format.bytes_per_texel() as u32;
        Self {
            label,
            width,
            height,
            depth,
            format,
            bytes,
            bytes_per_row,
            bytes_per_image: bytes_per_row * height,
            volumetric: true,
        }
    }

    /// Describes a tightly packed 2-D texture.
    #[must_use]
    pub fn new_2d(label: &'a str, width: u32, height: u32, format: TexelFormat, bytes: &'a [u8]) -> Self {
        Self {
            volumetric: false,
            ..Self::new_3d(label, width, height, 1, format, bytes)
        }
    }

    /// Returns true for 3-D textures.
    #[must_use]
    pub fn is_3d(&self) -> bool {
        self.volumetric
    }

    /// Checks that the byte slice covers every texel exactly.
    pub fn validate(&self) -> Result<()> {
        let expected = self.bytes_per_image as usize * self.depth as usize;
        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return Err(VolrenError::Upload(format!("'{}' has an empty extent", self.label)));
        }
        if self.bytes.len() != expected {
            return Err(VolrenError::SizeMismatch {
                expected,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }
}

/// A destination for prepared textures, typically a GPU device.
///
/// Uploads are synchronous from the caller's point of view: the bytes are
/// fully written before `upload` is called and may be released as soon as it
/// returns.
pub trait TextureSink {
    /// Uploads one texture.
    fn upload(&mut self, texture: &TextureUpload<'_>) -> Result<()>;
}
