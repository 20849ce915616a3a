//! [`TextureSink`] backed by a wgpu device.

use std::collections::HashMap;

use volren_core::{Result, TexelFormat, TextureSink, TextureUpload};

/// Maps a core texel format to its wgpu equivalent.
#[must_use]
pub fn texture_format(format: TexelFormat) -> wgpu::TextureFormat {
    match format {
        TexelFormat::R16Sint => wgpu::TextureFormat::R16Sint,
        TexelFormat::R32Float => wgpu::TextureFormat::R32Float,
        TexelFormat::Rgba32Float => wgpu::TextureFormat::Rgba32Float,
    }
}

/// Returns the wgpu dimension of an upload.
#[must_use]
pub fn texture_dimension(texture: &TextureUpload<'_>) -> wgpu::TextureDimension {
    if texture.is_3d() {
        wgpu::TextureDimension::D3
    } else {
        wgpu::TextureDimension::D2
    }
}

/// Returns the extent of an upload.
#[must_use]
pub fn texture_extent(texture: &TextureUpload<'_>) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: texture.width,
        height: texture.height,
        depth_or_array_layers: texture.depth,
    }
}

/// Uploads prepared textures to a wgpu device, keeping the latest texture
/// per label for binding.
pub struct WgpuTextureSink {
    device: wgpu::Device,
    queue: wgpu::Queue,
    textures: HashMap<String, wgpu::Texture>,
    created: usize,
}

impl WgpuTextureSink {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            textures: HashMap::new(),
            created: 0,
        }
    }

    /// Returns the most recent texture uploaded under `label`.
    #[must_use]
    pub fn texture(&self, label: &str) -> Option<&wgpu::Texture> {
        self.textures.get(label)
    }

    /// Returns how many GPU textures this sink has allocated. Re-uploads
    /// with an unchanged size, format and dimension reuse the texture.
    #[must_use]
    pub fn textures_created(&self) -> usize {
        self.created
    }

    /// Creates a sampleable view of the texture uploaded under `label`.
    #[must_use]
    pub fn view(&self, label: &str) -> Option<wgpu::TextureView> {
        let texture = self.textures.get(label)?;
        let dimension = match texture.dimension() {
            wgpu::TextureDimension::D3 => wgpu::TextureViewDimension::D3,
            _ => wgpu::TextureViewDimension::D2,
        };
        Some(texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(dimension),
            ..Default::default()
        }))
    }

    fn ensure_texture(&mut self, upload: &TextureUpload<'_>) {
        let size = texture_extent(upload);
        let format = texture_format(upload.format);
        let dimension = texture_dimension(upload);

        let reusable = self.textures.get(upload.label).is_some_and(|t| {
            t.size() == size && t.format() == format && t.dimension() == dimension
        });
        if !reusable {
            let texture = self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(upload.label),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            log::debug!("created texture '{}' {:?} {:?}", upload.label, dimension, size);
            self.textures.insert(upload.label.to_string(), texture);
            self.created += 1;
        }
    }
}

impl TextureSink for WgpuTextureSink {
    fn upload(&mut self, upload: &TextureUpload<'_>) -> Result<()> {
        upload.validate()?;
        self.ensure_texture(upload);
        let texture = &self.textures[upload.label];

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            upload.bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(upload.bytes_per_row),
                rows_per_image: Some(upload.height),
            },
            texture_extent(upload),
        );
        log::debug!(
            "uploaded '{}' {}x{}x{} {:?} ({} bytes)",
            upload.label,
            upload.width,
            upload.height,
            upload.depth,
            upload.format,
            upload.bytes.len()
        );
        Ok(())
    }
}
