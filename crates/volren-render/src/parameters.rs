//! GPU-side parameter blocks.
//!
//! Both blocks are plain `#[repr(C)]` data copied into uniform buffers each
//! frame; the renderer never holds a reference into the state that produced
//! them.

use glam::{Mat4, Vec3};
use volren_core::options::DEFAULT_RENDER_QUALITY;
use volren_core::transfer_function::{DEFAULT_DOMAIN_MAX, DEFAULT_DOMAIN_MIN};
use volren_core::{Options, RenderMethod};

/// Transform block consumed by the ray-marching shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderParameters {
    pub model: [[f32; 4]; 4],
    pub inverse_model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub inverse_view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub inverse_projection: [[f32; 4]; 4],
    /// Camera position in world space.
    pub camera_world_position: [f32; 3],
    /// Ray-march sample count.
    pub render_quality: i32,
}

impl RenderParameters {
    /// Returns the model matrix.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }

    /// Returns the inverse model matrix.
    #[must_use]
    pub fn inverse_model_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.inverse_model)
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view)
    }

    #[must_use]
    pub fn inverse_view_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.inverse_view)
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection)
    }

    #[must_use]
    pub fn inverse_projection_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.inverse_projection)
    }

    #[must_use]
    pub fn camera_world_position(&self) -> Vec3 {
        Vec3::from_array(self.camera_world_position)
    }

    /// Returns the bytes handed to the GPU.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for RenderParameters {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            model: identity,
            inverse_model: identity,
            view: identity,
            inverse_view: identity,
            projection: identity,
            inverse_projection: identity,
            camera_world_position: [0.0; 3],
            render_quality: DEFAULT_RENDER_QUALITY,
        }
    }
}

/// Shading switches consumed alongside [`RenderParameters`].
///
/// Everything is 32-bit since 16-bit shader integers are not portable.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VolumeUniforms {
    /// Lighting enable: 0 = off, 1 = on.
    pub lighting_enabled: u32,
    /// Render method: 0 = surface, 1 = DVR, 2 = MIP.
    pub method: i32,
    /// Ray-march sample count.
    pub rendering_quality: i32,
    /// Lowest voxel value the shader maps.
    pub voxel_min: i32,
    /// Highest voxel value the shader maps.
    pub voxel_max: i32,
    /// Padding to 16-byte alignment.
    pub _pad0: u32,
    pub _pad1: u32,
    pub _pad2: u32,
}

impl VolumeUniforms {
    /// Builds the block from configuration.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self {
            lighting_enabled: u32::from(options.lighting_enabled),
            method: options.method.as_i32(),
            rendering_quality: options.render_quality,
            ..Self::default()
        }
    }

    /// Returns the bytes handed to the GPU.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for VolumeUniforms {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        Self {
            lighting_enabled: 1,
            method: RenderMethod::Dvr.as_i32(),
            rendering_quality: DEFAULT_RENDER_QUALITY,
            voxel_min: DEFAULT_DOMAIN_MIN as i32,
            voxel_max: DEFAULT_DOMAIN_MAX as i32,
            _pad0: 0,
            _pad1: 0,
            _pad2: 0,
        }
    }
}
