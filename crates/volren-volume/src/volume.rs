//! Voxel volumes and their physical metadata.

use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};
use volren_core::{ScalarBuffer, TexelFormat, TextureUpload};

/// Scalar type of the stored voxels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// Signed 16-bit CT values.
    Int16,
    /// Normalized floats from decoded images.
    Float32,
}

impl ElementType {
    /// Returns the matching GPU texel format.
    #[must_use]
    pub fn texel_format(self) -> TexelFormat {
        match self {
            ElementType::Int16 => TexelFormat::R16Sint,
            ElementType::Float32 => TexelFormat::R32Float,
        }
    }
}

/// Shape and physical spacing of a voxel grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeDescriptor {
    /// Number of voxels along x, y and z.
    pub dimension: UVec3,
    /// Size of one voxel in meters.
    pub voxel_resolution: Vec3,
    /// Stored scalar type.
    pub element_type: ElementType,
}

impl VolumeDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(dimension: UVec3, voxel_resolution: Vec3, element_type: ElementType) -> Self {
        Self {
            dimension,
            voxel_resolution,
            element_type,
        }
    }

    /// The degenerate 1x1x1 descriptor used before a dataset is selected.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(UVec3::ONE, Vec3::ONE, ElementType::Int16)
    }

    /// Physical extent in meters (`resolution * dimension`).
    ///
    /// Used to scale the unit render cube to real proportions.
    #[must_use]
    pub fn physical_scale(&self) -> Vec3 {
        self.voxel_resolution * self.dimension.as_vec3()
    }

    /// Returns the total number of voxels.
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.dimension.x as usize * self.dimension.y as usize * self.dimension.z as usize
    }

    /// Returns the number of bytes the voxels occupy.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.voxel_count() * self.element_type.texel_format().bytes_per_texel()
    }

    /// Returns the shape in the layout used by [`ScalarBuffer`].
    #[must_use]
    pub fn shape(&self) -> [usize; 3] {
        [
            self.dimension.x as usize,
            self.dimension.y as usize,
            self.dimension.z as usize,
        ]
    }
}

/// Voxel storage, x fastest, then y, then z.
#[derive(Debug, Clone, PartialEq)]
pub enum VolumeBuffer {
    Int16(ScalarBuffer<i16>),
    Float32(ScalarBuffer<f32>),
}

impl VolumeBuffer {
    /// Returns the stored scalar type.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            VolumeBuffer::Int16(_) => ElementType::Int16,
            VolumeBuffer::Float32(_) => ElementType::Float32,
        }
    }

    /// Returns the number of voxels.
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        match self {
            VolumeBuffer::Int16(b) => b.len(),
            VolumeBuffer::Float32(b) => b.len(),
        }
    }

    /// Returns the voxel at `(x, y, z)` widened to `f32`.
    #[must_use]
    pub fn sample(&self, x: usize, y: usize, z: usize) -> Option<f32> {
        match self {
            VolumeBuffer::Int16(b) => b.get(&[x, y, z]).map(f32::from),
            VolumeBuffer::Float32(b) => b.get(&[x, y, z]),
        }
    }

    /// Returns the raw little-endian voxel bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            VolumeBuffer::Int16(b) => b.as_bytes(),
            VolumeBuffer::Float32(b) => b.as_bytes(),
        }
    }
}

/// A loaded volume: voxels plus descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub buffer: VolumeBuffer,
    pub descriptor: VolumeDescriptor,
}

impl Volume {
    /// The 1x1x1 zero volume used before a dataset is selected.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            buffer: VolumeBuffer::Int16(ScalarBuffer::zeroed(&[1, 1, 1])),
            descriptor: VolumeDescriptor::placeholder(),
        }
    }

    /// Describes the voxels as a 3-D texture for a GPU sink.
    #[must_use]
    pub fn upload(&self) -> TextureUpload<'_> {
        let d = self.descriptor.dimension;
        TextureUpload::new_3d(
            "volume",
            d.x,
            d.y,
            d.z,
            self.descriptor.element_type.texel_format(),
            self.buffer.as_bytes(),
        )
    }
}
