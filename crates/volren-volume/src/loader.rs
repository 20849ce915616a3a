//! Loads the dataset selected by a body part.

use std::time::Instant;

use glam::UVec3;
use volren_core::{BodyPart, Result};

use crate::dataset::{DatasetTable, VolumeSource};
use crate::image_stack::load_image_stack;
use crate::raw::load_raw;
use crate::resources::ResourceProvider;
use crate::volume::{ElementType, Volume, VolumeBuffer, VolumeDescriptor};

/// Resolves body parts to volumes through a dataset table and a resource provider.
///
/// Loading is all-or-nothing: on error nothing is returned and the caller's
/// current volume is untouched.
#[derive(Debug, Clone)]
pub struct VolumeLoader<R> {
    table: DatasetTable,
    resources: R,
}

impl<R: ResourceProvider> VolumeLoader<R> {
    pub fn new(table: DatasetTable, resources: R) -> Self {
        Self { table, resources }
    }

    pub fn resources(&self) -> &R {
        &self.resources
    }

    /// Loads the dataset for `part`.
    pub fn load(&self, part: BodyPart) -> Result<Volume> {
        let entry = self.table.get(part)?;
        let start = Instant::now();

        let volume = match &entry.source {
            VolumeSource::Placeholder => Volume::placeholder(),
            VolumeSource::Raw { archive } => {
                let compressed = self.resources.fetch(archive)?;
                load_raw(archive, &compressed, &entry.descriptor())?
            }
            VolumeSource::ImageStack {
                prefix,
                extension,
                slices,
            } => {
                let buffer = load_image_stack(&self.resources, prefix, extension, *slices)?;
                let shape = buffer.shape();
                let dimension = UVec3::new(shape[0] as u32, shape[1] as u32, shape[2] as u32);
                Volume {
                    descriptor: VolumeDescriptor::new(dimension, entry.resolution, ElementType::Float32),
                    buffer: VolumeBuffer::Float32(buffer),
                }
            }
        };

        log::info!(
            "loaded {} volume {:?} ({} {:?} voxels) in {:.1?}",
            part.name(),
            volume.descriptor.dimension.to_array(),
            volume.buffer.voxel_count(),
            volume.descriptor.element_type,
            start.elapsed()
        );
        Ok(volume)
    }
}
