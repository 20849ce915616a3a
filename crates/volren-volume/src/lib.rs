//! Volumetric dataset ingestion for volren-rs.
//!
//! A [`DatasetTable`] maps each body part to a voxel source. The
//! [`VolumeLoader`] fetches that source through a [`ResourceProvider`] and
//! decodes it into a [`Volume`]:
//! - gzip archives of little-endian `i16` voxels ([`raw`])
//! - stacks of grayscale images, one per z-slice ([`image_stack`])

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Volume extents are u32 on the GPU side and usize on the CPU side
#![allow(clippy::cast_possible_truncation)]

pub mod dataset;
pub mod image_stack;
pub mod loader;
pub mod raw;
pub mod resources;
pub mod volume;

pub use dataset::{DatasetEntry, DatasetTable, VolumeSource};
pub use loader::VolumeLoader;
pub use resources::{DirectoryResources, MemoryResources, ResourceProvider};
pub use volume::{ElementType, Volume, VolumeBuffer, VolumeDescriptor};
