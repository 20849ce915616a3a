//! Data-driven table of the datasets available for each body part.

use std::collections::BTreeMap;

use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};
use volren_core::{BodyPart, Result, VolrenError};

use crate::volume::{ElementType, VolumeDescriptor};

/// Where the voxels of a dataset come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VolumeSource {
    /// A single zero voxel, used before a dataset is selected.
    Placeholder,
    /// A gzip archive holding little-endian `i16` voxels.
    Raw { archive: String },
    /// One grayscale image per z-slice, named `{prefix}{index:04}.{extension}`.
    ImageStack {
        #[serde(default)]
        prefix: String,
        extension: String,
        slices: u32,
    },
}

impl VolumeSource {
    /// Returns the stored scalar type produced by this source.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            VolumeSource::Placeholder | VolumeSource::Raw { .. } => ElementType::Int16,
            VolumeSource::ImageStack { .. } => ElementType::Float32,
        }
    }
}

/// One row of the dataset table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub dimension: UVec3,
    /// Voxel spacing in meters.
    pub resolution: Vec3,
    pub source: VolumeSource,
}

impl DatasetEntry {
    /// Returns the descriptor implied by this entry.
    ///
    /// Image stacks infer their shape from the decoded slices, so the loader
    /// replaces `dimension` for them.
    #[must_use]
    pub fn descriptor(&self) -> VolumeDescriptor {
        VolumeDescriptor::new(self.dimension, self.resolution, self.source.element_type())
    }
}

/// Maps each body part to its dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetTable {
    entries: BTreeMap<BodyPart, DatasetEntry>,
}

impl Default for DatasetTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            BodyPart::None,
            DatasetEntry {
                dimension: UVec3::ONE,
                resolution: Vec3::ONE,
                source: VolumeSource::Placeholder,
            },
        );
        entries.insert(
            BodyPart::Chest,
            DatasetEntry {
                dimension: UVec3::new(512, 512, 161),
                resolution: Vec3::new(0.000_586, 0.000_586, 0.002),
                source: VolumeSource::Raw {
                    archive: "chest.raw.gz".to_string(),
                },
            },
        );
        entries.insert(
            BodyPart::Head,
            DatasetEntry {
                dimension: UVec3::new(512, 512, 511),
                resolution: Vec3::new(0.000_449, 0.000_449, 0.000_501),
                source: VolumeSource::Raw {
                    archive: "head.raw.gz".to_string(),
                },
            },
        );
        Self { entries }
    }
}

impl DatasetTable {
    /// Creates an empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds or replaces the entry for `part`.
    pub fn with_entry(mut self, part: BodyPart, entry: DatasetEntry) -> Self {
        self.entries.insert(part, entry);
        self
    }

    /// Returns the entry for `part`.
    pub fn get(&self, part: BodyPart) -> Result<&DatasetEntry> {
        self.entries
            .get(&part)
            .ok_or_else(|| VolrenError::ResourceNotFound(format!("dataset for body part '{}'", part.name())))
    }

    /// Iterates over all entries in body-part order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyPart, &DatasetEntry)> {
        self.entries.iter().map(|(part, entry)| (*part, entry))
    }

    /// Parses a table from JSON keyed by body-part name.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| VolrenError::Format(format!("dataset table: {e}")))
    }

    /// Serializes the table to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| VolrenError::Format(format!("dataset table: {e}")))
    }
}
