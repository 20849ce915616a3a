//! Transfer-function preset lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use volren_core::{Preset, Result, TransferFunction, VolrenError};
use volren_volume::ResourceProvider;

/// Maps each preset to the resource holding its transfer-function document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetTable {
    files: BTreeMap<Preset, String>,
}

impl Default for PresetTable {
    /// Every preset maps to `{name}.tf`.
    fn default() -> Self {
        let files = Preset::ALL
            .iter()
            .map(|preset| (*preset, format!("{}.tf", preset.name())))
            .collect();
        Self { files }
    }
}

impl PresetTable {
    /// Adds or replaces the file for `preset`.
    #[must_use]
    pub fn with_file(mut self, preset: Preset, file: impl Into<String>) -> Self {
        self.files.insert(preset, file.into());
        self
    }

    /// Returns the resource name for `preset`.
    pub fn file_name(&self, preset: Preset) -> Result<&str> {
        self.files
            .get(&preset)
            .map(String::as_str)
            .ok_or_else(|| VolrenError::ResourceNotFound(format!("preset '{}'", preset.name())))
    }

    /// Fetches and parses the document for `preset`.
    pub fn load<R: ResourceProvider>(&self, preset: Preset, resources: &R) -> Result<TransferFunction> {
        let file = self.file_name(preset)?;
        let bytes = resources.fetch(file)?;
        TransferFunction::from_slice(&bytes)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| VolrenError::Format(format!("preset table: {e}")))
    }
}
