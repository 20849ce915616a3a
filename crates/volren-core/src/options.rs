//! Configuration surface for the volume renderer inputs.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VolrenError};

/// Default rendering quality (ray-march sample count).
pub const DEFAULT_RENDER_QUALITY: i32 = 128;

/// Which scan dataset is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    /// Placeholder before a dataset is selected (1x1x1 volume).
    #[default]
    None,
    /// Chest CT scan.
    Chest,
    /// Head CT scan.
    Head,
}

impl BodyPart {
    /// All body parts, in UI order.
    pub const ALL: [BodyPart; 3] = [BodyPart::None, BodyPart::Chest, BodyPart::Head];

    /// Returns the stable table key.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BodyPart::None => "none",
            BodyPart::Chest => "chest",
            BodyPart::Head => "head",
        }
    }
}

/// Which transfer-function preset is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Highlights contrast-filled vessels.
    #[default]
    CtArteries,
    /// Whole-body soft tissue and bone.
    CtEntire,
    /// Lung parenchyma.
    CtLung,
}

impl Preset {
    /// All presets, in UI order.
    pub const ALL: [Preset; 3] = [Preset::CtArteries, Preset::CtEntire, Preset::CtLung];

    /// Returns the stable table key.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Preset::CtArteries => "ct_arteries",
            Preset::CtEntire => "ct_entire",
            Preset::CtLung => "ct_lung",
        }
    }
}

/// Shading method selected in the fragment shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderMethod {
    /// Isosurface shading.
    Surface,
    /// Direct volume rendering with compositing.
    #[default]
    Dvr,
    /// Maximum intensity projection.
    Mip,
}

impl RenderMethod {
    /// Returns the value written into the uniform block.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            RenderMethod::Surface => 0,
            RenderMethod::Dvr => 1,
            RenderMethod::Mip => 2,
        }
    }
}

/// Renderer input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Selected dataset.
    pub body_part: BodyPart,

    /// Selected transfer-function preset.
    pub preset: Preset,

    /// Shading method.
    pub method: RenderMethod,

    /// Ray-march sample count.
    pub render_quality: i32,

    /// Offset added to every transfer-function stop.
    pub shift: f32,

    /// Whether gradient lighting is applied.
    pub lighting_enabled: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            body_part: BodyPart::None,
            preset: Preset::CtArteries,
            method: RenderMethod::Dvr,
            render_quality: DEFAULT_RENDER_QUALITY,
            shift: 0.0,
            lighting_enabled: true,
        }
    }
}

impl Options {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body part.
    #[must_use]
    pub fn with_body_part(mut self, body_part: BodyPart) -> Self {
        self.body_part = body_part;
        self
    }

    /// Sets the preset.
    #[must_use]
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    /// Sets the render method.
    #[must_use]
    pub fn with_method(mut self, method: RenderMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the render quality.
    #[must_use]
    pub fn with_render_quality(mut self, quality: i32) -> Self {
        self.render_quality = quality;
        self
    }

    /// Sets the transfer-function shift.
    #[must_use]
    pub fn with_shift(mut self, shift: f32) -> Self {
        self.shift = shift;
        self
    }

    /// Enables or disables lighting.
    #[must_use]
    pub fn with_lighting(mut self, enabled: bool) -> Self {
        self.lighting_enabled = enabled;
        self
    }

    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| VolrenError::Format(format!("options: {e}")))
    }

    /// Serializes options to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| VolrenError::Format(format!("options: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let options = Options::default();
        assert_eq!(options.body_part, BodyPart::None);
        assert_eq!(options.preset, Preset::CtArteries);
        assert_eq!(options.method, RenderMethod::Dvr);
        assert_eq!(options.render_quality, 128);
        assert_eq!(options.shift, 0.0);
        assert!(options.lighting_enabled);
    }

    #[test]
    fn test_options_builder() {
        let options = Options::new()
            .with_body_part(BodyPart::Head)
            .with_preset(Preset::CtLung)
            .with_shift(-200.0)
            .with_lighting(false);
        assert_eq!(options.body_part, BodyPart::Head);
        assert_eq!(options.preset, Preset::CtLung);
        assert_eq!(options.shift, -200.0);
        assert!(!options.lighting_enabled);
    }

    #[test]
    fn test_options_json_partial() {
        let options = Options::from_json(r#"{ "body_part": "chest", "preset": "ct_entire" }"#).unwrap();
        assert_eq!(options.body_part, BodyPart::Chest);
        assert_eq!(options.preset, Preset::CtEntire);
        assert_eq!(options.render_quality, DEFAULT_RENDER_QUALITY);

        let text = options.to_json().unwrap();
        assert_eq!(Options::from_json(&text).unwrap(), options);
    }

    #[test]
    fn test_options_json_rejects_unknown_part() {
        let err = Options::from_json(r#"{ "body_part": "knee" }"#).unwrap_err();
        assert!(matches!(err, VolrenError::Format(_)));
    }

    #[test]
    fn test_names_and_method_values() {
        assert_eq!(Preset::CtArteries.name(), "ct_arteries");
        assert_eq!(BodyPart::Head.name(), "head");
        assert_eq!(RenderMethod::Surface.as_i32(), 0);
        assert_eq!(RenderMethod::Mip.as_i32(), 2);
    }
}
