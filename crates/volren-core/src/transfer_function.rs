//! Transfer-function model and document format.
//!
//! A transfer function is a sparse set of user-authored stops: color stops map
//! a data value to an RGBA color, alpha stops map a data value to an opacity.
//! Stops may be unsorted and may share a data value. Documents use the field
//! names `version`, `name`, `colourPoints`, `alphaPoints`, `min`, `max` and
//! `shift`; the last three are optional.

use std::path::Path;

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VolrenError};

/// Default lower bound of the data domain (Hounsfield units).
pub const DEFAULT_DOMAIN_MIN: f32 = -1024.0;
/// Default upper bound of the data domain (Hounsfield units).
pub const DEFAULT_DOMAIN_MAX: f32 = 3071.0;

/// An RGBA color with float components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgba {
    #[serde(default)]
    pub r: f32,
    #[serde(default)]
    pub g: f32,
    #[serde(default)]
    pub b: f32,
    #[serde(default)]
    pub a: f32,
}

impl Rgba {
    /// Opaque white, used for synthetic boundary stops.
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a color.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Converts to a vector for blending.
    #[must_use]
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }
}

/// A color stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorStop {
    pub data_value: f32,
    #[serde(rename = "colourValue")]
    pub color: Rgba,
}

impl ColorStop {
    /// Creates a color stop.
    #[must_use]
    pub fn new(data_value: f32, color: Rgba) -> Self {
        Self { data_value, color }
    }
}

/// An opacity stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaStop {
    pub data_value: f32,
    #[serde(rename = "alphaValue")]
    pub alpha: f32,
}

impl AlphaStop {
    /// Creates an alpha stop.
    #[must_use]
    pub fn new(data_value: f32, alpha: f32) -> Self {
        Self { data_value, alpha }
    }
}

fn default_min() -> f32 {
    DEFAULT_DOMAIN_MIN
}

fn default_max() -> f32 {
    DEFAULT_DOMAIN_MAX
}

/// A sparse color/opacity mapping over a scalar data domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferFunction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "colourPoints", default)]
    pub color_stops: Vec<ColorStop>,

    #[serde(rename = "alphaPoints", default)]
    pub alpha_stops: Vec<AlphaStop>,

    /// Data value mapped to the first lookup column.
    #[serde(rename = "min", default = "default_min")]
    pub domain_min: f32,

    /// Data value mapped to the last lookup column.
    #[serde(rename = "max", default = "default_max")]
    pub domain_max: f32,

    /// Offset added to every stop before resampling.
    #[serde(default)]
    pub shift: f32,
}

impl Default for TransferFunction {
    fn default() -> Self {
        Self {
            version: None,
            name: String::new(),
            color_stops: Vec::new(),
            alpha_stops: Vec::new(),
            domain_min: DEFAULT_DOMAIN_MIN,
            domain_max: DEFAULT_DOMAIN_MAX,
            shift: 0.0,
        }
    }
}

impl TransferFunction {
    /// Creates an empty transfer function over the default domain.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds a color stop.
    #[must_use]
    pub fn with_color_stop(mut self, data_value: f32, color: Rgba) -> Self {
        self.color_stops.push(ColorStop::new(data_value, color));
        self
    }

    /// Adds an alpha stop.
    #[must_use]
    pub fn with_alpha_stop(mut self, data_value: f32, alpha: f32) -> Self {
        self.alpha_stops.push(AlphaStop::new(data_value, alpha));
        self
    }

    /// Sets the data domain. [`TransferFunction::validate`] rejects
    /// `min >= max`.
    #[must_use]
    pub fn with_domain(mut self, min: f32, max: f32) -> Self {
        self.domain_min = min;
        self.domain_max = max;
        self
    }

    /// Sets the shift.
    #[must_use]
    pub fn with_shift(mut self, shift: f32) -> Self {
        self.shift = shift;
        self
    }

    /// Maps a data value into `[0, 1]` domain space (unclamped).
    ///
    /// Returns 0 when the domain is empty or inverted.
    #[must_use]
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.domain_max - self.domain_min;
        if span > 0.0 {
            (value - self.domain_min) / span
        } else {
            0.0
        }
    }

    /// Checks the domain and that every number is finite.
    pub fn validate(&self) -> Result<()> {
        if !(self.domain_min.is_finite() && self.domain_max.is_finite()) {
            return Err(VolrenError::Format(format!(
                "transfer function '{}': domain bounds must be finite",
                self.name
            )));
        }
        if self.domain_min >= self.domain_max {
            return Err(VolrenError::Format(format!(
                "transfer function '{}': min {} must be below max {}",
                self.name, self.domain_min, self.domain_max
            )));
        }
        if !self.shift.is_finite() {
            return Err(VolrenError::Format(format!(
                "transfer function '{}': shift must be finite",
                self.name
            )));
        }
        let colors_finite = self.color_stops.iter().all(|s| {
            s.data_value.is_finite() && s.color.to_vec4().is_finite()
        });
        let alphas_finite = self
            .alpha_stops
            .iter()
            .all(|s| s.data_value.is_finite() && s.alpha.is_finite());
        if !(colors_finite && alphas_finite) {
            return Err(VolrenError::Format(format!(
                "transfer function '{}': stops must be finite",
                self.name
            )));
        }
        Ok(())
    }

    /// Parses and validates a transfer-function document.
    pub fn from_json(text: &str) -> Result<Self> {
        let tf: Self = serde_json::from_str(text)
            .map_err(|e| VolrenError::Format(format!("transfer function document: {e}")))?;
        tf.validate()?;
        Ok(tf)
    }

    /// Parses a document from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let tf: Self = serde_json::from_slice(bytes)
            .map_err(|e| VolrenError::Format(format!("transfer function document: {e}")))?;
        tf.validate()?;
        Ok(tf)
    }

    /// Loads a document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VolrenError::ResourceNotFound(path.display().to_string())
            } else {
                VolrenError::Io(e)
            }
        })?;
        Self::from_slice(&bytes)
    }

    /// Serializes to a pretty-printed document.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VolrenError::Format(format!("transfer function document: {e}")))
    }
}
