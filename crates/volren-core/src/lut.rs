//! Dense lookup texture generation from a transfer function.

use glam::Vec4;

use crate::buffer::ScalarBuffer;
use crate::texture::{TexelFormat, TextureUpload};
use crate::transfer_function::{AlphaStop, ColorStop, Rgba, TransferFunction};

/// Number of columns in the lookup texture.
pub const LUT_WIDTH: usize = 512;
/// Number of rows; the single row is duplicated for sampler compatibility.
pub const LUT_HEIGHT: usize = 2;

/// A resampled transfer function: `LUT_WIDTH x LUT_HEIGHT` RGBA float texels.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTexture {
    texels: ScalarBuffer<[f32; 4]>,
}

impl LookupTexture {
    /// Returns the texel at column `x`, row `y`.
    #[must_use]
    pub fn texel(&self, x: usize, y: usize) -> Option<[f32; 4]> {
        self.texels.get(&[x, y])
    }

    /// Returns one row of texels.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[[f32; 4]]> {
        self.texels.outer_slice(y)
    }

    /// Returns the underlying buffer.
    #[must_use]
    pub fn buffer(&self) -> &ScalarBuffer<[f32; 4]> {
        &self.texels
    }

    /// Returns the texture bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.texels.as_bytes()
    }

    /// Describes this texture for a GPU sink.
    #[must_use]
    pub fn upload(&self) -> TextureUpload<'_> {
        TextureUpload::new_2d(
            "transfer function",
            LUT_WIDTH as u32,
            LUT_HEIGHT as u32,
            TexelFormat::Rgba32Float,
            self.as_bytes(),
        )
    }
}

trait Stop: Copy {
    fn value(&self) -> f32;
    fn shifted(self, shift: f32) -> Self;
}

impl Stop for ColorStop {
    fn value(&self) -> f32 {
        self.data_value
    }

    fn shifted(mut self, shift: f32) -> Self {
        self.data_value += shift;
        self
    }
}

impl Stop for AlphaStop {
    fn value(&self) -> f32 {
        self.data_value
    }

    fn shifted(mut self, shift: f32) -> Self {
        self.data_value += shift;
        self
    }
}

/// Shifts, stably sorts and closes a stop list over `[min, max]`.
///
/// After this the list has at least two entries, its first value is at most
/// `min` and its last value at least `max`.
fn prepare_stops<S: Stop>(stops: &[S], shift: f32, min: f32, max: f32, at_min: S, at_max: S) -> Vec<S> {
    let mut sorted: Vec<S> = stops.iter().map(|s| s.shifted(shift)).collect();
    sorted.sort_by(|a, b| a.value().total_cmp(&b.value()));

    if sorted.last().map_or(true, |s| s.value() < max) {
        sorted.push(at_max);
    }
    if sorted[0].value() > min {
        sorted.insert(0, at_min);
    }
    sorted
}

/// Moves `cursor` right while the following stop is still left of `t`.
fn advance<S: Stop>(stops: &[S], cursor: &mut usize, t: f32, tf: &TransferFunction) {
    while *cursor + 2 < stops.len() && tf.normalize(stops[*cursor + 1].value()) < t {
        *cursor += 1;
    }
}

/// Interpolation weight of the right stop for normalized position `t`.
fn blend_fraction(t: f32, left: f32, right: f32) -> f32 {
    let span = right - left;
    if span > 0.0 {
        (t.clamp(left, right) - left) / span
    } else {
        0.0
    }
}

/// Resamples `tf` into a dense lookup texture.
///
/// Stops are shifted by `tf.shift` on a working copy, sorted, and completed
/// with synthetic boundary stops (opaque white color at both ends; alpha 0 at
/// the domain minimum and 1 at the maximum). Each column `ix` samples
/// `t = ix / (LUT_WIDTH - 1)` in normalized domain space. Colors and alphas
/// are interpolated independently; the alpha channel of the color stops is
/// ignored.
///
/// A domain with `min >= max` cannot be normalized; every data value then maps
/// to `t = 0` and the output stays finite.
#[must_use]
pub fn resample(tf: &TransferFunction) -> LookupTexture {
    let (min, max) = (tf.domain_min, tf.domain_max);
    if min >= max || min.is_nan() || max.is_nan() {
        log::warn!(
            "transfer function '{}': degenerate domain [{min}, {max}]",
            tf.name
        );
    }

    let colors = prepare_stops(
        &tf.color_stops,
        tf.shift,
        min,
        max,
        ColorStop::new(min, Rgba::WHITE),
        ColorStop::new(max, Rgba::WHITE),
    );
    let alphas = prepare_stops(
        &tf.alpha_stops,
        tf.shift,
        min,
        max,
        AlphaStop::new(min, 0.0),
        AlphaStop::new(max, 1.0),
    );

    log::debug!(
        "resampling transfer function '{}' ({} color stops, {} alpha stops, shift {})",
        tf.name,
        colors.len(),
        alphas.len(),
        tf.shift
    );

    let mut texels = ScalarBuffer::<[f32; 4]>::zeroed(&[LUT_WIDTH, LUT_HEIGHT]);
    let mut color_cursor = 0;
    let mut alpha_cursor = 0;

    for ix in 0..LUT_WIDTH {
        let t = ix as f32 / (LUT_WIDTH - 1) as f32;
        advance(&colors, &mut color_cursor, t, tf);
        advance(&alphas, &mut alpha_cursor, t, tf);

        let (left, right) = (colors[color_cursor], colors[color_cursor + 1]);
        let f = blend_fraction(t, tf.normalize(left.data_value), tf.normalize(right.data_value));
        let color: Vec4 = right.color.to_vec4() * f + left.color.to_vec4() * (1.0 - f);

        let (left, right) = (alphas[alpha_cursor], alphas[alpha_cursor + 1]);
        let f = blend_fraction(t, tf.normalize(left.data_value), tf.normalize(right.data_value));
        let alpha = right.alpha * f + left.alpha * (1.0 - f);

        let texel = [color.x, color.y, color.z, alpha];
        for iy in 0..LUT_HEIGHT {
            texels.set(&[ix, iy], texel);
        }
    }

    LookupTexture { texels }
}
