//! Transform construction and composition.
//!
//! All matrices are column-major [`Mat4`]s. Composition helpers multiply the
//! new transform on the right (`M' = M * T`), so each call acts in the local
//! space of the existing transform rather than resetting it.

use glam::{Mat4, Vec3, Vec4};

use crate::error::{Result, VolrenError};

/// Determinants smaller than this in magnitude are treated as singular.
pub const SINGULAR_EPSILON: f32 = 1e-12;

/// Returns a pure translation by `offset`.
#[must_use]
pub fn translation_matrix(offset: Vec3) -> Mat4 {
    Mat4::from_cols(Vec4::X, Vec4::Y, Vec4::Z, offset.extend(1.0))
}

/// Returns a non-uniform scale.
#[must_use]
pub fn scale_matrix(factors: Vec3) -> Mat4 {
    Mat4::from_diagonal(factors.extend(1.0))
}

/// Returns a rotation of `angle` radians around `axis` (Rodrigues' formula).
///
/// The axis is normalized first. A zero-length or non-finite axis yields the
/// identity.
#[must_use]
pub fn rotation_matrix(angle: f32, axis: Vec3) -> Mat4 {
    let Some(axis) = axis.try_normalize() else {
        log::warn!("rotation around degenerate axis {axis:?} ignored");
        return Mat4::IDENTITY;
    };
    let Vec3 { x, y, z } = axis;
    let (s, c) = angle.sin_cos();
    let mc = 1.0 - c;

    Mat4::from_cols(
        Vec4::new(x * x * mc + c, x * y * mc + z * s, x * z * mc - y * s, 0.0),
        Vec4::new(y * x * mc - z * s, y * y * mc + c, y * z * mc + x * s, 0.0),
        Vec4::new(z * x * mc + y * s, z * y * mc - x * s, z * z * mc + c, 0.0),
        Vec4::W,
    )
}

/// Composes a translation onto `m` in its local space.
#[must_use]
pub fn translate(m: Mat4, offset: Vec3) -> Mat4 {
    m * translation_matrix(offset)
}

/// Composes a rotation onto `m` in its local space.
#[must_use]
pub fn rotate(m: Mat4, angle: f32, axis: Vec3) -> Mat4 {
    m * rotation_matrix(angle, axis)
}

/// Composes a scale onto `m` in its local space.
#[must_use]
pub fn scale(m: Mat4, factors: Vec3) -> Mat4 {
    m * scale_matrix(factors)
}

/// Builds a right-handed OpenGL-style perspective projection.
///
/// Depth is mapped to `[-1, 1]` NDC. Fails with
/// [`VolrenError::InvalidProjection`] unless `0 < fov < 180`,
/// `aspect_ratio > 0` and `0 < near < far`.
pub fn perspective_projection(
    vertical_fov_degrees: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
) -> Result<Mat4> {
    if !(vertical_fov_degrees > 0.0 && vertical_fov_degrees < 180.0) {
        return Err(VolrenError::InvalidProjection(format!(
            "vertical field of view {vertical_fov_degrees} outside (0, 180) degrees"
        )));
    }
    if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
        return Err(VolrenError::InvalidProjection(format!(
            "aspect ratio {aspect_ratio} must be positive"
        )));
    }
    if !(near.is_finite() && far.is_finite() && near > 0.0 && far > near) {
        return Err(VolrenError::InvalidProjection(format!(
            "clip planes near={near} far={far} must satisfy 0 < near < far"
        )));
    }

    let t = (vertical_fov_degrees.to_radians() / 2.0).tan();
    let x = 1.0 / (aspect_ratio * t);
    let y = 1.0 / t;
    let z = -((far + near) / (far - near));
    let w = -((2.0 * far * near) / (far - near));

    Ok(Mat4::from_cols(
        Vec4::new(x, 0.0, 0.0, 0.0),
        Vec4::new(0.0, y, 0.0, 0.0),
        Vec4::new(0.0, 0.0, z, -1.0),
        Vec4::new(0.0, 0.0, w, 0.0),
    ))
}

/// Inverts a general 4x4 matrix.
pub fn inverse(m: Mat4) -> Result<Mat4> {
    let determinant = m.determinant();
    if !determinant.is_finite() || determinant.abs() < SINGULAR_EPSILON {
        return Err(VolrenError::SingularMatrix { determinant });
    }
    Ok(m.inverse())
}

/// Inverts `m`, substituting the identity when it is singular.
///
/// Used on the per-frame path where a failed inverse must not stop rendering.
#[must_use]
pub fn inverse_or_identity(m: Mat4, what: &str) -> Mat4 {
    match inverse(m) {
        Ok(inv) => inv,
        Err(e) => {
            log::error!("cannot invert {what}: {e}; substituting identity");
            Mat4::IDENTITY
        }
    }
}
