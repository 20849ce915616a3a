//! Camera and view management.

use glam::{Mat4, Vec3};
use volren_core::{math, Result, VolrenError};

/// Default vertical field of view in degrees.
pub const DEFAULT_FOV_DEGREES: f32 = 45.0;
/// Default near clipping plane.
pub const DEFAULT_NEAR: f32 = 0.1;
/// Default far clipping plane.
pub const DEFAULT_FAR: f32 = 10.0;

/// A perspective camera looking at the volume.
///
/// Projection parameters are only changed through validated setters, so a
/// camera built with [`Camera::new`] always has a valid projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    fov_degrees: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
}

impl Camera {
    /// Creates a camera 3 units in front of the origin.
    pub fn new(aspect_ratio: f32) -> Result<Self> {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: DEFAULT_FOV_DEGREES,
            aspect_ratio: 1.0,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        };
        camera.set_aspect_ratio(aspect_ratio)?;
        Ok(camera)
    }

    /// Returns the vertical field of view in degrees.
    #[must_use]
    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    /// Returns the aspect ratio (width / height).
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Returns the `(near, far)` clipping planes.
    #[must_use]
    pub fn clip_planes(&self) -> (f32, f32) {
        (self.near, self.far)
    }

    /// Sets the vertical field of view in degrees.
    pub fn set_fov_degrees(&mut self, degrees: f32) -> Result<()> {
        math::perspective_projection(degrees, self.aspect_ratio, self.near, self.far)?;
        self.fov_degrees = degrees;
        Ok(())
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) -> Result<()> {
        math::perspective_projection(self.fov_degrees, aspect_ratio, self.near, self.far)?;
        self.aspect_ratio = aspect_ratio;
        Ok(())
    }

    /// Sets both clipping planes.
    pub fn set_clip_planes(&mut self, near: f32, far: f32) -> Result<()> {
        math::perspective_projection(self.fov_degrees, self.aspect_ratio, near, far)?;
        self.near = near;
        self.far = far;
        Ok(())
    }

    /// Returns the view matrix.
    pub fn view_matrix(&self) -> Result<Mat4> {
        let forward = self.target - self.position;
        if forward.length_squared() <= f32::EPSILON || forward.cross(self.up).length_squared() <= f32::EPSILON {
            return Err(VolrenError::InvalidProjection(format!(
                "camera at {} cannot look at {} with up {}",
                self.position, self.target, self.up
            )));
        }
        Ok(Mat4::look_at_rh(self.position, self.target, self.up))
    }

    /// Returns the projection matrix.
    pub fn projection_matrix(&self) -> Result<Mat4> {
        math::perspective_projection(self.fov_degrees, self.aspect_ratio, self.near, self.far)
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: DEFAULT_FOV_DEGREES,
            aspect_ratio: 1.0,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }
}
