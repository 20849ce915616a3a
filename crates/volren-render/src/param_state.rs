//! Render parameter state driven by drag gestures.

use glam::{Mat4, Vec2, Vec3};
use volren_core::math::{self, inverse_or_identity};
use volren_core::Result;

use crate::camera::Camera;
use crate::gesture::DragTracker;
use crate::parameters::RenderParameters;

/// Radians of rotation per unit of drag.
pub const DRAG_SENSITIVITY: f32 = 1e-4;

/// Owns the camera, the model transform and the parameter block derived
/// from them.
///
/// The block only changes inside [`ParameterState::update`] while a drag is
/// active, or when the camera, model or quality is replaced explicitly.
#[derive(Debug, Clone)]
pub struct ParameterState {
    camera: Camera,
    model: Mat4,
    render_quality: i32,
    drag: DragTracker,
    parameters: RenderParameters,
}

impl ParameterState {
    /// Builds the initial block. Fails if the camera cannot produce a valid
    /// view or projection.
    pub fn new(camera: Camera, render_quality: i32) -> Result<Self> {
        camera.view_matrix()?;
        camera.projection_matrix()?;
        let mut state = Self {
            camera,
            model: Mat4::IDENTITY,
            render_quality,
            drag: DragTracker::new(),
            parameters: RenderParameters::default(),
        };
        state.refresh();
        Ok(state)
    }

    /// Returns the current block.
    #[must_use]
    pub fn parameters(&self) -> &RenderParameters {
        &self.parameters
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        self.model
    }

    #[must_use]
    pub fn render_quality(&self) -> i32 {
        self.render_quality
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Replaces the camera and recomputes the block.
    pub fn set_camera(&mut self, camera: Camera) -> Result<()> {
        camera.view_matrix()?;
        camera.projection_matrix()?;
        self.camera = camera;
        self.refresh();
        Ok(())
    }

    pub fn set_render_quality(&mut self, quality: i32) {
        self.render_quality = quality;
        self.parameters.render_quality = quality;
    }

    /// Resets the model to a pure scale, e.g. a dataset's physical extent.
    pub fn reset_model(&mut self, scale: Vec3) {
        self.model = math::scale_matrix(scale);
        self.refresh();
    }

    /// Moves the model in its local space.
    pub fn translate(&mut self, offset: Vec3) {
        self.model = math::translate(self.model, offset);
        self.refresh();
    }

    pub fn begin_drag(&mut self) {
        self.drag.begin();
    }

    /// Reports the total drag translation since the drag began.
    pub fn drag_changed(&mut self, total: Vec2) {
        self.drag.drag_changed(total);
    }

    /// Reports an incremental drag step.
    pub fn drag_by(&mut self, delta: Vec2) {
        self.drag.drag_by(delta);
    }

    pub fn end_drag(&mut self) {
        self.drag.end();
    }

    /// Applies the drag movement accumulated since the previous frame.
    ///
    /// Returns `false` without touching the block while idle.
    pub fn update(&mut self) -> bool {
        let Some(delta) = self.drag.take_delta() else {
            return false;
        };
        self.model = math::rotate(self.model, delta.y * DRAG_SENSITIVITY, Vec3::X);
        self.model = math::rotate(self.model, delta.x * DRAG_SENSITIVITY, Vec3::Y);
        self.refresh();
        true
    }

    fn refresh(&mut self) {
        let p = &mut self.parameters;
        p.model = self.model.to_cols_array_2d();
        p.inverse_model = inverse_or_identity(self.model, "model matrix").to_cols_array_2d();

        // Camera validity is checked on every replacement, so failures here
        // leave the previous matrices in place.
        match self.camera.view_matrix() {
            Ok(view) => {
                p.view = view.to_cols_array_2d();
                p.inverse_view = inverse_or_identity(view, "view matrix").to_cols_array_2d();
            }
            Err(e) => log::warn!("keeping previous view matrix: {e}"),
        }
        match self.camera.projection_matrix() {
            Ok(projection) => {
                p.projection = projection.to_cols_array_2d();
                p.inverse_projection =
                    inverse_or_identity(projection, "projection matrix").to_cols_array_2d();
            }
            Err(e) => log::warn!("keeping previous projection matrix: {e}"),
        }

        p.camera_world_position = self.camera.position.to_array();
        p.render_quality = self.render_quality;
    }
}
