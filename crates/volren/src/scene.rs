//! The scene context: one explicit owner for every renderer input.
//!
//! [`VolumeScene`] holds the configuration, the loaded volume, the current
//! transfer function and its lookup texture, the shading uniforms and the
//! render parameter state. Configuration changes are all-or-nothing: a
//! failing load or parse returns the error and leaves every output as it was.
//!
//! Outputs are also published together as one [`Frame`] through a
//! [`Published`] slot, so a render loop on another thread can read them via
//! a [`FrameSource`] and never pairs a new volume with a stale transform.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use volren_core::{
    resample, BodyPart, LookupTexture, Options, Preset, Published, RenderMethod, Result, TextureSink,
    TransferFunction, VolrenError,
};
use volren_render::{Camera, ParameterState, RenderParameters, VolumeUniforms};
use volren_volume::{DatasetTable, ResourceProvider, Volume, VolumeLoader};

use crate::presets::PresetTable;

/// A consistent set of renderer inputs taken at one instant.
///
/// The scene publishes a whole `Frame` once per configuration change, after
/// every output it touches is ready.
#[derive(Debug, Clone)]
pub struct Frame {
    pub volume: Arc<Volume>,
    pub lookup_texture: Arc<LookupTexture>,
    pub parameters: Arc<RenderParameters>,
    pub uniforms: Arc<VolumeUniforms>,
    /// Bumped each time a new volume is installed.
    pub volume_generation: u64,
    /// Bumped each time a new lookup texture is installed.
    pub lookup_texture_generation: u64,
}

/// Read-only handle to the published outputs of a [`VolumeScene`].
///
/// Cheap to clone and `Send + Sync` for the supported payloads.
#[derive(Debug, Clone)]
pub struct FrameSource {
    slot: Arc<Published<Frame>>,
}

impl FrameSource {
    /// Takes a snapshot of every output.
    #[must_use]
    pub fn frame(&self) -> Arc<Frame> {
        self.slot.load()
    }

    /// Counts published frames. Changes whenever any output does, so a render
    /// loop can skip work while it stays the same.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.slot.generation()
    }

    #[must_use]
    pub fn parameters(&self) -> Arc<RenderParameters> {
        Arc::clone(&self.slot.load().parameters)
    }

    #[must_use]
    pub fn volume_generation(&self) -> u64 {
        self.slot.load().volume_generation
    }

    #[must_use]
    pub fn lookup_texture_generation(&self) -> u64 {
        self.slot.load().lookup_texture_generation
    }
}

/// Owner of all renderer inputs.
pub struct VolumeScene<R> {
    options: Options,
    presets: PresetTable,
    loader: VolumeLoader<R>,
    transfer_function: TransferFunction,
    lookup_texture: Arc<LookupTexture>,
    volume: Arc<Volume>,
    uniforms: VolumeUniforms,
    state: ParameterState,
    published: Arc<Published<Frame>>,
    volume_generation: u64,
    lookup_texture_generation: u64,
    volume_dirty: bool,
    lookup_texture_dirty: bool,
}

impl<R: ResourceProvider> VolumeScene<R> {
    /// Loads the body part and preset named by `options` and builds the
    /// initial parameter block.
    pub fn new(
        options: Options,
        datasets: DatasetTable,
        presets: PresetTable,
        resources: R,
        camera: Camera,
    ) -> Result<Self> {
        check_shift(options.shift)?;
        check_quality(options.render_quality)?;
        let loader = VolumeLoader::new(datasets, resources);
        let volume = Arc::new(loader.load(options.body_part)?);
        let transfer_function = presets.load(options.preset, loader.resources())?;
        let lookup_texture = Arc::new(resample(&transfer_function.clone().with_shift(options.shift)));

        let mut state = ParameterState::new(camera, options.render_quality)?;
        state.reset_model(volume.descriptor.physical_scale());
        let uniforms = VolumeUniforms::from_options(&options);

        let published = Arc::new(Published::new(Frame {
            volume: Arc::clone(&volume),
            lookup_texture: Arc::clone(&lookup_texture),
            parameters: Arc::new(*state.parameters()),
            uniforms: Arc::new(uniforms),
            volume_generation: 0,
            lookup_texture_generation: 0,
        }));

        log::info!(
            "scene ready: {} with preset {}",
            options.body_part.name(),
            options.preset.name()
        );
        Ok(Self {
            options,
            presets,
            loader,
            transfer_function,
            lookup_texture,
            volume,
            uniforms,
            state,
            published,
            volume_generation: 0,
            lookup_texture_generation: 0,
            volume_dirty: true,
            lookup_texture_dirty: true,
        })
    }

    /// Returns a handle for reading published outputs from another thread.
    #[must_use]
    pub fn frame_source(&self) -> FrameSource {
        FrameSource {
            slot: Arc::clone(&self.published),
        }
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the preset's transfer function without the shift applied.
    #[must_use]
    pub fn transfer_function(&self) -> &TransferFunction {
        &self.transfer_function
    }

    #[must_use]
    pub fn lookup_texture(&self) -> &LookupTexture {
        &self.lookup_texture
    }

    #[must_use]
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    #[must_use]
    pub fn uniforms(&self) -> &VolumeUniforms {
        &self.uniforms
    }

    #[must_use]
    pub fn parameters(&self) -> &RenderParameters {
        self.state.parameters()
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        self.state.camera()
    }

    /// Returns true if a texture changed since the last upload.
    #[must_use]
    pub fn has_pending_uploads(&self) -> bool {
        self.volume_dirty || self.lookup_texture_dirty
    }

    /// Switches dataset. On success the model is rescaled to the new
    /// physical extent and the shift is reset to 0.
    pub fn set_part(&mut self, part: BodyPart) -> Result<()> {
        let volume = Arc::new(self.loader.load(part)?);
        let lookup_texture = Arc::new(resample(&self.transfer_function.clone().with_shift(0.0)));

        self.state.reset_model(volume.descriptor.physical_scale());
        self.options.body_part = part;
        self.options.shift = 0.0;
        self.install_volume(volume);
        self.install_lookup_texture(lookup_texture);
        self.publish();
        Ok(())
    }

    /// Switches transfer-function preset and resets the shift to 0.
    pub fn set_preset(&mut self, preset: Preset) -> Result<()> {
        let transfer_function = self.presets.load(preset, self.loader.resources())?;
        let lookup_texture = Arc::new(resample(&transfer_function.clone().with_shift(0.0)));

        log::info!("preset {} ({})", preset.name(), transfer_function.name);
        self.transfer_function = transfer_function;
        self.options.preset = preset;
        self.options.shift = 0.0;
        self.install_lookup_texture(lookup_texture);
        self.publish();
        Ok(())
    }

    /// Slides the transfer function by `shift` data units.
    pub fn set_shift(&mut self, shift: f32) -> Result<()> {
        check_shift(shift)?;
        let lookup_texture = Arc::new(resample(&self.transfer_function.clone().with_shift(shift)));
        self.options.shift = shift;
        self.install_lookup_texture(lookup_texture);
        self.publish();
        Ok(())
    }

    pub fn set_method(&mut self, method: RenderMethod) {
        self.options.method = method;
        self.refresh_uniforms();
    }

    pub fn set_lighting(&mut self, enabled: bool) {
        self.options.lighting_enabled = enabled;
        self.refresh_uniforms();
    }

    /// Sets the ray-march sample count.
    pub fn set_quality(&mut self, quality: i32) -> Result<()> {
        check_quality(quality)?;
        self.options.render_quality = quality;
        self.state.set_render_quality(quality);
        self.refresh_uniforms();
        Ok(())
    }

    /// Replaces the camera. Degenerate cameras are rejected.
    pub fn set_camera(&mut self, camera: Camera) -> Result<()> {
        self.state.set_camera(camera)?;
        self.publish();
        Ok(())
    }

    /// Moves the volume in its local space.
    pub fn translate(&mut self, offset: Vec3) {
        self.state.translate(offset);
        self.publish();
    }

    pub fn begin_drag(&mut self) {
        self.state.begin_drag();
    }

    /// Reports the total drag translation since the drag began.
    pub fn drag_changed(&mut self, total: Vec2) {
        self.state.drag_changed(total);
    }

    /// Reports an incremental drag step.
    pub fn drag_by(&mut self, delta: Vec2) {
        self.state.drag_by(delta);
    }

    pub fn end_drag(&mut self) {
        self.state.end_drag();
    }

    /// Per-frame update. Returns true if the parameter block changed.
    pub fn update(&mut self) -> bool {
        if self.state.update() {
            self.publish();
            true
        } else {
            false
        }
    }

    /// Uploads the textures that changed since the last successful upload.
    ///
    /// Returns the number of textures uploaded. A texture whose upload fails
    /// stays pending.
    pub fn upload_pending<S: TextureSink + ?Sized>(&mut self, sink: &mut S) -> Result<usize> {
        let mut uploaded = 0;
        if self.volume_dirty {
            sink.upload(&self.volume.upload())?;
            self.volume_dirty = false;
            uploaded += 1;
        }
        if self.lookup_texture_dirty {
            sink.upload(&self.lookup_texture.upload())?;
            self.lookup_texture_dirty = false;
            uploaded += 1;
        }
        if uploaded > 0 {
            log::debug!("uploaded {uploaded} pending texture(s)");
        }
        Ok(uploaded)
    }

    fn install_volume(&mut self, volume: Arc<Volume>) {
        self.volume = volume;
        self.volume_generation += 1;
        self.volume_dirty = true;
    }

    fn install_lookup_texture(&mut self, lookup_texture: Arc<LookupTexture>) {
        self.lookup_texture = lookup_texture;
        self.lookup_texture_generation += 1;
        self.lookup_texture_dirty = true;
    }

    fn refresh_uniforms(&mut self) {
        self.uniforms = VolumeUniforms::from_options(&self.options);
        self.publish();
    }

    /// Swaps in a frame built from the current outputs. Callers install
    /// everything a change touches first, then publish once.
    fn publish(&self) {
        self.published.publish(Frame {
            volume: Arc::clone(&self.volume),
            lookup_texture: Arc::clone(&self.lookup_texture),
            parameters: Arc::new(*self.state.parameters()),
            uniforms: Arc::new(self.uniforms),
            volume_generation: self.volume_generation,
            lookup_texture_generation: self.lookup_texture_generation,
        });
    }
}

fn check_quality(quality: i32) -> Result<()> {
    if quality > 0 {
        Ok(())
    } else {
        Err(VolrenError::Format(format!(
            "render quality {quality} must be positive"
        )))
    }
}

fn check_shift(shift: f32) -> Result<()> {
    if shift.is_finite() {
        Ok(())
    } else {
        Err(VolrenError::Format(format!("shift {shift} must be finite")))
    }
}
