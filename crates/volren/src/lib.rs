//! volren-rs: input preparation for direct volume rendering.
//!
//! The crate turns scan datasets and transfer-function presets into the
//! buffers a GPU ray marcher samples, and keeps the transform block that
//! drives it in sync with user interaction.
//!
//! # Quick Start
//!
//! ```no_run
//! use volren::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut scene = VolumeScene::new(
//!         Options::new().with_body_part(BodyPart::Head),
//!         DatasetTable::default(),
//!         PresetTable::default(),
//!         DirectoryResources::new("assets"),
//!         Camera::new(16.0 / 9.0)?,
//!     )?;
//!
//!     scene.set_shift(150.0)?;
//!     scene.begin_drag();
//!     scene.drag_changed(Vec2::new(40.0, 10.0));
//!     scene.update();
//!     scene.end_drag();
//!     Ok(())
//! }
//! ```
//!
//! # Pieces
//!
//! - [`VolumeScene`] owns every output and applies configuration changes
//! - [`FrameSource`] reads the published outputs from a render thread
//! - [`TextureSink`] receives the volume and lookup textures; [`WgpuTextureSink`] uploads to a GPU

pub mod presets;
pub mod scene;

pub use volren_core::{
    error::{Result, VolrenError},
    lut::{resample, LookupTexture, LUT_HEIGHT, LUT_WIDTH},
    math,
    options::{BodyPart, Options, Preset, RenderMethod},
    texture::{TexelFormat, TextureSink, TextureUpload},
    transfer_function::{AlphaStop, ColorStop, Rgba, TransferFunction},
    Mat4, Published, ScalarBuffer, UVec3, Vec2, Vec3, Vec4,
};
pub use volren_render::{
    Camera, DragState, ParameterState, RenderParameters, VolumeUniforms, WgpuTextureSink,
    DRAG_SENSITIVITY,
};
pub use volren_volume::{
    DatasetEntry, DatasetTable, DirectoryResources, ElementType, MemoryResources, ResourceProvider,
    Volume, VolumeBuffer, VolumeDescriptor, VolumeLoader, VolumeSource,
};

pub use presets::PresetTable;
pub use scene::{Frame, FrameSource, VolumeScene};

/// Installs an `env_logger` logger configured from `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::debug!("logging initialized");
    }
}
