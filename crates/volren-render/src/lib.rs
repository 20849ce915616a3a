//! Render parameter state for volren-rs.
//!
//! This crate provides the per-frame side of the pipeline, including:
//! - Camera and projection management
//! - GPU parameter and uniform blocks
//! - Drag tracking and the model-rotation state machine
//! - A wgpu-backed texture sink

pub mod camera;
pub mod gesture;
pub mod param_state;
pub mod parameters;
pub mod wgpu_sink;

pub use camera::Camera;
pub use gesture::{DragState, DragTracker};
pub use param_state::{ParameterState, DRAG_SENSITIVITY};
pub use parameters::{RenderParameters, VolumeUniforms};
pub use wgpu_sink::WgpuTextureSink;
