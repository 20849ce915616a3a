//! Core data preparation for volren-rs.
//!
//! This crate provides the pieces of the volume-rendering input pipeline that
//! do not depend on any dataset or graphics API:
//! - [`ScalarBuffer`] flat N-dimensional storage shared by voxels and lookup textures
//! - [`TransferFunction`] documents and their [`resample`]d [`LookupTexture`]
//! - Transform construction and composition in [`math`]
//! - Configuration [`Options`], the error taxonomy, and the [`TextureSink`] contract

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Texture extents are u32 on the GPU side and usize on the CPU side
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

pub mod buffer;
pub mod error;
pub mod lut;
pub mod math;
pub mod options;
pub mod publish;
pub mod texture;
pub mod transfer_function;

pub use buffer::ScalarBuffer;
pub use error::{Result, VolrenError};
pub use lut::{resample, LookupTexture, LUT_HEIGHT, LUT_WIDTH};
pub use options::{BodyPart, Options, Preset, RenderMethod};
pub use publish::Published;
pub use texture::{TexelFormat, TextureSink, TextureUpload};
pub use transfer_function::{AlphaStop, ColorStop, Rgba, TransferFunction};

// Re-export glam types for convenience
pub use glam::{Mat4, UVec3, Vec2, Vec3, Vec4};
