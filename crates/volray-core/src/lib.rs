//! Core types for volray.
//!
//! This crate holds everything that does not need a GPU:
//! - [`read_volume`] parses structured-points volume files into a [`RawVolume`]
//! - [`normalize`] rescales any scalar type to one byte per voxel
//! - [`VolumeGeometry`] derives the bounding box the ray caster marches through
//! - [`RenderState`], [`RenderMode`] and [`TrackBall`] hold the interactive parameters
//! - [`Options`] for configuration

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Voxel counts and intensities are converted between integer and float types throughout
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod geometry;
pub mod header;
pub mod options;
pub mod reader;
pub mod render_state;
pub mod scalar;
pub mod trackball;
pub mod volume;

pub use error::{FormatError, FormatResult, Result, VolrayError};
pub use geometry::VolumeGeometry;
pub use header::{Encoding, VolumeHeader};
pub use options::Options;
pub use reader::{read_volume, read_volume_from};
pub use render_state::{
    normalize_threshold, percent_from_threshold, threshold_from_percent, RenderMode, RenderState,
};
pub use scalar::{Sample, ScalarType};
pub use trackball::{pixel_to_view, TrackBall};
pub use volume::{normalize, NormalizedVolume, RawVolume};

// Re-export glam types for convenience
pub use glam::{Mat3, Mat4, Quat, UVec3, Vec2, Vec3};
