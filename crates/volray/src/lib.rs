//! volray: GPU volume raycasting for structured-points volume files.
//!
//! A volume file is parsed, normalized to one byte per voxel and uploaded
//! as a 3D texture. Each frame marches one ray per pixel through it using
//! one of three shading modes: isosurface, alpha blending or maximum
//! intensity projection.
//!
//! # Quick Start
//!
//! ```no_run
//! use volray::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut viewer = Viewer::new(800, 600)?;
//!     viewer.set_volume("head.vtk")?;
//!     viewer.set_mode("Isosurface")?;
//!     viewer.set_threshold_percent(30.0);
//!     viewer.render_to_file("head.png")?;
//!
//!     Ok(())
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

mod error;
mod headless;
mod viewer;

pub use error::{Result, ViewerError};
pub use headless::{render_volume_to_file, render_volume_to_image};
pub use viewer::Viewer;

// Re-export core types
pub use volray_core::{
    normalize, read_volume, read_volume_from, FormatError, NormalizedVolume, Options, RawVolume,
    RenderMode, RenderState, ScalarType, TrackBall, VolrayError, VolumeGeometry, Mat4, Quat,
    UVec3, Vec2, Vec3,
};

// Re-export render types
pub use volray_render::{RaycastRenderer, RenderEngine, RenderError, ScreenshotError};

/// Initializes the `env_logger` backend for the `log` facade.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
