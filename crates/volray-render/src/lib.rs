//! Rendering backend for volray.
//!
//! This crate provides the wgpu side of the volume raycaster:
//! - [`GpuVolumeResource`] owning the volume and jitter textures
//! - [`RaycastRenderer`] with one pipeline per [`RenderMode`](volray_core::RenderMode)
//! - [`FrameTransforms`] and [`RaycastUniforms`] assembling per-frame shader inputs
//! - [`RenderEngine`] for headless rendering and frame capture

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Pixel and voxel counts are converted between integer and float types throughout
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]

pub mod cube;
pub mod engine;
pub mod error;
pub mod frame;
pub mod renderer;
pub mod screenshot;
pub mod shader;
pub mod uniforms;
pub mod volume_resource;

pub use cube::{CubeMesh, CUBE_INDICES, CUBE_VERTICES};
pub use engine::{RenderEngine, TARGET_FORMAT};
pub use error::{RenderError, RenderResult};
pub use frame::FrameTransforms;
pub use renderer::{RaycastRenderer, RendererState};
pub use screenshot::{save_image, save_to_buffer, ScreenshotError};
pub use shader::{fragment_source, ShaderBuilder, RAYCAST_COMMON};
pub use uniforms::RaycastUniforms;
pub use volume_resource::{create_bind_group_layout, noise_bytes, GpuVolumeResource};
