//! Rendering error types.

use thiserror::Error;
use volray_core::FormatError;

/// Errors that can occur during rendering operations.
///
/// GPU resource failures are kept apart from [`FormatError`] so callers can
/// tell a bad file from a bad device.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Shader compilation failed.
    #[error("shader compilation failed: {0}")]
    ShaderCompilationFailed(String),

    /// The volume has no voxels and cannot back a texture.
    #[error("cannot upload an empty volume")]
    EmptyVolume,

    /// A volume axis exceeds the device's 3D texture limit.
    #[error("volume dimensions {dimensions:?} exceed the 3D texture limit of {limit}")]
    TextureTooLarge { dimensions: [u32; 3], limit: u32 },

    /// A frame was requested before any volume was loaded.
    #[error("no volume loaded")]
    NotReady,

    /// Loading the volume file failed.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
