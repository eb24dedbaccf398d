//! Error type for the viewer API.

use thiserror::Error;
use volray_core::{FormatError, VolrayError};
use volray_render::{RenderError, ScreenshotError};

/// Errors surfaced by [`Viewer`](crate::Viewer) and the headless helpers.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// The volume file could not be parsed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A GPU resource could not be created or used.
    #[error(transparent)]
    Render(RenderError),

    /// Invalid configuration or mode name.
    #[error(transparent)]
    Core(VolrayError),

    /// Writing or reading back a frame failed.
    #[error(transparent)]
    Screenshot(#[from] ScreenshotError),
}

// File errors stay format errors whichever layer reports them.
impl From<RenderError> for ViewerError {
    fn from(error: RenderError) -> Self {
        match error {
            RenderError::Format(e) => ViewerError::Format(e),
            other => ViewerError::Render(other),
        }
    }
}

impl From<VolrayError> for ViewerError {
    fn from(error: VolrayError) -> Self {
        match error {
            VolrayError::Format(e) => ViewerError::Format(e),
            other => ViewerError::Core(other),
        }
    }
}

/// A specialized Result type for the viewer API.
pub type Result<T> = std::result::Result<T, ViewerError>;
