//! Headless rendering API.
//!
//! One-shot helpers that load a volume file and render a single frame
//! without a window. Useful for batch processing and automated screenshots.

use std::path::Path;

use volray_core::RenderMode;

use crate::error::Result;
use crate::viewer::Viewer;

/// Renders a volume file to a raw RGBA pixel buffer.
///
/// The returned buffer has `width * height * 4` bytes, ordered row by row
/// from the top-left.
///
/// # Example
/// ```no_run
/// use volray::*;
///
/// let pixels = render_volume_to_image("head.vtk", 800, 600, RenderMode::MaximumIntensityProjection).unwrap();
/// assert_eq!(pixels.len(), 800 * 600 * 4);
/// ```
pub fn render_volume_to_image(
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    mode: RenderMode,
) -> Result<Vec<u8>> {
    let mut viewer = Viewer::new(width, height)?;
    viewer.set_volume(path)?;
    viewer.state_mut().set_mode(mode);
    viewer.render_to_image()
}

/// Renders a volume file and saves the frame as PNG or JPEG.
///
/// # Example
/// ```no_run
/// use volray::*;
///
/// render_volume_to_file("head.vtk", "head.png", 800, 600, RenderMode::AlphaBlending).unwrap();
/// ```
pub fn render_volume_to_file(
    path: impl AsRef<Path>,
    filename: impl AsRef<Path>,
    width: u32,
    height: u32,
    mode: RenderMode,
) -> Result<()> {
    let mut viewer = Viewer::new(width, height)?;
    viewer.set_volume(path)?;
    viewer.state_mut().set_mode(mode);
    viewer.render_to_file(filename)
}
