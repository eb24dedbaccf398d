//! Canvas-level viewer: the API a windowing shell drives.

use std::path::Path;

use glam::{UVec3, Vec3};
use pollster::FutureExt;
use volray_core::{
    pixel_to_view, threshold_from_percent, Options, RenderMode, RenderState, TrackBall,
};
use volray_render::{save_image, RaycastRenderer, RenderEngine, RendererState};

use crate::error::Result;

/// A volume raycaster bound to an offscreen target.
///
/// Sizes passed to [`Viewer::resize`] and pointer positions are in logical
/// pixels; the renderer works in device pixels (`logical × pixel_ratio`).
pub struct Viewer {
    engine: RenderEngine,
    renderer: RaycastRenderer,
    state: RenderState,
    trackball: TrackBall,
    scene_trackball: TrackBall,
    logical_size: (u32, u32),
    pixel_ratio: f32,
}

impl Viewer {
    /// Creates a viewer with default [`Options`].
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_options(width, height, &Options::default())
    }

    pub fn with_options(width: u32, height: u32, options: &Options) -> Result<Self> {
        let engine = RenderEngine::new_headless(width, height).block_on()?;
        let renderer = RaycastRenderer::new(
            &engine.device,
            &engine.queue,
            engine.format(),
            engine.width(),
            engine.height(),
        )?;
        log::info!("volray viewer initialized ({width}x{height})");

        Ok(Self {
            engine,
            renderer,
            state: RenderState::new(options),
            trackball: TrackBall::new(),
            scene_trackball: TrackBall::new(),
            logical_size: (width.max(1), height.max(1)),
            pixel_ratio: 1.0,
        })
    }

    /// Loads a volume file, replacing the current one.
    ///
    /// On error the previous volume, range and size are kept.
    pub fn set_volume(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.renderer
            .load_volume(&self.engine.device, &self.engine.queue, path)?;
        Ok(())
    }

    pub fn set_step_length(&mut self, step_length: f32) {
        self.state.set_step_length(step_length);
    }

    /// Sets the isosurface threshold in raw intensity units of the current
    /// volume.
    pub fn set_threshold(&mut self, threshold: f64) {
        self.state.set_threshold(threshold, self.renderer.range());
    }

    /// Sets the threshold at `percent` of the current intensity range.
    pub fn set_threshold_percent(&mut self, percent: f64) {
        self.set_threshold(threshold_from_percent(percent, self.renderer.range()));
    }

    /// Selects a render mode by display name.
    pub fn set_mode(&mut self, name: &str) -> Result<()> {
        self.state.set_mode_by_name(name)?;
        Ok(())
    }

    pub fn set_background(&mut self, color: Vec3) {
        self.state.set_background(color);
    }

    pub fn modes(&self) -> Vec<&'static str> {
        self.renderer.modes()
    }

    pub fn mode(&self) -> RenderMode {
        self.state.mode
    }

    pub fn background(&self) -> Vec3 {
        self.state.background_color
    }

    /// Intensity range of the last successfully loaded volume.
    pub fn range(&self) -> (f64, f64) {
        self.renderer.range()
    }

    /// Voxel counts of the last successfully loaded volume.
    pub fn size(&self) -> UVec3 {
        self.renderer.size()
    }

    pub fn is_ready(&self) -> bool {
        self.renderer.state() == RendererState::Ready
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RenderState {
        &mut self.state
    }

    pub fn renderer(&self) -> &RaycastRenderer {
        &self.renderer
    }

    /// Resizes the canvas. The target and jitter noise are recreated at
    /// `width × height × pixel_ratio` device pixels.
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.logical_size = (width.max(1), height.max(1));
        self.pixel_ratio = if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };

        let device_width = (self.logical_size.0 as f32 * self.pixel_ratio).round() as u32;
        let device_height = (self.logical_size.1 as f32 * self.pixel_ratio).round() as u32;
        self.engine.resize(device_width, device_height);
        self.renderer.resize(
            &self.engine.device,
            &self.engine.queue,
            self.engine.width(),
            self.engine.height(),
        );
    }

    /// Device-pixel size of the rendered frame.
    pub fn frame_size(&self) -> (u32, u32) {
        (self.engine.width(), self.engine.height())
    }

    fn view_position(&self, x: f32, y: f32) -> glam::Vec2 {
        pixel_to_view(
            x,
            y,
            self.logical_size.0 as f32,
            self.logical_size.1 as f32,
        )
    }

    /// Primary button pressed at a logical pixel position.
    pub fn pointer_press(&mut self, x: f32, y: f32) {
        let position = self.view_position(x, y);
        self.trackball
            .push(position, self.scene_trackball.rotation().conjugate());
        self.sync_orientation();
    }

    /// Pointer moved. Without the primary button held the drag is released.
    pub fn pointer_move(&mut self, x: f32, y: f32, button_held: bool) {
        let position = self.view_position(x, y);
        let transformation = self.scene_trackball.rotation().conjugate();
        if button_held {
            self.trackball.move_to(position, transformation);
        } else {
            self.trackball.release(position, transformation);
        }
        self.sync_orientation();
    }

    /// Primary button released.
    pub fn pointer_release(&mut self, x: f32, y: f32) {
        let position = self.view_position(x, y);
        self.trackball
            .release(position, self.scene_trackball.rotation().conjugate());
        self.sync_orientation();
    }

    /// Mouse wheel; positive deltas move the camera away.
    pub fn wheel(&mut self, delta: i32) {
        self.state.zoom(delta);
    }

    fn sync_orientation(&mut self) {
        self.state.orientation = self.trackball.rotation();
        self.state.scene_orientation = self.scene_trackball.rotation();
    }

    /// Renders one frame into the offscreen target.
    pub fn render_frame(&mut self) -> Result<()> {
        let mut encoder = self.engine.create_encoder("volray frame");
        self.renderer.render(
            &self.engine.queue,
            &mut encoder,
            self.engine.target_view(),
            &self.state,
        )?;
        self.engine.submit(encoder);
        Ok(())
    }

    /// Reads the last rendered frame back as RGBA rows.
    pub fn capture(&self) -> Result<Vec<u8>> {
        Ok(self.engine.capture()?)
    }

    /// Renders a frame and returns its RGBA pixels.
    pub fn render_to_image(&mut self) -> Result<Vec<u8>> {
        self.render_frame()?;
        self.capture()
    }

    /// Renders a frame and saves it as PNG or JPEG.
    pub fn render_to_file(&mut self, filename: impl AsRef<Path>) -> Result<()> {
        let data = self.render_to_image()?;
        let (width, height) = self.frame_size();
        save_image(filename, &data, width, height)?;
        Ok(())
    }
}
