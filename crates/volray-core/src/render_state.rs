//! Render modes and the per-frame parameters the UI edits.

use std::fmt;
use std::str::FromStr;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::VolrayError;
use crate::options::Options;

/// Shading algorithm used to march rays through the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RenderMode {
    /// Stops at the first sample above the threshold and shades it.
    #[default]
    Isosurface,
    /// Front-to-back compositing of every sample.
    AlphaBlending,
    /// Keeps the largest sample along the ray.
    MaximumIntensityProjection,
}

impl RenderMode {
    /// All modes, in the order they are listed to the user.
    pub const ALL: [RenderMode; 3] = [
        RenderMode::Isosurface,
        RenderMode::AlphaBlending,
        RenderMode::MaximumIntensityProjection,
    ];

    /// Display name, also the key used to select the mode by name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RenderMode::Isosurface => "Isosurface",
            RenderMode::AlphaBlending => "Alpha blending",
            RenderMode::MaximumIntensityProjection => "MIP",
        }
    }

    /// Looks a mode up by display name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.name() == name)
    }

    /// Whether the mode reads the threshold. Threshold controls should be
    /// disabled for the others.
    #[must_use]
    pub fn uses_threshold(self) -> bool {
        matches!(self, RenderMode::Isosurface)
    }

    /// Names of all modes.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|mode| mode.name()).collect()
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderMode {
    type Err = VolrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| VolrayError::UnknownMode(s.to_string()))
    }
}

/// Maps a raw intensity onto the normalized `[0, 1]` scale of the volume
/// texture. Degenerate ranges map to 0.
#[must_use]
pub fn normalize_threshold(raw: f64, range: (f64, f64)) -> f32 {
    let (min, max) = range;
    if max > min {
        ((raw - min) / (max - min)) as f32
    } else {
        0.0
    }
}

/// Intensity at `percent` (0–100) of the range, for slider controls.
#[must_use]
pub fn threshold_from_percent(percent: f64, range: (f64, f64)) -> f64 {
    range.0 + percent / 100.0 * (range.1 - range.0)
}

/// Position of `raw` within the range as a percentage, for slider controls.
#[must_use]
pub fn percent_from_threshold(raw: f64, range: (f64, f64)) -> f64 {
    let width = range.1 - range.0;
    if width > 0.0 {
        100.0 * (raw - range.0) / width
    } else {
        0.0
    }
}

/// Parameters edited by the UI and read by the renderer every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    /// Active shading mode.
    pub mode: RenderMode,
    /// Ray marching step length, > 0.
    pub step_length: f32,
    /// Isosurface threshold on the normalized scale.
    pub threshold: f32,
    /// Background colour.
    pub background_color: Vec3,
    /// Alpha the frame is cleared with.
    pub background_alpha: f32,
    /// Camera distance level, see [`RenderState::camera_distance`].
    pub distance_level: i32,
    /// Volume orientation.
    pub orientation: Quat,
    /// Scene orientation. Kept for the trackball transformation; identity
    /// unless a host rotates the scene itself.
    pub scene_orientation: Quat,
    /// Light position in camera coordinates.
    pub light_position: Vec3,
    /// Diffuse material colour.
    pub material_color: Vec3,
    /// Display gamma.
    pub gamma: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    base_distance: f32,
    distance_bounds: (i32, i32),
}

impl RenderState {
    #[must_use]
    pub fn new(options: &Options) -> Self {
        let distance_bounds = (
            options.min_distance_level.min(options.max_distance_level),
            options.max_distance_level.max(options.min_distance_level),
        );
        Self {
            mode: options.mode,
            step_length: options.step_length,
            threshold: 0.0,
            background_color: options.background_color,
            background_alpha: options.background_alpha,
            distance_level: options
                .distance_level
                .clamp(distance_bounds.0, distance_bounds.1),
            orientation: Quat::IDENTITY,
            scene_orientation: Quat::IDENTITY,
            light_position: options.light_position,
            material_color: options.material_color,
            gamma: options.gamma,
            fov_degrees: options.fov_degrees,
            near: options.near,
            far: options.far,
            base_distance: options.base_distance,
            distance_bounds,
        }
    }

    /// Sets the step length. Non-positive or non-finite values are ignored.
    pub fn set_step_length(&mut self, step_length: f32) {
        if step_length > 0.0 && step_length.is_finite() {
            self.step_length = step_length;
        } else {
            log::warn!("ignoring invalid step length {step_length}");
        }
    }

    /// Sets the threshold from a raw intensity of a volume with `range`.
    pub fn set_threshold(&mut self, raw: f64, range: (f64, f64)) {
        self.threshold = normalize_threshold(raw, range);
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    /// Selects a mode by display name.
    pub fn set_mode_by_name(&mut self, name: &str) -> crate::Result<()> {
        self.mode = name.parse()?;
        Ok(())
    }

    pub fn set_background(&mut self, color: Vec3) {
        self.background_color = color;
    }

    /// Moves the camera by a wheel delta, clamped to the configured bounds.
    pub fn zoom(&mut self, delta: i32) {
        self.distance_level = self
            .distance_level
            .saturating_add(delta)
            .clamp(self.distance_bounds.0, self.distance_bounds.1);
    }

    /// Distance from the camera to the volume centre,
    /// `base * exp(level / 600)`.
    #[must_use]
    pub fn camera_distance(&self) -> f32 {
        self.base_distance * (self.distance_level as f32 / 600.0).exp()
    }

    /// Vertical field of view in radians.
    #[must_use]
    pub fn fov(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    /// `1 / tan(fov / 2)`.
    #[must_use]
    pub fn focal_length(&self) -> f32 {
        1.0 / (self.fov() / 2.0).tan()
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}
