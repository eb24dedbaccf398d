//! Configuration options for volray.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render_state::RenderMode;

/// Viewer configuration.
///
/// Every field has a default, so a partial JSON document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,

    /// Near clipping plane.
    pub near: f32,

    /// Far clipping plane.
    pub far: f32,

    /// Camera distance at distance level 0.
    pub base_distance: f32,

    /// Initial camera distance level.
    pub distance_level: i32,

    /// Lower bound for the camera distance level.
    pub min_distance_level: i32,

    /// Upper bound for the camera distance level.
    pub max_distance_level: i32,

    /// Light position, in camera coordinates.
    pub light_position: Vec3,

    /// Diffuse material colour.
    pub material_color: Vec3,

    /// Gamma applied by the shading programs.
    pub gamma: f32,

    /// Ray marching step, as a fraction of the ray segment.
    pub step_length: f32,

    /// Mode active at startup.
    pub mode: RenderMode,

    /// Background colour.
    pub background_color: Vec3,

    /// Alpha the frame is cleared with.
    pub background_alpha: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 100.0,
            base_distance: 4.0,
            distance_level: -200,
            min_distance_level: -1800,
            max_distance_level: 600,
            light_position: Vec3::new(3.0, 0.0, 3.0),
            material_color: Vec3::ONE,
            gamma: 2.2,
            step_length: 0.01,
            mode: RenderMode::Isosurface,
            background_color: Vec3::ZERO,
            background_alpha: 1.0,
        }
    }
}

impl Options {
    /// Parses options from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serializes the options as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Focal length for the configured field of view, `1 / tan(fov / 2)`.
    #[must_use]
    pub fn focal_length(&self) -> f32 {
        1.0 / (self.fov_degrees.to_radians() / 2.0).tan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.fov_degrees, 60.0);
        assert_eq!(options.distance_level, -200);
        assert_eq!(options.mode, RenderMode::Isosurface);
        assert!((options.focal_length() - 3.0f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_partial_json() {
        let options = Options::from_json_str(r#"{ "gamma": 1.0, "mode": "MaximumIntensityProjection" }"#).unwrap();
        assert_eq!(options.gamma, 1.0);
        assert_eq!(options.mode, RenderMode::MaximumIntensityProjection);
        assert_eq!(options.near, 0.1);
    }

    #[test]
    fn test_json_round_trip() {
        let mut options = Options::default();
        options.background_color = Vec3::new(0.2, 0.3, 0.4);
        let json = options.to_json_string().unwrap();
        assert_eq!(Options::from_json_str(&json).unwrap(), options);
    }

    #[test]
    fn test_invalid_json() {
        assert!(Options::from_json_str("{ \"gamma\": \"bright\" }").is_err());
    }
}
