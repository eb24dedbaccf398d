//! Per-frame camera transforms.

use glam::{Mat3, Mat4, UVec2, Vec3};
use volray_core::{RenderState, VolumeGeometry};

/// Matrices and camera values derived from the render state, the volume
/// frame and the viewport. Independent of the render mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub model: Mat4,
    pub mvp: Mat4,
    /// Inverse transpose of the upper 3×3 of `view * model`.
    pub normal_matrix: Mat3,
    /// Camera position in world space.
    pub ray_origin: Vec3,
    pub aspect_ratio: f32,
    pub focal_length: f32,
}

impl FrameTransforms {
    /// `viewport` is in device pixels.
    pub fn new(state: &RenderState, geometry: &VolumeGeometry, viewport: UVec2) -> Self {
        let aspect_ratio = if viewport.x > 0 && viewport.y > 0 {
            viewport.x as f32 / viewport.y as f32
        } else {
            1.0
        };

        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -state.camera_distance()))
            * Mat4::from_quat(state.orientation);
        let projection = Mat4::perspective_rh(state.fov(), aspect_ratio, state.near, state.far);
        let model = geometry.model_matrix(false);
        let model_view = view * model;

        Self {
            view,
            projection,
            model,
            mvp: projection * model_view,
            normal_matrix: Mat3::from_mat4(model_view).inverse().transpose(),
            ray_origin: view.inverse().transform_point3(Vec3::ZERO),
            aspect_ratio,
            focal_length: state.focal_length(),
        }
    }
}
