//! Uniform block shared by the raycasting programs.

use glam::{Mat3, UVec2};
use volray_core::{RenderState, VolumeGeometry};

use crate::frame::FrameTransforms;

/// GPU representation of the raycasting uniforms.
/// Layout must match WGSL `RaycastUniforms` exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct RaycastUniforms {
    pub view: [[f32; 4]; 4],
    pub mvp: [[f32; 4]; 4],
    /// `mat3x3<f32>` columns, each padded to 16 bytes.
    pub normal_matrix: [[f32; 4]; 3],
    pub ray_origin: [f32; 3],
    pub aspect_ratio: f32,
    pub top: [f32; 3],
    pub focal_length: f32,
    pub bottom: [f32; 3],
    pub step_length: f32,
    pub background_color: [f32; 3],
    /// Normalized isosurface threshold; zero for modes that ignore it.
    pub threshold: f32,
    pub light_position: [f32; 3],
    pub gamma: f32,
    pub material_color: [f32; 3],
    pub _pad0: f32,
    /// Viewport in device pixels.
    pub viewport_size: [f32; 2],
    pub _pad1: [f32; 2],
}

fn padded_mat3(m: Mat3) -> [[f32; 4]; 3] {
    [
        m.x_axis.extend(0.0).to_array(),
        m.y_axis.extend(0.0).to_array(),
        m.z_axis.extend(0.0).to_array(),
    ]
}

impl RaycastUniforms {
    /// Assembles the uniforms for one frame.
    ///
    /// Pure function of its inputs; the active mode only decides whether the
    /// threshold is forwarded.
    pub fn new(
        frame: &FrameTransforms,
        geometry: &VolumeGeometry,
        state: &RenderState,
        viewport: UVec2,
    ) -> Self {
        let threshold = if state.mode.uses_threshold() {
            state.threshold
        } else {
            0.0
        };

        Self {
            view: frame.view.to_cols_array_2d(),
            mvp: frame.mvp.to_cols_array_2d(),
            normal_matrix: padded_mat3(frame.normal_matrix),
            ray_origin: frame.ray_origin.to_array(),
            aspect_ratio: frame.aspect_ratio,
            top: geometry.top(false).to_array(),
            focal_length: frame.focal_length,
            bottom: geometry.bottom(false).to_array(),
            step_length: state.step_length,
            background_color: state.background_color.to_array(),
            threshold,
            light_position: state.light_position.to_array(),
            gamma: state.gamma,
            material_color: state.material_color.to_array(),
            _pad0: 0.0,
            viewport_size: viewport.as_vec2().to_array(),
            _pad1: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{UVec3, Vec3};
    use volray_core::RenderMode;

    fn inputs(mode: RenderMode) -> (FrameTransforms, VolumeGeometry, RenderState) {
        let geometry = VolumeGeometry::new(UVec3::new(2, 1, 1), Vec3::ONE, Vec3::ZERO);
        let mut state = RenderState::default();
        state.mode = mode;
        state.set_threshold(40.0, (0.0, 80.0));
        let frame = FrameTransforms::new(&state, &geometry, UVec2::new(800, 600));
        (frame, geometry, state)
    }

    #[test]
    fn test_raycast_uniforms_size() {
        let size = std::mem::size_of::<RaycastUniforms>();
        assert_eq!(size % 16, 0, "RaycastUniforms size ({size} bytes) must be 16-byte aligned");
        // view(64) + mvp(64) + normal(48) + 6 × vec3/f32 pairs(96) + viewport/pad(16) = 288
        assert_eq!(size, 288, "RaycastUniforms should be 288 bytes, got {size}");
    }

    #[test]
    fn test_threshold_only_for_isosurface() {
        for mode in RenderMode::ALL {
            let (frame, geometry, state) = inputs(mode);
            let uniforms = RaycastUniforms::new(&frame, &geometry, &state, UVec2::new(800, 600));
            let expected = if mode == RenderMode::Isosurface { 0.5 } else { 0.0 };
            assert_eq!(uniforms.threshold, expected, "{mode}");
        }
    }

    #[test]
    fn test_mode_switch_keeps_frame() {
        let (frame, geometry, state) = inputs(RenderMode::Isosurface);
        let iso = RaycastUniforms::new(&frame, &geometry, &state, UVec2::new(800, 600));
        for mode in [RenderMode::AlphaBlending, RenderMode::MaximumIntensityProjection] {
            let (frame, geometry, state) = inputs(mode);
            let other = RaycastUniforms::new(&frame, &geometry, &state, UVec2::new(800, 600));
            assert_eq!(other.mvp, iso.mvp);
            assert_eq!(other.top, iso.top);
            assert_eq!(other.bottom, iso.bottom);
            assert_eq!(other.ray_origin, iso.ray_origin);
            assert_eq!(RaycastUniforms { threshold: iso.threshold, ..other }, iso);
        }
    }

    #[test]
    fn test_box_and_viewport() {
        let (frame, geometry, state) = inputs(RenderMode::MaximumIntensityProjection);
        let uniforms = RaycastUniforms::new(&frame, &geometry, &state, UVec2::new(800, 600));
        assert_eq!(uniforms.top, [0.5, 0.25, 0.25]);
        assert_eq!(uniforms.bottom, [-0.5, -0.25, -0.25]);
        assert_eq!(uniforms.viewport_size, [800.0, 600.0]);
        assert_eq!(uniforms.gamma, 2.2);
        assert_eq!(uniforms.light_position, [3.0, 0.0, 3.0]);
    }

    #[test]
    fn test_normal_matrix_padding() {
        let padded = padded_mat3(Mat3::from_cols_array(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]));
        assert_eq!(padded, [[1.0, 2.0, 3.0, 0.0], [4.0, 5.0, 6.0, 0.0], [7.0, 8.0, 9.0, 0.0]]);
    }
}
