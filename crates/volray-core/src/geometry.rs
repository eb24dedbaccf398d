//! Geometric frame of a volume.
//!
//! The bounding box is drawn as a two-unit cube (`[-1, 1]³`) that the model
//! matrix scales to the normalized extent of the volume, so the longest
//! physical side always spans one unit in object space.

use glam::{Mat4, UVec3, Vec3};

/// Frame derived from voxel counts, spacing and origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeGeometry {
    size: Vec3,
    spacing: Vec3,
    origin: Vec3,
}

impl VolumeGeometry {
    #[must_use]
    pub fn new(dimensions: UVec3, spacing: Vec3, origin: Vec3) -> Self {
        Self {
            size: dimensions.as_vec3(),
            spacing,
            origin,
        }
    }

    /// Size of the volume in physical units (`size ⊙ spacing`).
    #[must_use]
    pub fn physical_size(&self) -> Vec3 {
        self.size * self.spacing
    }

    /// Length of the longest physical side.
    #[must_use]
    pub fn scale_factor(&self) -> f32 {
        self.physical_size().max_element()
    }

    /// Physical size normalized so that the longest side is exactly 1.
    ///
    /// Empty volumes have a zero extent.
    #[must_use]
    pub fn extent(&self) -> Vec3 {
        let scale = self.scale_factor();
        if scale > 0.0 {
            self.physical_size() / scale
        } else {
            Vec3::ZERO
        }
    }

    /// Origin offset expressed in normalized object units.
    fn origin_shift(&self) -> Vec3 {
        let scale = self.scale_factor();
        if scale > 0.0 {
            -self.origin / scale
        } else {
            Vec3::ZERO
        }
    }

    /// Scales the two-unit cube to the volume extent, optionally translating
    /// it by the origin first.
    #[must_use]
    pub fn model_matrix(&self, shift: bool) -> Mat4 {
        let scale = Mat4::from_scale(0.5 * self.extent());
        if shift {
            Mat4::from_translation(self.origin_shift()) * scale
        } else {
            scale
        }
    }

    /// Intercepts of the top planes of the bounding box on each axis.
    #[must_use]
    pub fn top(&self, shift: bool) -> Vec3 {
        let top = self.extent() / 2.0;
        if shift {
            top + self.origin_shift()
        } else {
            top
        }
    }

    /// Intercepts of the bottom planes of the bounding box on each axis.
    #[must_use]
    pub fn bottom(&self, shift: bool) -> Vec3 {
        let bottom = -self.extent() / 2.0;
        if shift {
            bottom + self.origin_shift()
        } else {
            bottom
        }
    }
}
