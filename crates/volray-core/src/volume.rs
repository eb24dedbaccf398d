//! Volume data: raw samples as read from file and their normalized form.

use glam::{UVec3, Vec3};
use num_traits::AsPrimitive;

use crate::error::{Result, VolrayError};
use crate::geometry::VolumeGeometry;
use crate::header::VolumeHeader;
use crate::scalar::{with_sample_type, ScalarType, Sample};

/// A volume in the numeric type it was stored with.
///
/// `data` holds `voxel_count()` samples of `scalar_type` in host byte order,
/// x varying fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVolume {
    scalar_type: ScalarType,
    dimensions: UVec3,
    origin: Vec3,
    spacing: Vec3,
    range: (f64, f64),
    data: Vec<u8>,
}

impl RawVolume {
    pub(crate) fn from_header(header: &VolumeHeader, range: (f64, f64), data: Vec<u8>) -> Self {
        Self {
            scalar_type: header.scalar_type,
            dimensions: header.dimensions,
            origin: header.origin,
            spacing: header.spacing,
            range,
            data,
        }
    }

    /// Source numeric type of the samples.
    #[must_use]
    pub fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    /// Number of voxels along each axis.
    #[must_use]
    pub fn dimensions(&self) -> UVec3 {
        self.dimensions
    }

    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[must_use]
    pub fn spacing(&self) -> Vec3 {
        self.spacing
    }

    /// Observed `(min, max)` over all samples.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Sample bytes in host order.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.data.len() / self.scalar_type.size()
    }

    /// Geometric frame derived from dimensions, spacing and origin.
    #[must_use]
    pub fn geometry(&self) -> VolumeGeometry {
        VolumeGeometry::new(self.dimensions, self.spacing, self.origin)
    }

    /// All samples widened to `f64`.
    #[must_use]
    pub fn samples_f64(&self) -> Vec<f64> {
        with_sample_type!(self.scalar_type, T => self
            .data
            .chunks_exact(<T as Sample>::SIZE)
            .map(|chunk| -> f64 { T::from_ne_slice(chunk).as_() })
            .collect())
    }

    /// One-line description: dimensions, origin, spacing, type and range.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "dimensions {} {} {}, origin {} {} {}, spacing {} {} {}, type {}, range {} {}",
            self.dimensions.x,
            self.dimensions.y,
            self.dimensions.z,
            self.origin.x,
            self.origin.y,
            self.origin.z,
            self.spacing.x,
            self.spacing.y,
            self.spacing.z,
            self.scalar_type,
            self.range.0,
            self.range.1,
        )
    }

    /// Converts to one byte per voxel, see [`normalize`].
    #[must_use]
    pub fn normalized(&self) -> NormalizedVolume {
        normalize(self)
    }
}

/// A volume rescaled to one unsigned byte per voxel.
///
/// The original intensity range is kept so that intensities picked in the
/// UI can be mapped onto the byte scale.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedVolume {
    dimensions: UVec3,
    origin: Vec3,
    spacing: Vec3,
    range: (f64, f64),
    data: Vec<u8>,
}

impl NormalizedVolume {
    /// Builds a normalized volume from bytes already in `[0, 255]`.
    pub fn new(
        dimensions: UVec3,
        spacing: Vec3,
        origin: Vec3,
        range: (f64, f64),
        data: Vec<u8>,
    ) -> Result<Self> {
        let expected = dimensions.as_u64vec3().element_product();
        if expected != data.len() as u64 {
            return Err(VolrayError::SizeMismatch {
                expected: usize::try_from(expected).unwrap_or(usize::MAX),
                actual: data.len(),
            });
        }
        Ok(Self {
            dimensions,
            origin,
            spacing,
            range,
            data,
        })
    }

    #[must_use]
    pub fn dimensions(&self) -> UVec3 {
        self.dimensions
    }

    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[must_use]
    pub fn spacing(&self) -> Vec3 {
        self.spacing
    }

    /// Intensity range of the source samples.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// One byte per voxel, x varying fastest.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.data.len()
    }

    /// Whether the source volume had zero dynamic range.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.range.1 > self.range.0)
    }

    #[must_use]
    pub fn geometry(&self) -> VolumeGeometry {
        VolumeGeometry::new(self.dimensions, self.spacing, self.origin)
    }
}

/// Rescales every sample to `round(255 * (v - min) / (max - min))`.
///
/// A volume with `min == max` has no dynamic range; every voxel becomes 0.
#[must_use]
pub fn normalize(volume: &RawVolume) -> NormalizedVolume {
    let (min, max) = volume.range;
    let data = if max > min {
        with_sample_type!(volume.scalar_type, T => rescale::<T>(&volume.data, min, max))
    } else {
        if volume.voxel_count() > 0 {
            log::warn!("volume has constant intensity {min}, normalizing to zero");
        }
        vec![0; volume.voxel_count()]
    };

    NormalizedVolume {
        dimensions: volume.dimensions,
        origin: volume.origin,
        spacing: volume.spacing,
        range: volume.range,
        data,
    }
}

fn rescale<T: Sample>(data: &[u8], min: f64, max: f64) -> Vec<u8> {
    let scale = 255.0 / (max - min);
    data.chunks_exact(T::SIZE)
        .map(|chunk| {
            let value: f64 = T::from_ne_slice(chunk).as_();
            ((value - min) * scale).round().clamp(0.0, 255.0) as u8
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Encoding;

    fn raw(scalar_type: ScalarType, samples: &[f64]) -> RawVolume {
        let header = VolumeHeader {
            scalar_type,
            dimensions: UVec3::new(samples.len() as u32, 1, 1),
            origin: Vec3::ZERO,
            spacing: Vec3::ONE,
            encoding: Encoding::Binary,
        };
        let mut data = vec![0u8; samples.len() * scalar_type.size()];
        let mut range = crate::scalar::RangeAccumulator::new();
        with_sample_type!(scalar_type, T => {
            for (chunk, &v) in data.chunks_exact_mut(<T as Sample>::SIZE).zip(samples) {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let value = v as T;
                range.push(value.as_());
                value.store_ne(chunk);
            }
        });
        RawVolume::from_header(&header, range.finish(), data)
    }

    #[test]
    fn test_normalize_u8_identity_range() {
        let volume = raw(ScalarType::Uint8, &[0.0, 255.0, 128.0]);
        assert_eq!(normalize(&volume).data(), &[0, 255, 128]);
    }

    #[test]
    fn test_normalize_signed() {
        let volume = raw(ScalarType::Int16, &[-100.0, 0.0, 100.0]);
        let normalized = normalize(&volume);
        assert_eq!(normalized.data(), &[0, 128, 255]);
        assert_eq!(normalized.range(), (-100.0, 100.0));
    }

    #[test]
    fn test_normalize_float() {
        let volume = raw(ScalarType::Float32, &[0.25, 0.5, 1.25]);
        assert_eq!(normalize(&volume).data(), &[0, 64, 255]);
    }

    #[test]
    fn test_normalize_constant_volume() {
        let volume = raw(ScalarType::Float64, &[3.5, 3.5, 3.5, 3.5]);
        assert_eq!(volume.range(), (3.5, 3.5));
        let normalized = normalize(&volume);
        assert!(normalized.is_degenerate());
        assert_eq!(normalized.data(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_normalized_keeps_frame() {
        let volume = raw(ScalarType::Uint32, &[1.0, 2.0]);
        let normalized = volume.normalized();
        assert_eq!(normalized.dimensions(), volume.dimensions());
        assert_eq!(normalized.spacing(), volume.spacing());
        assert_eq!(normalized.origin(), volume.origin());
        assert_eq!(normalized.voxel_count(), 2);
    }

    #[test]
    fn test_new_checks_size() {
        let err = NormalizedVolume::new(
            UVec3::new(2, 2, 2),
            Vec3::ONE,
            Vec3::ZERO,
            (0.0, 1.0),
            vec![0; 7],
        );
        assert!(matches!(
            err,
            Err(VolrayError::SizeMismatch {
                expected: 8,
                actual: 7
            })
        ));
    }

    #[test]
    fn test_summary_mentions_type() {
        let volume = raw(ScalarType::Int64, &[-1.0, 1.0]);
        let summary = volume.summary();
        assert!(summary.contains("type long"));
        assert!(summary.contains("range -1 1"));
    }
}
