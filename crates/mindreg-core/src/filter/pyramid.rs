//! Multi-resolution volume pyramid.

use crate::error::{CoreError, Result};
use crate::filter::{downsample, gaussian_smooth};
use crate::volume::Volume;

/// A sequence of smoothed, downsampled copies of a volume, coarsest first.
///
/// Each level applies an isotropic Gaussian (sigma in physical units)
/// followed by an integer shrink. Levels where both operations are the
/// identity reuse the input without filtering.
pub struct VolumePyramid {
    levels: Vec<Volume>,
}

impl VolumePyramid {
    /// Build a pyramid from per-level shrink factors and smoothing sigmas.
    ///
    /// # Arguments
    /// * `input` - The full-resolution volume
    /// * `shrink_factors` - Shrink factor per level, coarsest first
    /// * `smoothing_sigmas` - Gaussian sigma per level, physical units
    ///
    /// The two schedules must have the same length.
    pub fn build(input: &Volume, shrink_factors: &[usize], smoothing_sigmas: &[f64]) -> Result<Self> {
        if shrink_factors.len() != smoothing_sigmas.len() {
            return Err(CoreError::invalid_volume(format!(
                "pyramid schedules differ in length: {} shrink factors, {} sigmas",
                shrink_factors.len(),
                smoothing_sigmas.len()
            )));
        }
        let mut levels = Vec::with_capacity(shrink_factors.len());
        for (&factor, &sigma) in shrink_factors.iter().zip(smoothing_sigmas) {
            if factor == 1 && sigma <= 1e-6 {
                levels.push(input.clone());
                continue;
            }
            let smoothed = gaussian_smooth(input, sigma);
            levels.push(downsample(&smoothed, factor)?);
        }
        Ok(Self { levels })
    }

    /// Number of levels.
    pub fn levels(&self) -> usize {
        self.levels.len()
    }

    /// Volume at the given level (0 is coarsest).
    pub fn level(&self, level: usize) -> &Volume {
        &self.levels[level]
    }

    /// Consume the pyramid, returning its levels coarsest first.
    pub fn into_levels(self) -> Vec<Volume> {
        self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Direction3, Point3, Spacing3};

    #[test]
    fn test_pyramid_levels_and_geometry() {
        let v = Volume::from_fn(
            [16, 16, 16],
            Spacing3::unit(),
            Point3::origin(),
            Direction3::identity(),
            |i, j, k| (i + j + k) as f32,
        )
        .unwrap();
        let pyramid = VolumePyramid::build(&v, &[4, 2, 1], &[2.0, 1.0, 0.0]).unwrap();
        assert_eq!(pyramid.levels(), 3);
        assert_eq!(pyramid.level(0).size(), [4, 4, 4]);
        assert_eq!(pyramid.level(1).size(), [8, 8, 8]);
        assert_eq!(pyramid.level(2).size(), [16, 16, 16]);
        assert_eq!(pyramid.level(0).spacing().as_array(), [4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_identity_level_is_unfiltered() {
        let v = Volume::from_fn(
            [8, 8, 8],
            Spacing3::unit(),
            Point3::origin(),
            Direction3::identity(),
            |i, _, _| i as f32,
        )
        .unwrap();
        let pyramid = VolumePyramid::build(&v, &[1], &[0.0]).unwrap();
        assert_eq!(pyramid.level(0).data(), v.data());
    }

    #[test]
    fn test_mismatched_schedules_rejected() {
        let v = Volume::zeros(
            [8, 8, 8],
            Spacing3::unit(),
            Point3::origin(),
            Direction3::identity(),
        )
        .unwrap();
        assert!(VolumePyramid::build(&v, &[2, 1], &[1.0]).is_err());
    }
}
