//! Interpolator trait.

use crate::spatial::Point3;
use crate::volume::Volume;

/// Interpolator for sampling a volume at continuous positions.
///
/// An interpolator defines both the sampled value and the region over which
/// sampling is valid. Positions outside that region yield `None`.
pub trait Interpolator {
    /// Whether a continuous index lies inside the interpolation region.
    fn is_inside(&self, volume: &Volume, index: [f64; 3]) -> bool;

    /// Sample the volume at a continuous index.
    ///
    /// # Returns
    /// The interpolated value, or `None` when the index is outside the
    /// interpolation region by any fractional amount.
    fn sample(&self, volume: &Volume, index: [f64; 3]) -> Option<f32>;

    /// Sample the volume at a physical point.
    fn sample_physical(&self, volume: &Volume, point: &Point3) -> Option<f32> {
        self.sample(volume, volume.physical_to_continuous_index(point))
    }
}
