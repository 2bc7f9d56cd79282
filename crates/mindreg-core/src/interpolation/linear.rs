//! Trilinear interpolation.

use super::trait_::Interpolator;
use crate::volume::Volume;

/// Trilinear interpolator.
///
/// Valid over the continuous index region `[0, size−1]` on every axis; a
/// position outside that region by any fractional amount is reported as
/// outside.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new trilinear interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl Interpolator for LinearInterpolator {
    fn is_inside(&self, volume: &Volume, index: [f64; 3]) -> bool {
        let size = volume.size();
        (0..3).all(|d| index[d] >= 0.0 && index[d] <= (size[d] - 1) as f64)
    }

    fn sample(&self, volume: &Volume, index: [f64; 3]) -> Option<f32> {
        if !self.is_inside(volume, index) {
            return None;
        }
        let size = volume.size();

        let mut lo = [0usize; 3];
        let mut hi = [0usize; 3];
        let mut frac = [0.0f64; 3];
        for d in 0..3 {
            if size[d] == 1 {
                continue;
            }
            // At the upper face floor(index) == size-1; collapse to the cell
            // below so the fraction becomes exactly 1.
            let i0 = (index[d].floor() as usize).min(size[d] - 2);
            lo[d] = i0;
            hi[d] = i0 + 1;
            frac[d] = index[d] - i0 as f64;
        }

        let v000 = volume.get(lo[0], lo[1], lo[2]) as f64;
        let v100 = volume.get(hi[0], lo[1], lo[2]) as f64;
        let v010 = volume.get(lo[0], hi[1], lo[2]) as f64;
        let v110 = volume.get(hi[0], hi[1], lo[2]) as f64;
        let v001 = volume.get(lo[0], lo[1], hi[2]) as f64;
        let v101 = volume.get(hi[0], lo[1], hi[2]) as f64;
        let v011 = volume.get(lo[0], hi[1], hi[2]) as f64;
        let v111 = volume.get(hi[0], hi[1], hi[2]) as f64;

        let (fx, fy, fz) = (frac[0], frac[1], frac[2]);
        let c00 = v000 * (1.0 - fx) + v100 * fx;
        let c10 = v010 * (1.0 - fx) + v110 * fx;
        let c01 = v001 * (1.0 - fx) + v101 * fx;
        let c11 = v011 * (1.0 - fx) + v111 * fx;
        let c0 = c00 * (1.0 - fy) + c10 * fy;
        let c1 = c01 * (1.0 - fy) + c11 * fy;
        Some((c0 * (1.0 - fz) + c1 * fz) as f32)
    }
}
