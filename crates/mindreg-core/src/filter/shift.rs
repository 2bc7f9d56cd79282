//! Translation resampling of a volume onto its own grid.

use crate::interpolation::{Interpolator, LinearInterpolator};
use crate::volume::Volume;

/// Resample a volume shifted by a voxel-space offset.
///
/// The output voxel `(i, j, k)` holds `v(i − dx, j − dy, k − dz)`, evaluated
/// by trilinear interpolation. In physical terms this is a translation of
/// `−(dx·sx, dy·sy, dz·sz)` carried through the direction cosines. Positions
/// falling outside the source yield 0. The output geometry equals the input
/// geometry.
pub fn shift(volume: &Volume, offset: [f64; 3]) -> Volume {
    let size = volume.size();
    let interp = LinearInterpolator::new();
    let mut data = Vec::with_capacity(volume.voxel_count());
    for k in 0..size[2] {
        for j in 0..size[1] {
            for i in 0..size[0] {
                let src = [
                    i as f64 - offset[0],
                    j as f64 - offset[1],
                    k as f64 - offset[2],
                ];
                data.push(interp.sample(volume, src).unwrap_or(0.0));
            }
        }
    }
    volume
        .with_same_geometry(data)
        .expect("same-geometry data length is valid")
}
