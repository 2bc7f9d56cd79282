//! Box mean filtering.

use crate::volume::Volume;

/// Mean over the `(2r+1)³` neighborhood of each voxel, clipped at the
/// volume boundary.
///
/// Implemented as three separable 1D passes. Because the clipped
/// neighborhood is always an axis-aligned box, per-axis clipped means
/// compose to exactly the full clipped-neighborhood mean.
pub fn mean_box(volume: &Volume, radius: usize) -> Volume {
    if radius == 0 {
        return volume.clone();
    }
    let size = volume.size();
    let mut data = volume.data().to_vec();
    for axis in 0..3 {
        data = mean_axis(&data, size, axis, radius);
    }
    volume
        .with_same_geometry(data)
        .expect("same-geometry data length is valid")
}

/// One separable pass: clipped windowed mean along `axis`.
fn mean_axis(data: &[f32], size: [usize; 3], axis: usize, radius: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; data.len()];
    let stride = [1, size[0], size[0] * size[1]];
    let n = size[axis];
    let r = radius as isize;

    // The two axes orthogonal to the pass axis.
    let (a, b) = match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    for vb in 0..size[b] {
        for va in 0..size[a] {
            let base = va * stride[a] + vb * stride[b];
            for x in 0..n {
                let lo = (x as isize - r).max(0) as usize;
                let hi = (x as isize + r).min(n as isize - 1) as usize;
                let mut sum = 0.0f64;
                for w in lo..=hi {
                    sum += data[base + w * stride[axis]] as f64;
                }
                out[base + x * stride[axis]] = (sum / (hi - lo + 1) as f64) as f32;
            }
        }
    }
    out
}
