//! Separable Gaussian smoothing.

use crate::volume::Volume;

/// Sigmas at or below this threshold skip filtering entirely.
const MIN_SIGMA: f64 = 1e-6;

/// Kernel taps never extend past this radius in voxels.
const MAX_KERNEL_RADIUS: usize = 32;

/// Smooth a volume with an isotropic Gaussian of standard deviation `sigma`
/// in physical units.
///
/// Applied as three separable 1D convolutions. The kernel radius is three
/// voxel-space sigmas; near the boundary the kernel is renormalized over the
/// in-bounds taps so constant regions stay constant.
pub fn gaussian_smooth(volume: &Volume, sigma: f64) -> Volume {
    if sigma <= MIN_SIGMA {
        return volume.clone();
    }
    let size = volume.size();
    let spacing = volume.spacing().as_array();
    let mut data = volume.data().to_vec();

    for axis in 0..3 {
        let pixel_sigma = sigma / spacing[axis];
        let radius = ((3.0 * pixel_sigma).ceil() as usize).clamp(1, MAX_KERNEL_RADIUS);
        let kernel = gaussian_kernel(pixel_sigma, radius);
        data = convolve_axis(&data, size, axis, &kernel, radius);
    }

    volume
        .with_same_geometry(data)
        .expect("same-geometry data length is valid")
}

/// Normalized discrete Gaussian with `2·radius + 1` taps.
fn gaussian_kernel(sigma: f64, radius: usize) -> Vec<f64> {
    let two_sigma2 = 2.0 * sigma * sigma;
    let mut kernel = Vec::with_capacity(2 * radius + 1);
    let mut sum = 0.0;
    for i in 0..=(2 * radius) {
        let x = i as f64 - radius as f64;
        let val = (-x * x / two_sigma2).exp();
        kernel.push(val);
        sum += val;
    }
    for val in &mut kernel {
        *val /= sum;
    }
    kernel
}

fn convolve_axis(
    data: &[f32],
    size: [usize; 3],
    axis: usize,
    kernel: &[f64],
    radius: usize,
) -> Vec<f32> {
    let mut out = vec![0.0f32; data.len()];
    let stride = [1, size[0], size[0] * size[1]];
    let n = size[axis] as isize;
    let r = radius as isize;

    let (a, b) = match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    for vb in 0..size[b] {
        for va in 0..size[a] {
            let base = va * stride[a] + vb * stride[b];
            for x in 0..n {
                let mut acc = 0.0f64;
                let mut weight = 0.0f64;
                for t in -r..=r {
                    let src = x + t;
                    if src < 0 || src >= n {
                        continue;
                    }
                    let w = kernel[(t + r) as usize];
                    acc += w * data[base + src as usize * stride[axis]] as f64;
                    weight += w;
                }
                out[base + x as usize * stride[axis]] = (acc / weight) as f32;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Direction3, Point3, Spacing3};
    use approx::assert_relative_eq;

    fn make_volume(size: [usize; 3], f: impl FnMut(usize, usize, usize) -> f32) -> Volume {
        Volume::from_fn(
            size,
            Spacing3::unit(),
            Point3::origin(),
            Direction3::identity(),
            f,
        )
        .unwrap()
    }

    #[test]
    fn test_constant_volume_unchanged() {
        let v = make_volume([8, 8, 8], |_, _, _| 2.5);
        let s = gaussian_smooth(&v, 1.5);
        for &x in s.data() {
            assert_relative_eq!(x, 2.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let v = make_volume([4, 4, 4], |i, j, k| (i * j * k) as f32);
        let s = gaussian_smooth(&v, 0.0);
        assert_eq!(s.data(), v.data());
    }

    #[test]
    fn test_smoothing_reduces_peak() {
        let v = make_volume([9, 9, 9], |i, j, k| {
            if (i, j, k) == (4, 4, 4) {
                1.0
            } else {
                0.0
            }
        });
        let s = gaussian_smooth(&v, 1.0);
        assert!(s.get(4, 4, 4) < 1.0);
        assert!(s.get(4, 4, 4) > s.get(3, 4, 4));
        assert!(s.get(3, 4, 4) > 0.0);
    }

    #[test]
    fn test_geometry_preserved() {
        let v = Volume::zeros(
            [5, 5, 5],
            Spacing3::new([0.5, 1.0, 2.0]).unwrap(),
            Point3::new(1.0, 2.0, 3.0),
            Direction3::identity(),
        )
        .unwrap();
        assert!(v.geometry_matches(&gaussian_smooth(&v, 1.0)));
    }
}
