//! Central-difference gradient.

use crate::volume::Volume;

/// Central-difference gradient along each index axis, divided by the
/// physical spacing. The one-voxel boundary shell is zero.
///
/// # Returns
/// One volume per axis, each sharing the input geometry.
pub fn central_gradient(volume: &Volume) -> [Volume; 3] {
    let size = volume.size();
    let spacing = volume.spacing().as_array();
    let mut gx = vec![0.0f32; volume.voxel_count()];
    let mut gy = vec![0.0f32; volume.voxel_count()];
    let mut gz = vec![0.0f32; volume.voxel_count()];

    for k in 0..size[2] {
        for j in 0..size[1] {
            for i in 0..size[0] {
                let idx = volume.linear_index(i, j, k);
                if i > 0 && i + 1 < size[0] {
                    gx[idx] = (volume.get(i + 1, j, k) - volume.get(i - 1, j, k))
                        / (2.0 * spacing[0] as f32);
                }
                if j > 0 && j + 1 < size[1] {
                    gy[idx] = (volume.get(i, j + 1, k) - volume.get(i, j - 1, k))
                        / (2.0 * spacing[1] as f32);
                }
                if k > 0 && k + 1 < size[2] {
                    gz[idx] = (volume.get(i, j, k + 1) - volume.get(i, j, k - 1))
                        / (2.0 * spacing[2] as f32);
                }
            }
        }
    }

    let make = |data: Vec<f32>| {
        volume
            .with_same_geometry(data)
            .expect("same-geometry data length is valid")
    };
    [make(gx), make(gy), make(gz)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Direction3, Point3, Spacing3};
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_ramp_gradient() {
        let v = Volume::from_fn(
            [5, 5, 5],
            Spacing3::new([2.0, 1.0, 0.5]).unwrap(),
            Point3::origin(),
            Direction3::identity(),
            |i, j, k| (3 * i + 2 * j + k) as f32,
        )
        .unwrap();
        let [gx, gy, gz] = central_gradient(&v);
        // Interior voxels see the exact slope divided by spacing.
        assert_relative_eq!(gx.get(2, 2, 2), 3.0 / 2.0, epsilon = 1e-6);
        assert_relative_eq!(gy.get(2, 2, 2), 2.0 / 1.0, epsilon = 1e-6);
        assert_relative_eq!(gz.get(2, 2, 2), 1.0 / 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_boundary_is_zero() {
        let v = Volume::from_fn(
            [4, 4, 4],
            Spacing3::unit(),
            Point3::origin(),
            Direction3::identity(),
            |i, j, k| (i + j + k) as f32,
        )
        .unwrap();
        let [gx, gy, gz] = central_gradient(&v);
        assert_eq!(gx.get(0, 2, 2), 0.0);
        assert_eq!(gx.get(3, 2, 2), 0.0);
        assert_eq!(gy.get(2, 0, 2), 0.0);
        assert_eq!(gz.get(2, 2, 3), 0.0);
    }

    #[test]
    fn test_geometry_preserved() {
        let v = Volume::zeros(
            [3, 3, 3],
            Spacing3::new([0.5, 1.0, 2.0]).unwrap(),
            Point3::new(1.0, 2.0, 3.0),
            Direction3::identity(),
        )
        .unwrap();
        for g in central_gradient(&v) {
            assert!(v.geometry_matches(&g));
        }
    }
}
