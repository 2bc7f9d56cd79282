use approx::assert_relative_eq;
use mindreg_core::spatial::{Point3, Vector3};
use mindreg_core::transform::{AffineTransform, RigidTransform, SpatialTransform};
use nalgebra::DVector;
use proptest::prelude::*;

#[test]
fn test_affine_seeded_from_rigid_agrees() {
    let mut rigid = RigidTransform::identity();
    rigid
        .set_parameters(&DVector::from_vec(vec![0.3, -0.2, 0.1, 5.0, -3.0, 2.0]))
        .unwrap();

    let affine = AffineTransform::new(*rigid.rotation_matrix(), *rigid.translation());

    for point in [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(10.0, -5.0, 3.0),
        Point3::new(-2.5, 4.0, 7.5),
    ] {
        let a = rigid.transform_point(&point);
        let b = affine.transform_point(&point);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-12);
    }
}

#[test]
fn test_jacobian_shapes() {
    let rigid = RigidTransform::identity();
    let affine = AffineTransform::identity();
    let p = Point3::new(1.0, 2.0, 3.0);
    assert_eq!(rigid.parameter_jacobian(&p).shape(), (6, 3));
    assert_eq!(affine.parameter_jacobian(&p).shape(), (12, 3));
}

proptest! {
    #[test]
    fn prop_rigid_rotation_is_orthonormal(
        rx in -1.0f64..1.0,
        ry in -1.0f64..1.0,
        rz in -1.0f64..1.0,
    ) {
        let t = RigidTransform::new(Vector3::new(rx, ry, rz), Vector3::zeros());
        let r = t.rotation_matrix();
        let residual = (r.transpose() * r - nalgebra::Matrix3::identity()).norm();
        prop_assert!(residual < 1e-10);
        prop_assert!((r.determinant() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn prop_rigid_preserves_distances(
        rx in -1.0f64..1.0,
        ry in -1.0f64..1.0,
        rz in -1.0f64..1.0,
        tx in -10.0f64..10.0,
        px in -5.0f64..5.0,
        py in -5.0f64..5.0,
        pz in -5.0f64..5.0,
    ) {
        let t = RigidTransform::new(
            Vector3::new(rx, ry, rz),
            Vector3::new(tx, 0.5, -1.0),
        );
        let a = Point3::new(px, py, pz);
        let b = Point3::new(py, pz, px);
        let before = (a - b).norm();
        let after = (t.transform_point(&a) - t.transform_point(&b)).norm();
        prop_assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn prop_set_parameters_reflected_in_apply(
        tx in -10.0f64..10.0,
        ty in -10.0f64..10.0,
        tz in -10.0f64..10.0,
    ) {
        let mut t = RigidTransform::identity();
        t.set_parameters(&DVector::from_vec(vec![0.0, 0.0, 0.0, tx, ty, tz])).unwrap();
        let p = t.transform_point(&Point3::origin());
        prop_assert!((p.x - tx).abs() < 1e-12);
        prop_assert!((p.y - ty).abs() < 1e-12);
        prop_assert!((p.z - tz).abs() < 1e-12);
    }
}
