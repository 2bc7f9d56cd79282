//! Rigid transform (rotation + translation).

use nalgebra::{DMatrix, DVector, Matrix3};

use super::trait_::SpatialTransform;
use crate::error::{CoreError, Result};
use crate::spatial::{Point3, Vector3};

/// Rigid 3D transform: `T(x) = R·x + t`.
///
/// The rotation is parameterized by three Euler angles in the ZYX
/// convention, `R = R_z(rz) · R_y(ry) · R_x(rx)`, with angles in radians.
/// The parameter vector is ordered `(rx, ry, rz, tx, ty, tz)`.
///
/// The rotation matrix and its per-angle derivatives are rebuilt eagerly on
/// `set_parameters`, so point mapping and Jacobian evaluation are cheap in
/// the sample loop.
#[derive(Debug, Clone)]
pub struct RigidTransform {
    angles: Vector3,
    translation: Vector3,
    rotation: Matrix3<f64>,
    rotation_derivatives: [Matrix3<f64>; 3],
}

fn rot_x(a: f64) -> Matrix3<f64> {
    let (s, c) = a.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
}

fn rot_y(b: f64) -> Matrix3<f64> {
    let (s, c) = b.sin_cos();
    Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
}

fn rot_z(g: f64) -> Matrix3<f64> {
    let (s, c) = g.sin_cos();
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

fn d_rot_x(a: f64) -> Matrix3<f64> {
    let (s, c) = a.sin_cos();
    Matrix3::new(0.0, 0.0, 0.0, 0.0, -s, -c, 0.0, c, -s)
}

fn d_rot_y(b: f64) -> Matrix3<f64> {
    let (s, c) = b.sin_cos();
    Matrix3::new(-s, 0.0, c, 0.0, 0.0, 0.0, -c, 0.0, -s)
}

fn d_rot_z(g: f64) -> Matrix3<f64> {
    let (s, c) = g.sin_cos();
    Matrix3::new(-s, -c, 0.0, c, -s, 0.0, 0.0, 0.0, 0.0)
}

impl RigidTransform {
    /// Create a rigid transform from Euler angles and a translation.
    pub fn new(angles: Vector3, translation: Vector3) -> Self {
        let mut transform = Self {
            angles,
            translation,
            rotation: Matrix3::identity(),
            rotation_derivatives: [Matrix3::zeros(); 3],
        };
        transform.rebuild();
        transform
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }

    /// The current rotation matrix.
    pub fn rotation_matrix(&self) -> &Matrix3<f64> {
        &self.rotation
    }

    /// The current translation vector.
    pub fn translation(&self) -> &Vector3 {
        &self.translation
    }

    /// The current Euler angles `(rx, ry, rz)`.
    pub fn angles(&self) -> &Vector3 {
        &self.angles
    }

    fn rebuild(&mut self) {
        let rx = rot_x(self.angles[0]);
        let ry = rot_y(self.angles[1]);
        let rz = rot_z(self.angles[2]);
        self.rotation = rz * ry * rx;
        self.rotation_derivatives = [
            rz * ry * d_rot_x(self.angles[0]),
            rz * d_rot_y(self.angles[1]) * rx,
            d_rot_z(self.angles[2]) * ry * rx,
        ];
    }
}

impl SpatialTransform for RigidTransform {
    fn parameter_count(&self) -> usize {
        6
    }

    fn parameters(&self) -> DVector<f64> {
        DVector::from_vec(vec![
            self.angles[0],
            self.angles[1],
            self.angles[2],
            self.translation[0],
            self.translation[1],
            self.translation[2],
        ])
    }

    fn set_parameters(&mut self, parameters: &DVector<f64>) -> Result<()> {
        if parameters.len() != 6 {
            return Err(CoreError::ParameterCount {
                expected: 6,
                actual: parameters.len(),
            });
        }
        self.angles = Vector3::new(parameters[0], parameters[1], parameters[2]);
        self.translation = Vector3::new(parameters[3], parameters[4], parameters[5]);
        self.rebuild();
        Ok(())
    }

    fn transform_point(&self, point: &Point3) -> Point3 {
        Point3::from(self.rotation * point.coords + self.translation)
    }

    fn parameter_jacobian(&self, point: &Point3) -> DMatrix<f64> {
        let mut jacobian = DMatrix::zeros(6, 3);
        for (row, derivative) in self.rotation_derivatives.iter().enumerate() {
            let dp = derivative * point.coords;
            jacobian[(row, 0)] = dp[0];
            jacobian[(row, 1)] = dp[1];
            jacobian[(row, 2)] = dp[2];
        }
        for axis in 0..3 {
            jacobian[(3 + axis, axis)] = 1.0;
        }
        jacobian
    }
}
