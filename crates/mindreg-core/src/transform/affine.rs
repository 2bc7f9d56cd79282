//! Affine transform.

use nalgebra::{DMatrix, DVector, Matrix3};

use super::trait_::SpatialTransform;
use crate::error::{CoreError, Result};
use crate::spatial::{Point3, Vector3};

/// Affine 3D transform: `T(x) = M·x + t`.
///
/// The parameter vector holds the matrix entries row-major followed by the
/// translation: `(m11, m12, m13, m21, …, m33, t1, t2, t3)`.
#[derive(Debug, Clone)]
pub struct AffineTransform {
    matrix: Matrix3<f64>,
    translation: Vector3,
}

impl AffineTransform {
    /// Create an affine transform from a linear part and a translation.
    pub fn new(matrix: Matrix3<f64>, translation: Vector3) -> Self {
        Self {
            matrix,
            translation,
        }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    /// The linear part.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// The translation part.
    pub fn translation(&self) -> &Vector3 {
        &self.translation
    }
}

impl SpatialTransform for AffineTransform {
    fn parameter_count(&self) -> usize {
        12
    }

    fn parameters(&self) -> DVector<f64> {
        let mut q = DVector::zeros(12);
        for i in 0..3 {
            for j in 0..3 {
                q[3 * i + j] = self.matrix[(i, j)];
            }
        }
        for i in 0..3 {
            q[9 + i] = self.translation[i];
        }
        q
    }

    fn set_parameters(&mut self, parameters: &DVector<f64>) -> Result<()> {
        if parameters.len() != 12 {
            return Err(CoreError::ParameterCount {
                expected: 12,
                actual: parameters.len(),
            });
        }
        for i in 0..3 {
            for j in 0..3 {
                self.matrix[(i, j)] = parameters[3 * i + j];
            }
        }
        for i in 0..3 {
            self.translation[i] = parameters[9 + i];
        }
        Ok(())
    }

    fn transform_point(&self, point: &Point3) -> Point3 {
        Point3::from(self.matrix * point.coords + self.translation)
    }

    fn parameter_jacobian(&self, point: &Point3) -> DMatrix<f64> {
        let mut jacobian = DMatrix::zeros(12, 3);
        // Matrix entry (i, j) moves output component i by point[j].
        for i in 0..3 {
            for j in 0..3 {
                jacobian[(3 * i + j, i)] = point[j];
            }
        }
        for axis in 0..3 {
            jacobian[(9 + axis, axis)] = 1.0;
        }
        jacobian
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_parameters() {
        let t = AffineTransform::identity();
        let q = t.parameters();
        assert_eq!(q[0], 1.0);
        assert_eq!(q[4], 1.0);
        assert_eq!(q[8], 1.0);
        assert_eq!(q.iter().filter(|&&x| x != 0.0).count(), 3);
    }

    #[test]
    fn test_apply() {
        let m = Matrix3::new(2.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        let t = AffineTransform::new(m, Vector3::new(1.0, 0.0, -1.0));
        let p = t.transform_point(&Point3::new(3.0, 4.0, 5.0));
        assert_eq!(p, Point3::new(7.0, 4.0, 4.0));
    }

    #[test]
    fn test_parameter_roundtrip() {
        let mut t = AffineTransform::identity();
        let q = DVector::from_vec(vec![
            1.1, 0.1, -0.2, 0.05, 0.9, 0.0, 0.0, -0.1, 1.05, 3.0, -4.0, 5.0,
        ]);
        t.set_parameters(&q).unwrap();
        assert_eq!(t.parameters(), q);
        assert_relative_eq!(t.matrix()[(0, 2)], -0.2);
        assert_relative_eq!(t.translation()[1], -4.0);
    }

    #[test]
    fn test_jacobian_matches_finite_differences() {
        let mut t = AffineTransform::identity();
        let q0 = DVector::from_vec(vec![
            1.0, 0.1, 0.0, -0.05, 1.0, 0.2, 0.0, 0.0, 0.95, 1.0, 2.0, 3.0,
        ]);
        t.set_parameters(&q0).unwrap();
        let point = Point3::new(2.0, -3.0, 1.5);
        let jacobian = t.parameter_jacobian(&point);

        let h = 1e-6;
        for p in 0..12 {
            let mut q_plus = q0.clone();
            q_plus[p] += h;
            let mut q_minus = q0.clone();
            q_minus[p] -= h;

            let mut t_plus = AffineTransform::identity();
            t_plus.set_parameters(&q_plus).unwrap();
            let mut t_minus = AffineTransform::identity();
            t_minus.set_parameters(&q_minus).unwrap();

            let fp = t_plus.transform_point(&point);
            let fm = t_minus.transform_point(&point);
            for c in 0..3 {
                let numeric = (fp[c] - fm[c]) / (2.0 * h);
                assert_relative_eq!(jacobian[(p, c)], numeric, epsilon = 1e-6);
            }
        }
    }
}
