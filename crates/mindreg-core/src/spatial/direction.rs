//! Orientation of the voxel grid axes in physical space.

use nalgebra::Matrix3;

use crate::error::{CoreError, Result};

/// Tolerance on `|det - 1|` and on orthonormality residuals when validating
/// a direction matrix.
const PROPER_ROTATION_TOLERANCE: f64 = 1e-6;

/// Direction cosine matrix mapping index axes to physical axes.
///
/// Column `d` holds the physical unit vector along which index axis `d`
/// advances. The matrix must be a proper rotation: orthonormal with
/// determinant +1 within tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction3(Matrix3<f64>);

impl Direction3 {
    /// Create a direction from a matrix, validating that it is a proper
    /// rotation.
    pub fn new(matrix: Matrix3<f64>) -> Result<Self> {
        let det = matrix.determinant();
        if (det - 1.0).abs() > PROPER_ROTATION_TOLERANCE {
            return Err(CoreError::NonProperDirection { det });
        }
        let residual = (matrix.transpose() * matrix - Matrix3::identity()).norm();
        if residual > PROPER_ROTATION_TOLERANCE {
            return Err(CoreError::NonProperDirection { det });
        }
        Ok(Self(matrix))
    }

    /// The identity orientation (index axes aligned with physical axes).
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    /// The underlying rotation matrix.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    /// The inverse orientation. Proper rotations invert by transposition.
    pub fn inverse_matrix(&self) -> Matrix3<f64> {
        self.0.transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Rotation3;

    #[test]
    fn test_identity_is_proper() {
        let d = Direction3::identity();
        assert_eq!(d.matrix(), &Matrix3::identity());
    }

    #[test]
    fn test_rotation_is_proper() {
        let r = Rotation3::from_euler_angles(0.1, -0.2, 0.3);
        assert!(Direction3::new(*r.matrix()).is_ok());
    }

    #[test]
    fn test_reflection_rejected() {
        let mut m = Matrix3::identity();
        m[(0, 0)] = -1.0;
        assert!(matches!(
            Direction3::new(m),
            Err(CoreError::NonProperDirection { .. })
        ));
    }

    #[test]
    fn test_scaled_matrix_rejected() {
        let m = Matrix3::identity() * 2.0;
        assert!(Direction3::new(m).is_err());
    }
}
