//! Transform trait.

use nalgebra::{DMatrix, DVector};

use crate::error::Result;
use crate::spatial::Point3;

/// A parameterized mapping from physical points to physical points.
///
/// Transforms expose their parameters as a flat vector so optimizers can
/// treat them uniformly, and provide the parameter Jacobian needed by
/// least-squares metrics.
///
/// After `set_parameters`, subsequent `transform_point` and
/// `parameter_jacobian` calls reflect the new parameters.
pub trait SpatialTransform: Send + Sync {
    /// Number of parameters (6 for rigid, 12 for affine).
    fn parameter_count(&self) -> usize;

    /// The current parameter vector.
    fn parameters(&self) -> DVector<f64>;

    /// Replace the parameter vector.
    ///
    /// # Errors
    /// `ParameterCount` when the vector length does not match
    /// `parameter_count`.
    fn set_parameters(&mut self, parameters: &DVector<f64>) -> Result<()>;

    /// Map a physical point through the transform.
    fn transform_point(&self, point: &Point3) -> Point3;

    /// Jacobian of the transformed point with respect to the parameters.
    ///
    /// # Returns
    /// A `parameter_count × 3` matrix whose row `i` is `∂T(point)/∂qᵢ`.
    fn parameter_jacobian(&self, point: &Point3) -> DMatrix<f64>;
}
