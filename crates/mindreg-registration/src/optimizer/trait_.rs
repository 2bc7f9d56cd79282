//! Objective-function capability set.

use nalgebra::{DMatrix, DVector};

use crate::error::{RegistrationError, Result};

/// The cost surface the optimizer walks.
///
/// Required capabilities are the parameter accessors and the cost value.
/// Least-squares residuals with their Jacobian, and the analytic gradient,
/// are optional capabilities the optimizer discovers up front via the
/// `supports_*` probes. The optimizer holds these as call handles only; the
/// objective never observes the optimizer.
pub trait ObjectiveFunction {
    /// Number of parameters.
    fn parameter_count(&self) -> usize;

    /// The current parameter vector, by value.
    fn parameters(&self) -> Result<DVector<f64>>;

    /// Replace the parameter vector.
    fn set_parameters(&mut self, parameters: &DVector<f64>) -> Result<()>;

    /// Cost at the current parameters.
    fn value(&mut self) -> Result<f64>;

    /// Whether `residuals_and_jacobian` is available.
    fn supports_least_squares(&self) -> bool {
        false
    }

    /// Whether `gradient` is available.
    fn supports_gradient(&self) -> bool {
        false
    }

    /// Residual vector and its Jacobian with respect to the parameters.
    fn residuals_and_jacobian(&mut self) -> Result<(DVector<f64>, DMatrix<f64>)> {
        Err(RegistrationError::configuration(
            "objective does not provide residuals",
        ))
    }

    /// Analytic gradient of the cost.
    fn gradient(&mut self) -> Result<DVector<f64>> {
        Err(RegistrationError::configuration(
            "objective does not provide a gradient",
        ))
    }
}
