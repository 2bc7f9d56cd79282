//! Metric trait.

use crate::error::Result;
use crate::optimizer::ObjectiveFunction;

/// A similarity metric between a fixed and a moving volume.
///
/// Metrics expose the objective-function capability set consumed by the
/// optimizer (value, analytic gradient, and optionally residuals with their
/// Jacobian for least-squares optimization) plus the lifecycle operations
/// the driver needs between pyramid levels.
pub trait ImageMetric: ObjectiveFunction {
    /// Recompute derived data (descriptors, gradients, samples) for the
    /// currently bound volumes and transform.
    ///
    /// # Errors
    /// Fails unless the fixed volume, moving volume, and transform are all
    /// bound.
    fn initialize(&mut self) -> Result<()>;

    /// Drop all cached derived data so the next `initialize()` recomputes.
    fn reset_cache(&mut self);

    /// Number of samples captured by the last `initialize()`.
    fn sample_count(&self) -> usize;

    /// Number of samples that contributed to the most recent evaluation.
    fn valid_sample_count(&self) -> usize;

    /// Human-readable metric name.
    fn name(&self) -> &'static str;
}
