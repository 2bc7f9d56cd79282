//! Error types for volume and transform operations.

use thiserror::Error;

/// Errors raised by volume primitives and transforms.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Two volumes that must share geometry do not.
    #[error("geometry mismatch: {0}")]
    GeometryMismatch(String),

    /// A volume was constructed with inconsistent size, spacing, or data.
    #[error("invalid volume: {0}")]
    InvalidVolume(String),

    /// The direction matrix is not a proper rotation.
    #[error("direction matrix is not a proper rotation (determinant {det:.6})")]
    NonProperDirection { det: f64 },

    /// A parameter vector of the wrong length was passed to a transform.
    #[error("parameter vector has length {actual}, transform expects {expected}")]
    ParameterCount { expected: usize, actual: usize },
}

impl CoreError {
    /// Create a geometry mismatch error.
    pub fn geometry_mismatch(msg: impl Into<String>) -> Self {
        Self::GeometryMismatch(msg.into())
    }

    /// Create an invalid volume error.
    pub fn invalid_volume(msg: impl Into<String>) -> Self {
        Self::InvalidVolume(msg.into())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
