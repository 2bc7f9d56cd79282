//! Error types for registration workflows.

use thiserror::Error;

/// Main error type for the registration engine.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// The configuration record is invalid; the engine does not start.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Volume geometry mismatch or non-proper direction.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// A metric operation was called before `initialize()` completed with
    /// both volumes and a transform bound.
    #[error("metric not initialized: {0}")]
    Uninitialized(String),

    /// A numerical failure stopped the optimization. The best parameters
    /// accumulated before the failure are preserved.
    #[error("numerical failure at pyramid level {level}: {message}")]
    NumericalFailure {
        level: usize,
        message: String,
        best_parameters: Vec<f64>,
    },

    /// Error from a core volume or transform operation.
    #[error(transparent)]
    Core(#[from] mindreg_core::CoreError),
}

impl RegistrationError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a geometry error.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Create an uninitialized-metric error.
    pub fn uninitialized(msg: impl Into<String>) -> Self {
        Self::Uninitialized(msg.into())
    }
}

/// Result type for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;
