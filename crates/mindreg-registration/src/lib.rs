//! Multi-modal 3D registration with the MIND descriptor.
//!
//! This crate implements the registration engine: the MIND
//! (Modality Independent Neighbourhood Descriptor) similarity metric, a
//! Gauss–Newton / Levenberg–Marquardt least-squares optimizer, and the
//! multi-resolution driver that schedules both over an image pyramid.
//!
//! Volume I/O and the host application are external; the engine consumes
//! in-memory [`mindreg_core::Volume`]s and produces a final parameter vector
//! together with the optimization trace.

pub mod config;
pub mod driver;
pub mod error;
pub mod mask;
pub mod metric;
pub mod optimizer;
pub mod progress;

pub use config::{MetricType, OptimizerType, RegistrationConfig, TransformType};
pub use driver::{LevelTrace, RegistrationDriver, RegistrationResult};
pub use error::{RegistrationError, Result};
pub use mask::SpatialMask;
pub use optimizer::StopCondition;
