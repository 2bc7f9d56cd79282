//! Core primitives for 3D volume registration.
//!
//! This crate provides the dense volume type with physical-space metadata,
//! trilinear interpolation, the filters needed by descriptor computation and
//! pyramid construction, and the parameterized spatial transforms (rigid and
//! affine) together with their parameter Jacobians.

pub mod error;
pub mod filter;
pub mod interpolation;
pub mod spatial;
pub mod transform;
pub mod volume;

pub use error::{CoreError, Result};
pub use spatial::{Direction3, Spacing3};
pub use volume::Volume;
