//! Pointwise arithmetic on volumes.
//!
//! All binary operations require matching geometry and produce a new volume;
//! the inputs are never modified.

use crate::error::Result;
use crate::volume::Volume;

impl Volume {
    /// Pointwise difference `self − other`.
    pub fn sub(&self, other: &Volume) -> Result<Volume> {
        self.require_same_geometry(other, "sub")?;
        let data = self
            .data()
            .iter()
            .zip(other.data())
            .map(|(a, b)| a - b)
            .collect();
        self.with_same_geometry(data)
    }

    /// Pointwise sum `self + other`.
    pub fn add(&self, other: &Volume) -> Result<Volume> {
        self.require_same_geometry(other, "add")?;
        let data = self
            .data()
            .iter()
            .zip(other.data())
            .map(|(a, b)| a + b)
            .collect();
        self.with_same_geometry(data)
    }

    /// Pointwise square.
    pub fn square(&self) -> Volume {
        let data = self.data().iter().map(|a| a * a).collect();
        self.with_same_geometry(data)
            .expect("same-geometry data length is valid")
    }

    /// Pointwise multiplication by a scalar.
    pub fn mul_scalar(&self, factor: f32) -> Volume {
        let data = self.data().iter().map(|a| a * factor).collect();
        self.with_same_geometry(data)
            .expect("same-geometry data length is valid")
    }
}
