//! Spatial metadata types shared by volumes and transforms.
//!
//! Physical points and vectors are plain `nalgebra` types; this module adds
//! the two domain-specific wrappers: per-axis voxel spacing and the
//! orientation (direction cosine) matrix.

mod direction;
mod spacing;

pub use direction::Direction3;
pub use spacing::Spacing3;

/// A position in physical space (mm or other units).
pub type Point3 = nalgebra::Point3<f64>;

/// A displacement in physical space.
pub type Vector3 = nalgebra::Vector3<f64>;
