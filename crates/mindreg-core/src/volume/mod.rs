//! Dense 3D volume with physical-space metadata.

mod ops;
#[allow(clippy::module_inception)]
mod volume;

pub use volume::Volume;
