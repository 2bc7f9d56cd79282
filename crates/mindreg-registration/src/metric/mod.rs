//! Image similarity metrics.

mod mind;
mod mind_ssd;
mod sampling;
mod trait_;

pub use mind::{MindBundle, MindDescriptor, NeighborhoodKind};
pub use mind_ssd::MindSsdMetric;
pub use sampling::{stratified_samples, uniform_random_samples, Sample};
pub use trait_::ImageMetric;
