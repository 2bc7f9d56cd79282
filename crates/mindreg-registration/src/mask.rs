//! Spatial masks restricting where samples may be drawn.

use mindreg_core::spatial::Point3;

/// A spatial predicate on physical points.
///
/// When a mask is present, only sample candidates whose physical point
/// satisfies the predicate are kept.
pub trait SpatialMask: Send + Sync {
    /// Whether a physical point lies inside the masked region.
    fn is_inside(&self, point: &Point3) -> bool;
}

impl<F> SpatialMask for F
where
    F: Fn(&Point3) -> bool + Send + Sync,
{
    fn is_inside(&self, point: &Point3) -> bool {
        self(point)
    }
}

/// Axis-aligned box in physical space.
#[derive(Debug, Clone, Copy)]
pub struct BoxMask {
    min: Point3,
    max: Point3,
}

impl BoxMask {
    /// Create a box mask from its physical corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }
}

impl SpatialMask for BoxMask {
    fn is_inside(&self, point: &Point3) -> bool {
        (0..3).all(|d| point[d] >= self.min[d] && point[d] <= self.max[d])
    }
}
