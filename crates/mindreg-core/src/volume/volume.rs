//! Volume type combining voxel data with physical geometry.

use nalgebra::Matrix3;

use crate::error::{CoreError, Result};
use crate::spatial::{Direction3, Point3, Spacing3, Vector3};

/// A dense 3D field of 32-bit floats with physical geometry.
///
/// Voxels are addressed by integer index `(i, j, k)` with `i` fastest in
/// memory. The geometry maps indices to physical points via
/// `origin + direction · diag(spacing) · index`.
///
/// Volumes are logically immutable: they are created by a loader or produced
/// by a filter and never mutated in place afterwards.
///
/// # Coordinate systems
/// * **Index space**: discrete voxel indices, or continuous indices for
///   interpolation.
/// * **Physical space**: continuous coordinates in mm or other units.
#[derive(Debug, Clone)]
pub struct Volume {
    size: [usize; 3],
    spacing: Spacing3,
    origin: Point3,
    direction: Direction3,
    // Cached index<->physical maps; direction * diag(spacing) and its inverse.
    index_to_physical: Matrix3<f64>,
    physical_to_index: Matrix3<f64>,
    data: Vec<f32>,
}

impl Volume {
    /// Create a volume from raw voxel data and geometry.
    ///
    /// # Arguments
    /// * `size` - Voxel counts along each axis, all positive
    /// * `spacing` - Physical distance between voxels along each axis
    /// * `origin` - Physical coordinate of voxel (0, 0, 0)
    /// * `direction` - Orientation of the index axes
    /// * `data` - Voxel values, `i` fastest, length `size[0]*size[1]*size[2]`
    pub fn new(
        size: [usize; 3],
        spacing: Spacing3,
        origin: Point3,
        direction: Direction3,
        data: Vec<f32>,
    ) -> Result<Self> {
        if size.iter().any(|&s| s == 0) {
            return Err(CoreError::invalid_volume(format!(
                "size components must be positive, got {size:?}"
            )));
        }
        let expected = size[0] * size[1] * size[2];
        if data.len() != expected {
            return Err(CoreError::invalid_volume(format!(
                "data length {} does not match size {:?} ({} voxels)",
                data.len(),
                size,
                expected
            )));
        }
        let scale = Matrix3::from_diagonal(&Vector3::new(spacing[0], spacing[1], spacing[2]));
        let index_to_physical = direction.matrix() * scale;
        let inv_scale = Matrix3::from_diagonal(&Vector3::new(
            1.0 / spacing[0],
            1.0 / spacing[1],
            1.0 / spacing[2],
        ));
        let physical_to_index = inv_scale * direction.inverse_matrix();
        Ok(Self {
            size,
            spacing,
            origin,
            direction,
            index_to_physical,
            physical_to_index,
            data,
        })
    }

    /// Create a zero-filled volume with the given geometry.
    pub fn zeros(
        size: [usize; 3],
        spacing: Spacing3,
        origin: Point3,
        direction: Direction3,
    ) -> Result<Self> {
        let len = size[0] * size[1] * size[2];
        Self::new(size, spacing, origin, direction, vec![0.0; len])
    }

    /// Create a volume by evaluating a function of the voxel index.
    pub fn from_fn(
        size: [usize; 3],
        spacing: Spacing3,
        origin: Point3,
        direction: Direction3,
        mut f: impl FnMut(usize, usize, usize) -> f32,
    ) -> Result<Self> {
        let mut data = Vec::with_capacity(size[0] * size[1] * size[2]);
        for k in 0..size[2] {
            for j in 0..size[1] {
                for i in 0..size[0] {
                    data.push(f(i, j, k));
                }
            }
        }
        Self::new(size, spacing, origin, direction, data)
    }

    /// Create a new volume with this volume's geometry and the given data.
    pub fn with_same_geometry(&self, data: Vec<f32>) -> Result<Self> {
        Self::new(self.size, self.spacing, self.origin, self.direction, data)
    }

    /// Voxel counts along each axis.
    pub fn size(&self) -> [usize; 3] {
        self.size
    }

    /// Physical spacing along each axis.
    pub fn spacing(&self) -> &Spacing3 {
        &self.spacing
    }

    /// Physical coordinate of voxel (0, 0, 0).
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Orientation of the index axes.
    pub fn direction(&self) -> &Direction3 {
        &self.direction
    }

    /// Total number of voxels.
    pub fn voxel_count(&self) -> usize {
        self.size[0] * self.size[1] * self.size[2]
    }

    /// The voxel values, `i` fastest.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Flat offset of voxel (i, j, k).
    #[inline]
    pub fn linear_index(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.size[0] * (j + self.size[1] * k)
    }

    /// Value at voxel (i, j, k). Indices must be in bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f32 {
        self.data[self.linear_index(i, j, k)]
    }

    /// Whether another volume shares this volume's geometry exactly.
    pub fn geometry_matches(&self, other: &Volume) -> bool {
        self.size == other.size
            && self.spacing == other.spacing
            && self.origin == other.origin
            && self.direction == other.direction
    }

    /// Return an error unless the two volumes share geometry.
    pub fn require_same_geometry(&self, other: &Volume, context: &str) -> Result<()> {
        if self.geometry_matches(other) {
            Ok(())
        } else {
            Err(CoreError::geometry_mismatch(format!(
                "{context}: {:?}/{:?} vs {:?}/{:?}",
                self.size,
                self.spacing.as_array(),
                other.size,
                other.spacing.as_array()
            )))
        }
    }

    /// Map a continuous index to a physical point.
    ///
    /// `point = origin + direction · diag(spacing) · index`
    pub fn index_to_physical(&self, index: [f64; 3]) -> Point3 {
        let idx = Vector3::new(index[0], index[1], index[2]);
        self.origin + self.index_to_physical * idx
    }

    /// Map a voxel index to a physical point.
    pub fn voxel_to_physical(&self, index: [usize; 3]) -> Point3 {
        self.index_to_physical([index[0] as f64, index[1] as f64, index[2] as f64])
    }

    /// Map a physical point to a continuous index.
    ///
    /// `index = diag(spacing)⁻¹ · direction⁻¹ · (point − origin)`
    pub fn physical_to_continuous_index(&self, point: &Point3) -> [f64; 3] {
        let idx = self.physical_to_index * (point - self.origin);
        [idx[0], idx[1], idx[2]]
    }
}
