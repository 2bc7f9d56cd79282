//! MIND descriptor computation.
//!
//! MIND (Modality Independent Neighbourhood Descriptor) captures local
//! self-similarity: for each neighborhood offset `r`, the box-averaged
//! squared difference between the volume and a copy of itself shifted by
//! `r`, turned into `exp(-Dp/V)` and normalized per voxel. The descriptor
//! is invariant to monotonic intensity remappings, which converts
//! multi-modal alignment into a sum-of-squared-differences problem.

use mindreg_core::filter::{central_gradient, mean_box, shift};
use mindreg_core::Volume;
use serde::Deserialize;

use crate::error::Result;

/// Guard against division by zero in the variance and the per-voxel
/// normalization.
pub(crate) const MIND_EPSILON: f32 = 1e-10;

/// Neighborhood connectivity of the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum NeighborhoodKind {
    /// Face neighbors: ±e₁, ±e₂, ±e₃ (6 channels).
    #[serde(rename = "6-connected", alias = "SixConnected")]
    SixConnected,
    /// Full 3×3×3 cube excluding the center (26 channels). Memory-hungry:
    /// each bundle holds 26 volumes plus gradients.
    #[serde(rename = "26-connected", alias = "TwentySixConnected")]
    TwentySixConnected,
}

impl NeighborhoodKind {
    /// The offset list, fixed at descriptor construction.
    pub fn offsets(&self) -> Vec<[i32; 3]> {
        match self {
            NeighborhoodKind::SixConnected => vec![
                [1, 0, 0],
                [-1, 0, 0],
                [0, 1, 0],
                [0, -1, 0],
                [0, 0, 1],
                [0, 0, -1],
            ],
            NeighborhoodKind::TwentySixConnected => {
                let mut offsets = Vec::with_capacity(26);
                for dz in -1..=1 {
                    for dy in -1..=1 {
                        for dx in -1..=1 {
                            if dx != 0 || dy != 0 || dz != 0 {
                                offsets.push([dx, dy, dz]);
                            }
                        }
                    }
                }
                offsets
            }
        }
    }

    /// Number of descriptor channels.
    pub fn channel_count(&self) -> usize {
        match self {
            NeighborhoodKind::SixConnected => 6,
            NeighborhoodKind::TwentySixConnected => 26,
        }
    }
}

/// Parameters of the MIND descriptor.
#[derive(Debug, Clone)]
pub struct MindDescriptor {
    radius: usize,
    sigma: f64,
    neighborhood: NeighborhoodKind,
    offsets: Vec<[i32; 3]>,
}

impl MindDescriptor {
    /// Create a descriptor.
    ///
    /// # Arguments
    /// * `radius` - Patch radius of the box mean over squared differences
    /// * `sigma` - Decay parameter carried from the configuration record;
    ///   the box mean stands in for the Gaussian patch weighting
    /// * `neighborhood` - 6- or 26-connected offset set
    pub fn new(radius: usize, sigma: f64, neighborhood: NeighborhoodKind) -> Self {
        Self {
            radius,
            sigma,
            neighborhood,
            offsets: neighborhood.offsets(),
        }
    }

    /// Patch radius.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Decay parameter.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Neighborhood connectivity.
    pub fn neighborhood(&self) -> NeighborhoodKind {
        self.neighborhood
    }

    /// Number of channels (one per neighborhood offset).
    pub fn channel_count(&self) -> usize {
        self.offsets.len()
    }

    /// Boundary pad for sampling: the patch radius plus the largest offset
    /// component, so patch distances are meaningful at every sampled voxel.
    pub fn sampling_pad(&self) -> usize {
        let max_offset = self
            .offsets
            .iter()
            .flat_map(|o| o.iter())
            .map(|c| c.unsigned_abs() as usize)
            .max()
            .unwrap_or(0);
        self.radius + max_offset
    }

    /// Patch distances `Dp_k(x) = mean_box((I − shift(I, r_k))², radius)`.
    ///
    /// Each returned volume shares the input geometry.
    pub fn patch_distances(&self, volume: &Volume) -> Result<Vec<Volume>> {
        let mut dp = Vec::with_capacity(self.offsets.len());
        for offset in &self.offsets {
            let shifted = shift(
                volume,
                [offset[0] as f64, offset[1] as f64, offset[2] as f64],
            );
            let diff = volume.sub(&shifted)?;
            dp.push(mean_box(&diff.square(), self.radius));
        }
        Ok(dp)
    }

    /// Compute the full descriptor bundle for one volume.
    pub fn compute(&self, volume: &Volume) -> Result<MindBundle> {
        let dp = self.patch_distances(volume)?;
        let channel_count = dp.len() as f32;
        let voxels = volume.voxel_count();

        // V(x) = mean_k Dp_k(x) + eps.
        let mut variance = vec![0.0f32; voxels];
        for dp_k in &dp {
            for (v, &d) in variance.iter_mut().zip(dp_k.data()) {
                *v += d;
            }
        }
        for v in &mut variance {
            *v = *v / channel_count + MIND_EPSILON;
        }

        // MIND_k(x) = exp(-Dp_k(x) / V(x)).
        let mut channels: Vec<Vec<f32>> = dp
            .iter()
            .map(|dp_k| {
                dp_k.data()
                    .iter()
                    .zip(&variance)
                    .map(|(&d, &v)| (-d / v).exp())
                    .collect()
            })
            .collect();

        // Per-voxel normalization: the maximum channel value becomes 1.
        let mut max = vec![0.0f32; voxels];
        for channel in &channels {
            for (m, &c) in max.iter_mut().zip(channel) {
                *m = m.max(c);
            }
        }
        for channel in &mut channels {
            for (c, &m) in channel.iter_mut().zip(&max) {
                *c /= m + MIND_EPSILON;
            }
        }

        let channels = channels
            .into_iter()
            .map(|data| {
                volume
                    .with_same_geometry(data)
                    .expect("channel length equals voxel count")
            })
            .collect();
        Ok(MindBundle { channels })
    }
}

/// The per-volume MIND feature bundle: one volume per neighborhood offset,
/// all sharing the source geometry.
#[derive(Debug, Clone)]
pub struct MindBundle {
    channels: Vec<Volume>,
}

impl MindBundle {
    /// Descriptor channels in offset order.
    pub fn channels(&self) -> &[Volume] {
        &self.channels
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Descriptor vector at a voxel.
    pub fn values_at(&self, i: usize, j: usize, k: usize) -> Vec<f32> {
        self.channels.iter().map(|c| c.get(i, j, k)).collect()
    }

    /// Central-difference spatial gradient of every channel.
    pub fn gradients(&self) -> Vec<[Volume; 3]> {
        self.channels.iter().map(central_gradient).collect()
    }
}
