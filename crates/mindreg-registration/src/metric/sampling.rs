//! Sample-set construction over the fixed volume.

use mindreg_core::spatial::Point3;
use mindreg_core::Volume;
use rand::rngs::StdRng;
use rand::Rng;

use super::mind::MindBundle;
use crate::mask::SpatialMask;

/// One registration sample: a fixed-volume voxel with its physical point
/// and descriptor vector.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Physical point of the fixed voxel.
    pub fixed_point: Point3,
    /// Voxel index in the fixed volume.
    pub fixed_index: [usize; 3],
    /// Fixed descriptor values, one per channel.
    pub fixed_mind: Vec<f32>,
}

fn accept(
    fixed: &Volume,
    bundle: &MindBundle,
    mask: Option<&dyn SpatialMask>,
    index: [usize; 3],
) -> Option<Sample> {
    let point = fixed.voxel_to_physical(index);
    if let Some(mask) = mask {
        if !mask.is_inside(&point) {
            return None;
        }
    }
    Some(Sample {
        fixed_point: point,
        fixed_index: index,
        fixed_mind: bundle.values_at(index[0], index[1], index[2]),
    })
}

/// Regular-lattice sampling with a boundary pad.
///
/// The lattice step is `⌈∛(total_voxels / target)⌉`; iteration keeps at most
/// `target` points. A mask, when present, rejects candidates by their
/// physical point.
pub fn stratified_samples(
    fixed: &Volume,
    bundle: &MindBundle,
    pad: usize,
    target: usize,
    mask: Option<&dyn SpatialMask>,
) -> Vec<Sample> {
    let size = fixed.size();
    if target == 0 || size.iter().any(|&s| s <= 2 * pad) {
        return Vec::new();
    }
    let total = fixed.voxel_count() as f64;
    let step = (total / target as f64).cbrt().ceil().max(1.0) as usize;

    let mut samples = Vec::with_capacity(target);
    'outer: for k in (pad..size[2] - pad).step_by(step) {
        for j in (pad..size[1] - pad).step_by(step) {
            for i in (pad..size[0] - pad).step_by(step) {
                if samples.len() >= target {
                    break 'outer;
                }
                if let Some(sample) = accept(fixed, bundle, mask, [i, j, k]) {
                    samples.push(sample);
                }
            }
        }
    }
    samples
}

/// Seeded uniform random sampling with a boundary pad.
///
/// Each coordinate is drawn uniformly on `[pad, size − pad)`; up to
/// `3 · target` attempts are made. Deterministic for a given RNG state.
pub fn uniform_random_samples(
    fixed: &Volume,
    bundle: &MindBundle,
    pad: usize,
    target: usize,
    mask: Option<&dyn SpatialMask>,
    rng: &mut StdRng,
) -> Vec<Sample> {
    let size = fixed.size();
    if target == 0 || size.iter().any(|&s| s <= 2 * pad) {
        return Vec::new();
    }

    let mut samples = Vec::with_capacity(target);
    let max_attempts = 3 * target;
    let mut attempts = 0;
    while samples.len() < target && attempts < max_attempts {
        attempts += 1;
        let index = [
            rng.gen_range(pad..size[0] - pad),
            rng.gen_range(pad..size[1] - pad),
            rng.gen_range(pad..size[2] - pad),
        ];
        if let Some(sample) = accept(fixed, bundle, mask, index) {
            samples.push(sample);
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::mind::{MindDescriptor, NeighborhoodKind};
    use mindreg_core::spatial::{Direction3, Spacing3};
    use rand::SeedableRng;

    fn fixture() -> (Volume, MindBundle) {
        let v = Volume::from_fn(
            [12, 12, 12],
            Spacing3::unit(),
            Point3::origin(),
            Direction3::identity(),
            |i, j, k| ((i * 7 + j * 3 + k) % 5) as f32,
        )
        .unwrap();
        let bundle = MindDescriptor::new(1, 0.8, NeighborhoodKind::SixConnected)
            .compute(&v)
            .unwrap();
        (v, bundle)
    }

    #[test]
    fn test_stratified_respects_pad_and_target() {
        let (v, bundle) = fixture();
        let samples = stratified_samples(&v, &bundle, 2, 50, None);
        assert!(!samples.is_empty());
        assert!(samples.len() <= 50);
        for s in &samples {
            for d in 0..3 {
                assert!(s.fixed_index[d] >= 2 && s.fixed_index[d] < 10);
            }
            assert_eq!(s.fixed_mind.len(), 6);
        }
    }

    #[test]
    fn test_stratified_is_deterministic() {
        let (v, bundle) = fixture();
        let a = stratified_samples(&v, &bundle, 2, 30, None);
        let b = stratified_samples(&v, &bundle, 2, 30, None);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.fixed_index, y.fixed_index);
        }
    }

    #[test]
    fn test_random_is_seed_deterministic() {
        let (v, bundle) = fixture();
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        let a = uniform_random_samples(&v, &bundle, 2, 30, None, &mut rng1);
        let b = uniform_random_samples(&v, &bundle, 2, 30, None, &mut rng2);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.fixed_index, y.fixed_index);
        }
    }

    #[test]
    fn test_mask_rejects_all() {
        let (v, bundle) = fixture();
        let mask = |_: &Point3| false;
        let samples = stratified_samples(&v, &bundle, 2, 30, Some(&mask));
        assert!(samples.is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        let samples = uniform_random_samples(&v, &bundle, 2, 30, Some(&mask), &mut rng);
        assert!(samples.is_empty());
    }

    #[test]
    fn test_volume_smaller_than_pad_yields_nothing() {
        let (v, bundle) = fixture();
        let samples = stratified_samples(&v, &bundle, 6, 30, None);
        assert!(samples.is_empty());
    }
}
