//! MIND-SSD similarity metric.
//!
//! The metric holds the fixed and moving MIND bundles, a sample set drawn
//! from the fixed volume, and the transform being optimized. Cost,
//! residuals, Jacobian, and the analytic gradient are sums over samples,
//! evaluated in parallel over fixed-size chunks whose partial results are
//! combined in chunk order, so summation order does not depend on the
//! worker count.

use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use mindreg_core::interpolation::{Interpolator, LinearInterpolator};
use mindreg_core::transform::SpatialTransform;
use mindreg_core::Volume;

use super::mind::{MindBundle, MindDescriptor};
use super::sampling::{stratified_samples, uniform_random_samples, Sample};
use super::trait_::ImageMetric;
use crate::error::{RegistrationError, Result};
use crate::mask::SpatialMask;
use crate::optimizer::ObjectiveFunction;

/// Samples per parallel work unit. Fixed so the reduction order is stable.
const SAMPLE_CHUNK: usize = 1024;

/// Sample-based SSD over MIND descriptors.
pub struct MindSsdMetric {
    descriptor: MindDescriptor,
    sampling_percentage: f64,
    explicit_sample_count: usize,
    use_stratified_sampling: bool,
    random_seed: u64,

    fixed: Option<Arc<Volume>>,
    moving: Option<Arc<Volume>>,
    mask: Option<Arc<dyn SpatialMask>>,
    transform: Option<Box<dyn SpatialTransform>>,

    fixed_bundle: Option<MindBundle>,
    moving_bundle: Option<MindBundle>,
    moving_gradients: Vec<[Volume; 3]>,
    cached_fixed: Option<Arc<Volume>>,
    cached_moving: Option<Arc<Volume>>,

    samples: Vec<Sample>,
    valid_samples: usize,
    initialized: bool,
}

impl MindSsdMetric {
    /// Create a metric with the given descriptor parameters.
    pub fn new(descriptor: MindDescriptor) -> Self {
        Self {
            descriptor,
            sampling_percentage: 0.25,
            explicit_sample_count: 0,
            use_stratified_sampling: true,
            random_seed: 121212,
            fixed: None,
            moving: None,
            mask: None,
            transform: None,
            fixed_bundle: None,
            moving_bundle: None,
            moving_gradients: Vec::new(),
            cached_fixed: None,
            cached_moving: None,
            samples: Vec::new(),
            valid_samples: 0,
            initialized: false,
        }
    }

    /// Bind the fixed (reference) volume.
    pub fn set_fixed_volume(&mut self, volume: Arc<Volume>) {
        self.fixed = Some(volume);
        self.initialized = false;
    }

    /// Bind the moving volume.
    pub fn set_moving_volume(&mut self, volume: Arc<Volume>) {
        self.moving = Some(volume);
        self.initialized = false;
    }

    /// Restrict sampling to a spatial mask.
    pub fn set_mask(&mut self, mask: Option<Arc<dyn SpatialMask>>) {
        self.mask = mask;
    }

    /// Bind the transform whose parameters are optimized. The metric owns
    /// the transform; parameters move in and out by value.
    pub fn set_transform(&mut self, transform: Box<dyn SpatialTransform>) {
        self.transform = Some(transform);
        self.initialized = false;
    }

    /// Fraction of fixed voxels to sample when no explicit count is set.
    pub fn set_sampling_percentage(&mut self, percentage: f64) {
        self.sampling_percentage = percentage;
    }

    /// Explicit sample count; 0 derives the count from the percentage.
    pub fn set_number_of_spatial_samples(&mut self, count: usize) {
        self.explicit_sample_count = count;
    }

    /// Choose between stratified-lattice and seeded random sampling.
    pub fn set_use_stratified_sampling(&mut self, stratified: bool) {
        self.use_stratified_sampling = stratified;
    }

    /// Seed for the per-metric random generator.
    pub fn set_random_seed(&mut self, seed: u64) {
        self.random_seed = seed;
    }

    /// The descriptor configuration.
    pub fn descriptor(&self) -> &MindDescriptor {
        &self.descriptor
    }

    fn target_sample_count(&self, total_voxels: usize) -> usize {
        if self.explicit_sample_count > 0 {
            self.explicit_sample_count
        } else {
            (self.sampling_percentage * total_voxels as f64).round() as usize
        }
    }

    fn require_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(RegistrationError::uninitialized(
                "call initialize() with fixed and moving volumes and a transform bound",
            ))
        }
    }
}

impl ObjectiveFunction for MindSsdMetric {
    fn parameter_count(&self) -> usize {
        self.transform
            .as_ref()
            .map(|t| t.parameter_count())
            .unwrap_or(0)
    }

    fn parameters(&self) -> Result<DVector<f64>> {
        let transform = self
            .transform
            .as_ref()
            .ok_or_else(|| RegistrationError::uninitialized("no transform bound"))?;
        Ok(transform.parameters())
    }

    fn set_parameters(&mut self, parameters: &DVector<f64>) -> Result<()> {
        let transform = self
            .transform
            .as_mut()
            .ok_or_else(|| RegistrationError::uninitialized("no transform bound"))?;
        transform.set_parameters(parameters)?;
        Ok(())
    }

    fn value(&mut self) -> Result<f64> {
        self.require_initialized()?;
        let (total, valid, channel_count) = {
            let transform = self.transform.as_deref().expect("checked by initialize");
            let channels = self
                .moving_bundle
                .as_ref()
                .expect("checked by initialize")
                .channels();
            let interp = LinearInterpolator::new();

            let partials: Vec<(f64, usize)> = self
                .samples
                .par_chunks(SAMPLE_CHUNK)
                .map(|chunk| {
                    let mut sum = 0.0f64;
                    let mut valid = 0usize;
                    for sample in chunk {
                        let mapped = transform.transform_point(&sample.fixed_point);
                        let index = channels[0].physical_to_continuous_index(&mapped);
                        if !interp.is_inside(&channels[0], index) {
                            continue;
                        }
                        let mut acc = 0.0f64;
                        for (k, channel) in channels.iter().enumerate() {
                            let moving = interp.sample(channel, index).unwrap_or(0.0);
                            let diff = sample.fixed_mind[k] as f64 - moving as f64;
                            acc += diff * diff;
                        }
                        sum += acc;
                        valid += 1;
                    }
                    (sum, valid)
                })
                .collect();

            let (total, valid) = partials
                .iter()
                .fold((0.0f64, 0usize), |(s, v), &(cs, cv)| (s + cs, v + cv));
            (total, valid, channels.len())
        };

        self.valid_samples = valid;
        if valid == 0 {
            return Ok(0.0);
        }
        Ok(total / (valid * channel_count) as f64)
    }

    fn supports_least_squares(&self) -> bool {
        true
    }

    fn supports_gradient(&self) -> bool {
        true
    }

    fn residuals_and_jacobian(&mut self) -> Result<(DVector<f64>, DMatrix<f64>)> {
        self.require_initialized()?;
        let (residuals, rows, valid, n) = {
            let transform = self.transform.as_deref().expect("checked by initialize");
            let channels = self
                .moving_bundle
                .as_ref()
                .expect("checked by initialize")
                .channels();
            let gradients = &self.moving_gradients;
            let interp = LinearInterpolator::new();
            let n = transform.parameter_count();

            let partials: Vec<(Vec<f64>, Vec<f64>, usize)> = self
                .samples
                .par_chunks(SAMPLE_CHUNK)
                .map(|chunk| {
                    let mut residuals = Vec::new();
                    let mut rows = Vec::new();
                    let mut valid = 0usize;
                    for sample in chunk {
                        let mapped = transform.transform_point(&sample.fixed_point);
                        let index = channels[0].physical_to_continuous_index(&mapped);
                        // Channel and gradient volumes share the moving
                        // geometry, so one inside test covers all of them.
                        if !interp.is_inside(&channels[0], index) {
                            continue;
                        }
                        let transform_jacobian = transform.parameter_jacobian(&sample.fixed_point);
                        for (k, channel) in channels.iter().enumerate() {
                            let moving = interp.sample(channel, index).unwrap_or(0.0);
                            residuals.push(sample.fixed_mind[k] as f64 - moving as f64);

                            let grad = &gradients[k];
                            let gx = interp.sample(&grad[0], index).unwrap_or(0.0) as f64;
                            let gy = interp.sample(&grad[1], index).unwrap_or(0.0) as f64;
                            let gz = interp.sample(&grad[2], index).unwrap_or(0.0) as f64;
                            // f = fixed - moving(T(x)), so each row carries
                            // the negated chain-rule product.
                            for p in 0..n {
                                let dot = gx * transform_jacobian[(p, 0)]
                                    + gy * transform_jacobian[(p, 1)]
                                    + gz * transform_jacobian[(p, 2)];
                                rows.push(-dot);
                            }
                        }
                        valid += 1;
                    }
                    (residuals, rows, valid)
                })
                .collect();

            let mut residuals = Vec::new();
            let mut rows = Vec::new();
            let mut valid = 0usize;
            for (chunk_residuals, chunk_rows, chunk_valid) in partials {
                residuals.extend(chunk_residuals);
                rows.extend(chunk_rows);
                valid += chunk_valid;
            }
            (residuals, rows, valid, n)
        };

        self.valid_samples = valid;
        let m = residuals.len();
        Ok((
            DVector::from_vec(residuals),
            DMatrix::from_row_slice(m, n, &rows),
        ))
    }

    fn gradient(&mut self) -> Result<DVector<f64>> {
        self.require_initialized()?;
        let transform = self.transform.as_deref().expect("checked by initialize");
        let channels = self
            .moving_bundle
            .as_ref()
            .expect("checked by initialize")
            .channels();
        let gradients = &self.moving_gradients;
        let interp = LinearInterpolator::new();
        let n = transform.parameter_count();
        let channel_count = channels.len();

        let partials: Vec<(Vec<f64>, usize)> = self
            .samples
            .par_chunks(SAMPLE_CHUNK)
            .map(|chunk| {
                let mut acc = vec![0.0f64; n];
                let mut valid = 0usize;
                for sample in chunk {
                    let mapped = transform.transform_point(&sample.fixed_point);
                    let index = channels[0].physical_to_continuous_index(&mapped);
                    if !interp.is_inside(&channels[0], index) {
                        continue;
                    }
                    let transform_jacobian = transform.parameter_jacobian(&sample.fixed_point);
                    for (k, channel) in channels.iter().enumerate() {
                        let moving = interp.sample(channel, index).unwrap_or(0.0);
                        let diff = sample.fixed_mind[k] as f64 - moving as f64;
                        let grad = &gradients[k];
                        let gx = interp.sample(&grad[0], index).unwrap_or(0.0) as f64;
                        let gy = interp.sample(&grad[1], index).unwrap_or(0.0) as f64;
                        let gz = interp.sample(&grad[2], index).unwrap_or(0.0) as f64;
                        for p in 0..n {
                            let dot = gx * transform_jacobian[(p, 0)]
                                + gy * transform_jacobian[(p, 1)]
                                + gz * transform_jacobian[(p, 2)];
                            acc[p] += -2.0 * diff * dot;
                        }
                    }
                    valid += 1;
                }
                (acc, valid)
            })
            .collect();

        let mut gradient = DVector::zeros(n);
        let mut valid = 0usize;
        for (acc, chunk_valid) in partials {
            for p in 0..n {
                gradient[p] += acc[p];
            }
            valid += chunk_valid;
        }
        if valid > 0 {
            gradient /= (valid * channel_count) as f64;
        }
        Ok(gradient)
    }
}

impl ImageMetric for MindSsdMetric {
    fn initialize(&mut self) -> Result<()> {
        let fixed = self
            .fixed
            .clone()
            .ok_or_else(|| RegistrationError::uninitialized("fixed volume not set"))?;
        let moving = self
            .moving
            .clone()
            .ok_or_else(|| RegistrationError::uninitialized("moving volume not set"))?;
        if self.transform.is_none() {
            return Err(RegistrationError::uninitialized("transform not set"));
        }

        let fixed_cached = self
            .cached_fixed
            .as_ref()
            .is_some_and(|cached| Arc::ptr_eq(cached, &fixed))
            && self.fixed_bundle.is_some();
        if !fixed_cached {
            tracing::debug!(size = ?fixed.size(), "computing fixed MIND bundle");
            self.fixed_bundle = Some(self.descriptor.compute(&fixed)?);
            self.cached_fixed = Some(fixed.clone());
        }

        let moving_cached = self
            .cached_moving
            .as_ref()
            .is_some_and(|cached| Arc::ptr_eq(cached, &moving))
            && self.moving_bundle.is_some();
        if !moving_cached {
            tracing::debug!(size = ?moving.size(), "computing moving MIND bundle");
            let bundle = self.descriptor.compute(&moving)?;
            self.moving_gradients = bundle.gradients();
            self.moving_bundle = Some(bundle);
            self.cached_moving = Some(moving.clone());
        }

        // Sampling reruns on every initialize, even on cache hits.
        let pad = self.descriptor.sampling_pad();
        let target = self.target_sample_count(fixed.voxel_count());
        let samples = {
            let bundle = self.fixed_bundle.as_ref().expect("computed above");
            let mask = self.mask.as_deref();
            if self.use_stratified_sampling {
                stratified_samples(&fixed, bundle, pad, target, mask)
            } else {
                let mut rng = StdRng::seed_from_u64(self.random_seed);
                uniform_random_samples(&fixed, bundle, pad, target, mask, &mut rng)
            }
        };
        self.samples = samples;
        self.valid_samples = 0;
        self.initialized = true;
        tracing::debug!(
            samples = self.samples.len(),
            target_samples = target,
            pad,
            "metric initialized"
        );
        Ok(())
    }

    fn reset_cache(&mut self) {
        self.cached_fixed = None;
        self.cached_moving = None;
        self.fixed_bundle = None;
        self.moving_bundle = None;
        self.moving_gradients.clear();
        self.initialized = false;
    }

    fn sample_count(&self) -> usize {
        self.samples.len()
    }

    fn valid_sample_count(&self) -> usize {
        self.valid_samples
    }

    fn name(&self) -> &'static str {
        "MIND"
    }
}
