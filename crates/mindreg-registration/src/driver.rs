//! Multi-resolution registration driver.
//!
//! The driver builds fixed and moving pyramids, re-initializes the metric
//! for each level, configures the optimizer from the configuration record,
//! and carries the parameter vector from coarse to fine. With the
//! rigid-then-affine schedule it runs the whole pyramid twice, seeding the
//! affine stage from the rigid result.

use std::sync::Arc;

use nalgebra::DVector;

use mindreg_core::filter::VolumePyramid;
use mindreg_core::transform::{AffineTransform, RigidTransform, SpatialTransform};
use mindreg_core::Volume;

use crate::config::{MetricType, OptimizerType, RegistrationConfig, TransformType};
use crate::error::{RegistrationError, Result};
use crate::mask::SpatialMask;
use crate::metric::{ImageMetric, MindDescriptor, MindSsdMetric};
use crate::optimizer::{GaussNewtonOptimizer, IterationRecord, ObjectiveFunction, StopCondition};

/// Per-level record of one optimizer run.
#[derive(Debug, Clone)]
pub struct LevelTrace {
    /// Stage index: 0, or 1 for the affine stage of a rigid-then-affine run.
    pub stage: usize,
    /// Pyramid level (0 is coarsest).
    pub level: usize,
    /// Why the level's optimizer run ended.
    pub stop_condition: StopCondition,
    /// Cost at the level's final parameters.
    pub final_value: f64,
    /// Iterations executed.
    pub iterations: usize,
    /// Per-iteration trace.
    pub trace: Vec<IterationRecord>,
}

/// Output of a registration run.
#[derive(Debug, Clone)]
pub struct RegistrationResult {
    /// Final parameter vector (length 6 for rigid, 12 for affine).
    pub parameters: DVector<f64>,
    /// Stop condition of the last level.
    pub stop_condition: StopCondition,
    /// Per-level optimization traces across all stages.
    pub levels: Vec<LevelTrace>,
}

/// Drives the metric and optimizer over an image pyramid.
pub struct RegistrationDriver {
    config: RegistrationConfig,
    mask: Option<Arc<dyn SpatialMask>>,
}

impl std::fmt::Debug for RegistrationDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationDriver")
            .field("config", &self.config)
            .field("mask", &self.mask.as_ref().map(|_| "<dyn SpatialMask>"))
            .finish()
    }
}

impl RegistrationDriver {
    /// Create a driver from a validated configuration.
    ///
    /// # Errors
    /// `Configuration` when the record does not validate or selects a
    /// metric this engine does not provide.
    pub fn new(config: RegistrationConfig) -> Result<Self> {
        config.validate()?;
        if config.metric_type != MetricType::Mind {
            return Err(RegistrationError::configuration(
                "metricType MattesMutualInformation is not provided by this engine; use MIND",
            ));
        }
        Ok(Self { config, mask: None })
    }

    /// Restrict sampling to a spatial mask.
    pub fn with_mask(mut self, mask: Arc<dyn SpatialMask>) -> Self {
        self.mask = Some(mask);
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    /// Run the registration.
    ///
    /// # Arguments
    /// * `fixed` - Reference volume
    /// * `moving` - Volume being aligned onto the reference
    /// * `initial_parameters` - Starting parameters for the first stage's
    ///   transform; identity when absent
    pub fn register(
        &self,
        fixed: &Arc<Volume>,
        moving: &Arc<Volume>,
        initial_parameters: Option<&DVector<f64>>,
    ) -> Result<RegistrationResult> {
        let config = &self.config;
        let learning_rates = config
            .learning_rate
            .resolve(config.number_of_levels, "learningRate")?;
        let iterations = config
            .number_of_iterations
            .resolve(config.number_of_levels, "numberOfIterations")?;

        tracing::info!(
            levels = config.number_of_levels,
            transform = ?config.transform_type,
            fixed_size = ?fixed.size(),
            moving_size = ?moving.size(),
            "starting registration"
        );

        let fixed_levels: Vec<Arc<Volume>> =
            VolumePyramid::build(fixed, &config.shrink_factors, &config.smoothing_sigmas)?
                .into_levels()
                .into_iter()
                .map(Arc::new)
                .collect();
        let moving_levels: Vec<Arc<Volume>> =
            VolumePyramid::build(moving, &config.shrink_factors, &config.smoothing_sigmas)?
                .into_levels()
                .into_iter()
                .map(Arc::new)
                .collect();

        let mut metric = MindSsdMetric::new(MindDescriptor::new(
            config.mind_radius,
            config.mind_sigma,
            config.mind_neighborhood_type,
        ));
        metric.set_sampling_percentage(config.sampling_percentage);
        metric.set_number_of_spatial_samples(config.number_of_spatial_samples);
        metric.set_use_stratified_sampling(config.use_stratified_sampling);
        metric.set_random_seed(config.random_seed);
        metric.set_mask(self.mask.clone());

        let mut levels = Vec::new();
        match config.transform_type {
            TransformType::Rigid => {
                metric.set_transform(make_rigid(initial_parameters)?);
                let stop = self.run_pyramid(
                    &mut metric,
                    &fixed_levels,
                    &moving_levels,
                    &learning_rates,
                    &iterations,
                    0,
                    &mut levels,
                )?;
                Ok(RegistrationResult {
                    parameters: metric.parameters()?,
                    stop_condition: stop,
                    levels,
                })
            }
            TransformType::Affine => {
                metric.set_transform(make_affine(initial_parameters)?);
                let stop = self.run_pyramid(
                    &mut metric,
                    &fixed_levels,
                    &moving_levels,
                    &learning_rates,
                    &iterations,
                    0,
                    &mut levels,
                )?;
                Ok(RegistrationResult {
                    parameters: metric.parameters()?,
                    stop_condition: stop,
                    levels,
                })
            }
            TransformType::RigidThenAffine => {
                metric.set_transform(make_rigid(initial_parameters)?);
                self.run_pyramid(
                    &mut metric,
                    &fixed_levels,
                    &moving_levels,
                    &learning_rates,
                    &iterations,
                    0,
                    &mut levels,
                )?;

                // Seed the affine stage from the rigid rotation and
                // translation.
                let rigid_parameters = metric.parameters()?;
                let mut rigid = RigidTransform::identity();
                rigid.set_parameters(&rigid_parameters)?;
                let affine =
                    AffineTransform::new(*rigid.rotation_matrix(), *rigid.translation());
                tracing::info!(
                    rigid = ?rigid_parameters.as_slice(),
                    "rigid stage complete, switching to affine"
                );
                metric.set_transform(Box::new(affine));

                let stop = self.run_pyramid(
                    &mut metric,
                    &fixed_levels,
                    &moving_levels,
                    &learning_rates,
                    &iterations,
                    1,
                    &mut levels,
                )?;
                Ok(RegistrationResult {
                    parameters: metric.parameters()?,
                    stop_condition: stop,
                    levels,
                })
            }
        }
    }

    /// Run the optimizer over every pyramid level, coarsest first, carrying
    /// the transform parameters forward through the metric.
    #[allow(clippy::too_many_arguments)]
    fn run_pyramid(
        &self,
        metric: &mut MindSsdMetric,
        fixed_levels: &[Arc<Volume>],
        moving_levels: &[Arc<Volume>],
        learning_rates: &[f64],
        iterations: &[usize],
        stage: usize,
        levels: &mut Vec<LevelTrace>,
    ) -> Result<StopCondition> {
        let config = &self.config;
        let use_gauss_newton =
            config.effective_optimizer_type() == OptimizerType::GaussNewton;
        let mut last_stop = StopCondition::MaxIterations;

        for level in 0..config.number_of_levels {
            metric.set_fixed_volume(fixed_levels[level].clone());
            metric.set_moving_volume(moving_levels[level].clone());
            metric.initialize()?;

            if metric.sample_count() == 0 {
                return Err(RegistrationError::NumericalFailure {
                    level,
                    message: "no usable samples on this level (volume too small or mask excludes all candidates)".to_string(),
                    best_parameters: metric.parameters()?.iter().copied().collect(),
                });
            }

            let mut optimizer = GaussNewtonOptimizer::new();
            optimizer.set_learning_rate(learning_rates[level]);
            optimizer.set_number_of_iterations(iterations[level]);
            optimizer.set_minimum_step_length(config.minimum_step_length);
            optimizer.set_relaxation_factor(config.relaxation_factor);
            optimizer.set_gradient_magnitude_tolerance(config.gradient_magnitude_tolerance);
            optimizer.set_damping_factor(config.damping_factor);
            optimizer.set_use_levenberg_marquardt(config.use_levenberg_marquardt);
            optimizer.set_use_line_search(config.use_line_search);
            optimizer.set_use_gauss_newton(use_gauss_newton);

            tracing::info!(
                stage,
                level,
                size = ?fixed_levels[level].size(),
                samples = metric.sample_count(),
                learning_rate = learning_rates[level],
                max_iterations = iterations[level],
                "starting pyramid level"
            );

            let outcome = optimizer.optimize(metric)?;
            tracing::info!(
                stage,
                level,
                iterations = outcome.iterations,
                final_cost = outcome.final_value,
                stop = %outcome.stop_condition,
                "pyramid level finished"
            );

            levels.push(LevelTrace {
                stage,
                level,
                stop_condition: outcome.stop_condition,
                final_value: outcome.final_value,
                iterations: outcome.iterations,
                trace: outcome.trace,
            });

            if outcome.stop_condition == StopCondition::SingularMatrix {
                return Err(RegistrationError::NumericalFailure {
                    level,
                    message: "optimizer stopped on a singular system".to_string(),
                    best_parameters: outcome.best_parameters.iter().copied().collect(),
                });
            }
            last_stop = outcome.stop_condition;
        }
        Ok(last_stop)
    }
}

fn make_rigid(initial: Option<&DVector<f64>>) -> Result<Box<dyn SpatialTransform>> {
    let mut transform = RigidTransform::identity();
    if let Some(parameters) = initial {
        transform.set_parameters(parameters)?;
    }
    Ok(Box::new(transform))
}

fn make_affine(initial: Option<&DVector<f64>>) -> Result<Box<dyn SpatialTransform>> {
    let mut transform = AffineTransform::identity();
    if let Some(parameters) = initial {
        transform.set_parameters(parameters)?;
    }
    Ok(Box::new(transform))
}
