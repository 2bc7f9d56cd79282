//! Typed configuration record for the registration engine.
//!
//! Parsed from JSON with camelCase keys. Unknown keys are ignored, missing
//! keys fall back to defaults, and invalid values are configuration errors:
//! the engine refuses to start on a record that does not validate.

use serde::Deserialize;

use crate::error::{RegistrationError, Result};
use crate::metric::NeighborhoodKind;

/// Transform family driven by the registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TransformType {
    /// Six-parameter rigid transform.
    Rigid,
    /// Twelve-parameter affine transform.
    Affine,
    /// Rigid pyramid first, then affine seeded from the rigid result.
    #[serde(alias = "Rigid+Affine", alias = "RigidAffine")]
    RigidThenAffine,
}

/// Similarity metric choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MetricType {
    /// Mattes mutual information (recognized for compatibility; the
    /// implementation lives outside this engine).
    MattesMutualInformation,
    /// MIND descriptor SSD.
    #[serde(rename = "MIND", alias = "MINDDescriptor")]
    Mind,
}

/// Optimizer choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum OptimizerType {
    /// Step-relaxing gradient descent on the analytic metric gradient.
    RegularStepGradientDescent,
    /// Gauss–Newton least squares with optional Levenberg–Marquardt damping.
    #[serde(
        alias = "Gauss-Newton",
        alias = "LevenbergMarquardt",
        alias = "Levenberg-Marquardt"
    )]
    GaussNewton,
}

/// A per-level schedule given either as one value for all levels or as an
/// explicit array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PerLevel<T> {
    /// One value applied to every level.
    Uniform(T),
    /// One value per level, coarsest first.
    Schedule(Vec<T>),
}

impl<T: Clone> PerLevel<T> {
    /// Expand to one value per level.
    pub fn resolve(&self, levels: usize, key: &str) -> Result<Vec<T>> {
        match self {
            PerLevel::Uniform(value) => Ok(vec![value.clone(); levels]),
            PerLevel::Schedule(values) => {
                if values.len() != levels {
                    return Err(RegistrationError::configuration(format!(
                        "{key} has {} entries but numberOfLevels is {levels}",
                        values.len()
                    )));
                }
                Ok(values.clone())
            }
        }
    }
}

/// The configuration record consumed by the multi-resolution driver.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationConfig {
    pub transform_type: TransformType,
    pub metric_type: MetricType,
    /// Defaults per metric when absent: Gauss–Newton for MIND, regular-step
    /// gradient descent for mutual information.
    pub optimizer_type: Option<OptimizerType>,

    /// Mutual-information histogram bins; unused by the MIND metric.
    pub number_of_histogram_bins: u32,

    pub mind_radius: usize,
    pub mind_sigma: f64,
    pub mind_neighborhood_type: NeighborhoodKind,

    /// Explicit sample count; 0 derives the count from
    /// `sampling_percentage`.
    pub number_of_spatial_samples: usize,
    pub sampling_percentage: f64,

    pub learning_rate: PerLevel<f64>,
    pub minimum_step_length: f64,
    pub number_of_iterations: PerLevel<usize>,
    pub relaxation_factor: f64,
    pub gradient_magnitude_tolerance: f64,
    pub use_line_search: bool,
    pub use_levenberg_marquardt: bool,
    pub damping_factor: f64,

    pub number_of_levels: usize,
    pub shrink_factors: Vec<usize>,
    pub smoothing_sigmas: Vec<f64>,

    pub use_stratified_sampling: bool,
    pub random_seed: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            transform_type: TransformType::Rigid,
            metric_type: MetricType::MattesMutualInformation,
            optimizer_type: None,
            number_of_histogram_bins: 32,
            mind_radius: 1,
            mind_sigma: 0.8,
            mind_neighborhood_type: NeighborhoodKind::SixConnected,
            number_of_spatial_samples: 0,
            sampling_percentage: 0.25,
            learning_rate: PerLevel::Schedule(vec![2.0, 1.0, 0.5, 0.1, 0.05]),
            minimum_step_length: 1e-6,
            number_of_iterations: PerLevel::Schedule(vec![1000, 500, 250, 100, 0]),
            relaxation_factor: 0.5,
            gradient_magnitude_tolerance: 1e-6,
            use_line_search: true,
            use_levenberg_marquardt: true,
            damping_factor: 1e-3,
            number_of_levels: 5,
            shrink_factors: vec![12, 8, 4, 2, 1],
            smoothing_sigmas: vec![4.0, 3.0, 2.0, 1.0, 1.0],
            use_stratified_sampling: true,
            random_seed: 121212,
        }
    }
}

impl RegistrationConfig {
    /// Parse a configuration record from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| RegistrationError::configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The optimizer to use, applying the metric-dependent default.
    pub fn effective_optimizer_type(&self) -> OptimizerType {
        self.optimizer_type.unwrap_or(match self.metric_type {
            MetricType::Mind => OptimizerType::GaussNewton,
            MetricType::MattesMutualInformation => OptimizerType::RegularStepGradientDescent,
        })
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.number_of_levels == 0 {
            return Err(RegistrationError::configuration(
                "numberOfLevels must be at least 1",
            ));
        }
        if self.shrink_factors.len() != self.number_of_levels {
            return Err(RegistrationError::configuration(format!(
                "shrinkFactors has {} entries but numberOfLevels is {}",
                self.shrink_factors.len(),
                self.number_of_levels
            )));
        }
        if self.smoothing_sigmas.len() != self.number_of_levels {
            return Err(RegistrationError::configuration(format!(
                "smoothingSigmas has {} entries but numberOfLevels is {}",
                self.smoothing_sigmas.len(),
                self.number_of_levels
            )));
        }
        if self.shrink_factors.iter().any(|&f| f == 0) {
            return Err(RegistrationError::configuration(
                "shrinkFactors must be positive",
            ));
        }
        if self.shrink_factors.windows(2).any(|w| w[1] > w[0]) {
            return Err(RegistrationError::configuration(
                "shrinkFactors must be monotonically non-increasing",
            ));
        }
        if *self.shrink_factors.last().expect("non-empty") != 1 {
            return Err(RegistrationError::configuration(
                "the finest level must have shrinkFactor 1",
            ));
        }
        if self.smoothing_sigmas.iter().any(|&s| s < 0.0 || !s.is_finite()) {
            return Err(RegistrationError::configuration(
                "smoothingSigmas must be non-negative",
            ));
        }
        if !(self.sampling_percentage > 0.0 && self.sampling_percentage <= 1.0) {
            return Err(RegistrationError::configuration(format!(
                "samplingPercentage must be in (0, 1], got {}",
                self.sampling_percentage
            )));
        }
        if !(self.mind_sigma > 0.0) {
            return Err(RegistrationError::configuration(
                "mindSigma must be positive",
            ));
        }
        // Resolving the per-level schedules checks their lengths.
        self.learning_rate
            .resolve(self.number_of_levels, "learningRate")?;
        self.number_of_iterations
            .resolve(self.number_of_levels, "numberOfIterations")?;
        Ok(())
    }
}
