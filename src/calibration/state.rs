// Baseline - per-subject reference values for metric normalisation
//
// This module stores the reference values the normalizer divides incoming
// ratios by. Before calibration every reference is 1.0, so the analyzer works
// on absolute ratios; after calibration the ratios become relative to the
// subject's own resting level.
//
// Each reference is the median of the calibration samples (robust to a single
// outlier), with near-zero values replaced by 1.0 to keep division safe.

use serde::{Deserialize, Serialize};

use crate::analysis::features::{mean_or, EegFeatures};
use crate::analysis::window::median;
use crate::error::CalibrationError;

/// Six scalars captured from one calibration frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSample {
    pub theta_alpha: f64,
    pub beta_alpha: f64,
    pub alpha_beta: f64,
    pub alpha_power: f64,
    pub beta_power: f64,
    pub theta_power: f64,
}

impl CalibrationSample {
    /// Reduce a feature frame to its calibration scalars
    ///
    /// Missing bands and ratios default to 1.0.
    pub fn from_features(features: &EegFeatures) -> Self {
        Self {
            theta_alpha: mean_or(&features.theta_alpha, 1.0),
            beta_alpha: mean_or(&features.beta_alpha, 1.0),
            alpha_beta: mean_or(&features.alpha_beta, 1.0),
            alpha_power: mean_or(&features.alpha, 1.0),
            beta_power: mean_or(&features.beta, 1.0),
            theta_power: mean_or(&features.theta, 1.0),
        }
    }

    /// Reject samples carrying NaN or infinite values
    pub fn validate(&self) -> Result<(), CalibrationError> {
        let fields = [
            ("theta_alpha", self.theta_alpha),
            ("beta_alpha", self.beta_alpha),
            ("alpha_beta", self.alpha_beta),
            ("alpha_power", self.alpha_power),
            ("beta_power", self.beta_power),
            ("theta_power", self.theta_power),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(CalibrationError::InvalidFeatures {
                    reason: format!("{} is not finite ({})", name, value),
                });
            }
        }
        Ok(())
    }
}

/// Reference values for each calibrated metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub theta_alpha: f64,
    pub beta_alpha: f64,
    pub alpha_beta: f64,
    pub alpha_power: f64,
    pub beta_power: f64,
    pub theta_power: f64,
}

impl Default for Baseline {
    /// Uncalibrated baseline: every reference is 1.0
    fn default() -> Self {
        Self {
            theta_alpha: 1.0,
            beta_alpha: 1.0,
            alpha_beta: 1.0,
            alpha_power: 1.0,
            beta_power: 1.0,
            theta_power: 1.0,
        }
    }
}

impl Baseline {
    /// Compute a baseline from calibration samples
    ///
    /// # Arguments
    /// * `samples` - Collected calibration samples
    /// * `required` - Minimum number of samples
    /// * `floor` - Reference values below this are replaced with 1.0
    ///
    /// # Returns
    /// * `Ok(Baseline)` - Median of each metric over the samples
    /// * `Err(CalibrationError::InsufficientSamples)` - Fewer than `required` samples
    pub fn from_samples(
        samples: &[CalibrationSample],
        required: usize,
        floor: f64,
    ) -> Result<Self, CalibrationError> {
        if samples.is_empty() || samples.len() < required {
            return Err(CalibrationError::InsufficientSamples {
                required,
                collected: samples.len(),
            });
        }

        let reference = |pick: fn(&CalibrationSample) -> f64| {
            let values: Vec<f64> = samples.iter().map(pick).collect();
            let value = median(&values);
            // Prevent zero baseline
            if value < floor {
                1.0
            } else {
                value
            }
        };

        Ok(Self {
            theta_alpha: reference(|s| s.theta_alpha),
            beta_alpha: reference(|s| s.beta_alpha),
            alpha_beta: reference(|s| s.alpha_beta),
            alpha_power: reference(|s| s.alpha_power),
            beta_power: reference(|s| s.beta_power),
            theta_power: reference(|s| s.theta_power),
        })
    }
}
