// Normalizer - divides raw ratios by the subject baseline
//
// Thresholds in the scorer are relative (1.0 = subject's resting level).
// Before calibration the baseline is 1.0 everywhere and the ratios pass
// through unchanged.

use serde::{Deserialize, Serialize};

use crate::analysis::features::{mean_or, EegFeatures};
use crate::calibration::Baseline;

/// Ratio metrics relative to baseline, plus absolute band powers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetrics {
    pub theta_alpha: f64,
    pub beta_alpha: f64,
    pub alpha_beta: f64,
    pub alpha_power: f64,
    pub beta_power: f64,
    pub theta_power: f64,
}

/// Normalise one feature frame against `baseline`
///
/// Missing ratios default to 1.0, missing band powers to 0.0. A key whose
/// mean is NaN or infinite counts as missing. A non-positive baseline leaves
/// the raw ratio untouched.
pub fn normalize(features: &EegFeatures, baseline: &Baseline) -> NormalizedMetrics {
    let relative = |samples: &[f64], reference: f64| {
        let raw = finite_mean_or(samples, 1.0);
        if reference > 0.0 {
            raw / reference
        } else {
            raw
        }
    };

    NormalizedMetrics {
        theta_alpha: relative(&features.theta_alpha, baseline.theta_alpha),
        beta_alpha: relative(&features.beta_alpha, baseline.beta_alpha),
        alpha_beta: relative(&features.alpha_beta, baseline.alpha_beta),
        alpha_power: finite_mean_or(&features.alpha, 0.0),
        beta_power: finite_mean_or(&features.beta, 0.0),
        theta_power: finite_mean_or(&features.theta, 0.0),
    }
}

fn finite_mean_or(samples: &[f64], default: f64) -> f64 {
    let mean = mean_or(samples, default);
    if mean.is_finite() {
        mean
    } else {
        default
    }
}
