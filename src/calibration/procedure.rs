// BaselineCalibrator - warm-up sample collection workflow
//
// This module manages the calibration state machine:
// 1. start() clears the buffer and marks calibration active
// 2. add_sample() collects one sample per analysis chunk
// 3. once enough samples are in, the baseline is computed and swapped in
//
// The previous baseline stays in effect until a new one is finalised, so a
// re-calibration never leaves the analyzer without reference values.

use serde::{Deserialize, Serialize};

use crate::analysis::features::EegFeatures;
use crate::calibration::state::{Baseline, CalibrationSample};
use crate::config::CalibrationConfig;
use crate::error::CalibrationError;

/// Progress information for the running calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProgress {
    /// Whether samples are currently being collected
    pub active: bool,
    /// Number of samples collected so far
    pub samples_collected: usize,
    /// Samples needed to finalise the baseline
    pub samples_needed: usize,
    /// Whether a baseline has ever been finalised
    pub calibrated: bool,
}

impl CalibrationProgress {
    /// Fraction of the warm-up window collected (0.0-1.0)
    pub fn fraction(&self) -> f32 {
        if self.samples_needed == 0 {
            return 1.0;
        }
        (self.samples_collected as f32 / self.samples_needed as f32).min(1.0)
    }
}

/// Outcome of offering one calibration sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// Sample stored; more are needed
    Collected { collected: usize, needed: usize },
    /// Sample stored and the baseline was finalised
    Completed(Baseline),
}

/// BaselineCalibrator owns the baseline and the warm-up buffer
#[derive(Debug, Clone)]
pub struct BaselineCalibrator {
    samples: Vec<CalibrationSample>,
    baseline: Baseline,
    active: bool,
    calibrated: bool,
    config: CalibrationConfig,
}

impl BaselineCalibrator {
    /// Create an uncalibrated calibrator
    ///
    /// # Arguments
    /// * `config` - Sample count and baseline floor
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            samples: Vec::with_capacity(config.samples_required),
            baseline: Baseline::default(),
            active: false,
            calibrated: false,
            config,
        }
    }

    /// Create with default configuration (5 samples)
    pub fn new_default() -> Self {
        Self::new(CalibrationConfig::default())
    }

    /// Reset the sample buffer and start collecting
    pub fn start(&mut self) {
        self.samples.clear();
        self.active = true;
        log::info!(
            "[Calibration] Started - collecting {} baseline samples",
            self.config.samples_required
        );
    }

    /// Add a sample from a feature frame
    ///
    /// # Returns
    /// * `Ok(SampleOutcome::Collected)` - Sample stored, calibration continues
    /// * `Ok(SampleOutcome::Completed)` - Baseline finalised and now in effect
    /// * `Err(CalibrationError::NotActive)` - No calibration running
    /// * `Err(CalibrationError::InvalidFeatures)` - Empty frame or non-finite values
    pub fn add_sample(&mut self, features: &EegFeatures) -> Result<SampleOutcome, CalibrationError> {
        if !self.active {
            return Err(CalibrationError::NotActive);
        }
        if features.is_empty() {
            return Err(CalibrationError::InvalidFeatures {
                reason: "empty feature frame".to_string(),
            });
        }

        let sample = CalibrationSample::from_features(features);
        sample.validate()?;
        self.samples.push(sample);

        if self.samples.len() >= self.config.samples_required {
            let baseline = self.finalize()?;
            return Ok(SampleOutcome::Completed(baseline));
        }

        Ok(SampleOutcome::Collected {
            collected: self.samples.len(),
            needed: self.config.samples_required,
        })
    }

    /// Compute the baseline from the buffer and swap it in
    fn finalize(&mut self) -> Result<Baseline, CalibrationError> {
        let baseline = Baseline::from_samples(
            &self.samples,
            self.config.samples_required,
            self.config.baseline_floor,
        )?;

        self.baseline = baseline;
        self.calibrated = true;
        self.active = false;
        self.samples.clear();

        log::info!(
            "[Calibration] Complete! theta/alpha={:.3}, beta/alpha={:.3}, alpha/beta={:.3}",
            baseline.theta_alpha,
            baseline.beta_alpha,
            baseline.alpha_beta
        );
        Ok(baseline)
    }

    /// Baseline currently in effect (unity until first calibration completes)
    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Baseline from a completed calibration
    ///
    /// # Returns
    /// * `Err(CalibrationError::NotComplete)` - No calibration has finished yet
    pub fn calibrated_baseline(&self) -> Result<&Baseline, CalibrationError> {
        if self.calibrated {
            Ok(&self.baseline)
        } else {
            Err(CalibrationError::NotComplete)
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Get current calibration progress
    pub fn progress(&self) -> CalibrationProgress {
        CalibrationProgress {
            active: self.active,
            samples_collected: self.samples.len(),
            samples_needed: self.config.samples_required,
            calibrated: self.calibrated,
        }
    }
}

impl Default for BaselineCalibrator {
    fn default() -> Self {
        Self::new_default()
    }
}

#[cfg(test)]
#[path = "procedure_tests.rs"]
mod tests;
