//! Configuration management for analyzer tuning
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling fast iteration on window sizes, calibration length, the signal
//! quality gate and the hysteresis table without recompilation. The state
//! scoring formulas are fixed and deliberately not part of the config.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analysis::state::CognitiveState;
use crate::error::ConfigError;

/// Bundled configuration file read by [`AnalyzerConfig::load`]
pub const BUNDLED_CONFIG_PATH: &str = "assets/analyzer_config.json";

/// Complete analyzer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub smoothing: SmoothingConfig,
    pub calibration: CalibrationConfig,
    pub gating: GatingConfig,
    pub hysteresis: HysteresisConfig,
}

/// Rolling window sizes for smoothing and stability tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Capacity of the ratio median windows and the raw state history
    pub history_size: usize,
    /// Capacity of the beta/alpha window used for variability
    pub variability_window: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            history_size: 5,
            variability_window: 10,
        }
    }
}

/// Baseline calibration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Number of warm-up samples collected before the baseline is finalised
    pub samples_required: usize,
    /// Baseline values below this are replaced with 1.0
    pub baseline_floor: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            samples_required: 5,
            baseline_floor: 0.01,
        }
    }
}

/// Signal quality gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatingConfig {
    /// Frames with quality below this are reported as unknown
    pub min_signal_quality: f64,
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            min_signal_quality: 0.2,
        }
    }
}

/// Entry/exit/hold triple for one cognitive state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateThresholds {
    /// Score a candidate must reach to be considered for entry
    pub entry: f64,
    /// Score below which the current state may be left
    pub exit: f64,
    /// Minimum dwell time in seconds before any non-override transition
    pub hold_sec: f64,
}

impl StateThresholds {
    pub const fn new(entry: f64, exit: f64, hold_sec: f64) -> Self {
        Self {
            entry,
            exit,
            hold_sec,
        }
    }
}

/// Hysteresis table and safety override levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HysteresisConfig {
    pub fatigue: StateThresholds,
    pub stress: StateThresholds,
    pub focused: StateThresholds,
    pub relaxed: StateThresholds,
    pub normal: StateThresholds,
    /// Consecutive cycles a candidate must persist before promotion
    pub candidate_min_streak: u32,
    /// Fatigue score that forces an immediate transition
    pub fatigue_override: f64,
    /// Stress score that forces an immediate transition
    pub stress_override: f64,
}

impl Default for HysteresisConfig {
    fn default() -> Self {
        Self {
            fatigue: StateThresholds::new(0.60, 0.40, 4.0),
            stress: StateThresholds::new(0.70, 0.45, 3.0),
            focused: StateThresholds::new(0.55, 0.30, 2.0),
            relaxed: StateThresholds::new(0.50, 0.30, 2.0),
            // Always enterable
            normal: StateThresholds::new(0.00, 0.00, 1.0),
            candidate_min_streak: 2,
            fatigue_override: 0.80,
            stress_override: 0.85,
        }
    }
}

impl HysteresisConfig {
    /// Look up the thresholds for `state`
    pub fn thresholds(&self, state: CognitiveState) -> &StateThresholds {
        match state {
            CognitiveState::Fatigue => &self.fatigue,
            CognitiveState::Stress => &self.stress,
            CognitiveState::Focused => &self.focused,
            CognitiveState::Relaxed => &self.relaxed,
            CognitiveState::Normal => &self.normal,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for state in CognitiveState::PRIORITY {
            let t = self.thresholds(state);
            let in_unit = |v: f64| (0.0..=1.0).contains(&v);
            if !in_unit(t.entry) || !in_unit(t.exit) || t.exit > t.entry {
                return Err(ConfigError::InvalidThreshold {
                    state: state.as_str(),
                    entry: t.entry,
                    exit: t.exit,
                });
            }
            if !t.hold_sec.is_finite() || t.hold_sec < 0.0 {
                return Err(ConfigError::InvalidHold {
                    state: state.as_str(),
                    hold_sec: t.hold_sec,
                });
            }
        }
        if self.candidate_min_streak == 0 {
            return Err(ConfigError::InvalidWindow {
                name: "candidate_min_streak",
                value: 0,
                min: 1,
            });
        }
        for (state, level) in [
            (CognitiveState::Fatigue, self.fatigue_override),
            (CognitiveState::Stress, self.stress_override),
        ] {
            if !(0.0..=1.0).contains(&level) {
                return Err(ConfigError::InvalidThreshold {
                    state: state.as_str(),
                    entry: level,
                    exit: self.thresholds(state).exit,
                });
            }
        }
        Ok(())
    }
}

impl AnalyzerConfig {
    /// Check every section for values the analyzer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smoothing.history_size == 0 {
            return Err(ConfigError::InvalidWindow {
                name: "history_size",
                value: self.smoothing.history_size,
                min: 1,
            });
        }
        if self.smoothing.variability_window < 3 {
            return Err(ConfigError::InvalidWindow {
                name: "variability_window",
                value: self.smoothing.variability_window,
                min: 3,
            });
        }
        if self.calibration.samples_required == 0 {
            return Err(ConfigError::InvalidWindow {
                name: "samples_required",
                value: 0,
                min: 1,
            });
        }
        if !(0.0..=1.0).contains(&self.gating.min_signal_quality) {
            return Err(ConfigError::InvalidQualityGate {
                value: self.gating.min_signal_quality,
            });
        }
        self.hysteresis.validate()
    }

    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration. If the file doesn't exist or the JSON is
    /// invalid, the default configuration is returned and a warning logged.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load the bundled configuration, relative to the working directory
    pub fn load() -> Self {
        Self::load_from_file(BUNDLED_CONFIG_PATH)
    }
}
