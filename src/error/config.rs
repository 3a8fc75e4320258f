// Configuration error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Configuration error code constants
///
/// Error code range: 3001-3004
pub struct ConfigErrorCodes {}

impl ConfigErrorCodes {
    /// A rolling window or sample count is zero or too small
    pub const INVALID_WINDOW: i32 = 3001;

    /// Entry/exit thresholds are out of range or inverted
    pub const INVALID_THRESHOLD: i32 = 3002;

    /// Hold duration is negative or not finite
    pub const INVALID_HOLD: i32 = 3003;

    /// Signal quality gate outside [0, 1]
    pub const INVALID_QUALITY_GATE: i32 = 3004;
}

/// Log a configuration error with structured context
pub fn log_config_error(err: &ConfigError, context: &str) {
    error!(
        "Config error in {}: code={}, component=AnalyzerConfig, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while validating an `AnalyzerConfig`
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Window size or sample count is invalid
    InvalidWindow {
        name: &'static str,
        value: usize,
        min: usize,
    },

    /// Hysteresis thresholds for a state are invalid
    InvalidThreshold {
        state: &'static str,
        entry: f64,
        exit: f64,
    },

    /// Hold duration for a state is invalid
    InvalidHold { state: &'static str, hold_sec: f64 },

    /// Minimum signal quality is outside [0, 1]
    InvalidQualityGate { value: f64 },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> i32 {
        match self {
            ConfigError::InvalidWindow { .. } => ConfigErrorCodes::INVALID_WINDOW,
            ConfigError::InvalidThreshold { .. } => ConfigErrorCodes::INVALID_THRESHOLD,
            ConfigError::InvalidHold { .. } => ConfigErrorCodes::INVALID_HOLD,
            ConfigError::InvalidQualityGate { .. } => ConfigErrorCodes::INVALID_QUALITY_GATE,
        }
    }

    fn message(&self) -> String {
        match self {
            ConfigError::InvalidWindow { name, value, min } => {
                format!("{} must be at least {} (got {})", name, min, value)
            }
            ConfigError::InvalidThreshold { state, entry, exit } => format!(
                "Invalid thresholds for {}: entry {} / exit {} (need 0 <= exit <= entry <= 1)",
                state, entry, exit
            ),
            ConfigError::InvalidHold { state, hold_sec } => {
                format!("Invalid hold time for {}: {} s", state, hold_sec)
            }
            ConfigError::InvalidQualityGate { value } => {
                format!("min_signal_quality must be within [0, 1] (got {})", value)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfigError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ConfigError {}
