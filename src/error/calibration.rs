// Calibration error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Calibration error code constants
///
/// Single source of truth for the numeric codes reported to callers of the
/// analyzer (relay layer, CLI).
///
/// Error code range: 2001-2004
pub struct CalibrationErrorCodes {}

impl CalibrationErrorCodes {
    /// Not enough samples collected to compute a baseline
    pub const INSUFFICIENT_SAMPLES: i32 = 2001;

    /// Calibration frame contained unusable values
    pub const INVALID_FEATURES: i32 = 2002;

    /// Baseline requested before calibration finished
    pub const NOT_COMPLETE: i32 = 2003;

    /// Sample offered while no calibration was running
    pub const NOT_ACTIVE: i32 = 2004;
}

/// Log a calibration error with structured context
///
/// This function logs calibration errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - message: Human-readable error message
/// - context: Additional contextual information
pub fn log_calibration_error(err: &CalibrationError, context: &str) {
    error!(
        "Calibration error in {}: code={}, component=BaselineCalibrator, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Calibration-related errors
///
/// These errors cover baseline sample collection and finalisation. The
/// analyzer facade never propagates them out of `analyze()`; they surface at
/// the calibration control surface and in logs.
///
/// Error code range: 2001-2004
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Insufficient samples collected for calibration
    InsufficientSamples { required: usize, collected: usize },

    /// Invalid values in a calibration frame
    InvalidFeatures { reason: String },

    /// Calibration not complete
    NotComplete,

    /// No calibration in progress
    NotActive,
}

impl ErrorCode for CalibrationError {
    fn code(&self) -> i32 {
        match self {
            CalibrationError::InsufficientSamples { .. } => {
                CalibrationErrorCodes::INSUFFICIENT_SAMPLES
            }
            CalibrationError::InvalidFeatures { .. } => CalibrationErrorCodes::INVALID_FEATURES,
            CalibrationError::NotComplete => CalibrationErrorCodes::NOT_COMPLETE,
            CalibrationError::NotActive => CalibrationErrorCodes::NOT_ACTIVE,
        }
    }

    fn message(&self) -> String {
        match self {
            CalibrationError::InsufficientSamples {
                required,
                collected,
            } => {
                format!("Insufficient samples: need {}, got {}", required, collected)
            }
            CalibrationError::InvalidFeatures { reason } => {
                format!("Invalid features: {}", reason)
            }
            CalibrationError::NotComplete => "Calibration not complete".to_string(),
            CalibrationError::NotActive => {
                "No calibration in progress. Call start_calibration() first.".to_string()
            }
        }
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CalibrationError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for CalibrationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_error_codes() {
        assert_eq!(
            CalibrationError::InsufficientSamples {
                required: 5,
                collected: 3
            }
            .code(),
            CalibrationErrorCodes::INSUFFICIENT_SAMPLES
        );
        assert_eq!(
            CalibrationError::InvalidFeatures {
                reason: "test".to_string()
            }
            .code(),
            CalibrationErrorCodes::INVALID_FEATURES
        );
        assert_eq!(
            CalibrationError::NotComplete.code(),
            CalibrationErrorCodes::NOT_COMPLETE
        );
        assert_eq!(
            CalibrationError::NotActive.code(),
            CalibrationErrorCodes::NOT_ACTIVE
        );
    }

    #[test]
    fn test_calibration_error_messages() {
        let err = CalibrationError::InsufficientSamples {
            required: 5,
            collected: 3,
        };
        assert_eq!(err.message(), "Insufficient samples: need 5, got 3");

        let err = CalibrationError::InvalidFeatures {
            reason: "theta_alpha is NaN".to_string(),
        };
        assert_eq!(err.message(), "Invalid features: theta_alpha is NaN");

        assert!(CalibrationError::NotComplete
            .message()
            .contains("not complete"));
        assert!(CalibrationError::NotActive
            .message()
            .contains("start_calibration"));
    }

    #[test]
    fn test_calibration_error_display() {
        let err = CalibrationError::NotComplete;
        let display = format!("{}", err);
        assert!(display.contains("CalibrationError"));
        assert!(display.contains(&err.code().to_string()));
    }
}
