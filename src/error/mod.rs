// Error types for the EEG cognition crate
//
// The classifier itself degrades instead of failing; these types cover the
// calibration control surface and configuration validation, with error codes
// suitable for reporting across the relay boundary.

mod calibration;
mod config;

pub use calibration::{log_calibration_error, CalibrationError, CalibrationErrorCodes};
pub use config::{log_config_error, ConfigError, ConfigErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the relay boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
