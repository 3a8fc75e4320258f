// EEG Cognition Core - driver cognitive-state classifier
// Per-session baseline calibration, smoothing and hysteresis over EEG band ratios

// Module declarations
pub mod analysis;
pub mod calibration;
pub mod clock;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod relay;
pub mod telemetry;

// Re-exports for convenience
pub use analysis::features::EegFeatures;
pub use analysis::state::{CognitiveState, StateLabel};
pub use analysis::{AnalysisResult, CognitiveAnalyzer};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AnalyzerConfig;
pub use relay::{DriverAssessment, DriverState};

use tracing_subscriber::EnvFilter;

/// Install the stderr tracing subscriber used by the binaries
///
/// Honors `RUST_LOG`; defaults to `info`. `log` records are bridged into the
/// same subscriber. Calling it twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
