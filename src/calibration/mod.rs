// Calibration module - per-subject baseline workflow
//
// This module provides two main components:
// 1. Baseline: Reference values used to normalise incoming ratios
// 2. BaselineCalibrator: Manages the warm-up sample collection
//
// The calibration workflow:
// 1. start() the calibrator
// 2. Feed one feature frame per analysis chunk (5 by default)
// 3. The median of the collected samples becomes the new baseline

pub mod procedure;
pub mod state;

pub use procedure::{BaselineCalibrator, CalibrationProgress, SampleOutcome};
pub use state::{Baseline, CalibrationSample};
