//! Core telemetry event types describing analyzer activity exposed to the
//! CLI and to relay-side subscribers.

use serde::{Deserialize, Serialize};

use crate::analysis::hysteresis::TransitionCause;
use crate::analysis::state::{CognitiveState, StateLabel};
use crate::calibration::Baseline;

/// Metric events covering classifications, transitions, gating and calibration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MetricEvent {
    Classification {
        state: StateLabel,
        confidence: f64,
    },
    Transition {
        from: CognitiveState,
        to: CognitiveState,
        cause: TransitionCause,
        at_ms: u64,
    },
    Gated {
        quality: f64,
    },
    CalibrationComplete {
        baseline: Baseline,
    },
}
