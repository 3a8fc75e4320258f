//! Driver-facing view of an analysis result.
//!
//! Downstream alerting speaks in a 0-100 fatigue score and a three-level
//! driver state instead of the five internal cognitive states. This module
//! is the only place that derives those values.

use serde::{Deserialize, Serialize};

use crate::analysis::scorer::round_to;
use crate::analysis::state::StateLabel;
use crate::analysis::AnalysisResult;

const FATIGUED_SCORE_MIN: f64 = 70.0;
const DROWSY_SCORE_MIN: f64 = 40.0;

/// Coarse driver condition reported to alerting consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverState {
    Alert,
    Drowsy,
    Fatigued,
}

/// Relay payload derived from one `AnalysisResult`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverAssessment {
    /// 0-100, higher is more tired
    pub fatigue_score: f64,
    pub driver_state: DriverState,
    pub internal_state: StateLabel,
    pub confidence: f64,
}

impl DriverAssessment {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let fatigue_score = fatigue_score(result);
        let driver_state = if fatigue_score >= FATIGUED_SCORE_MIN {
            DriverState::Fatigued
        } else if fatigue_score >= DROWSY_SCORE_MIN || result.state == StateLabel::Fatigue {
            DriverState::Drowsy
        } else {
            DriverState::Alert
        };

        Self {
            fatigue_score,
            driver_state,
            internal_state: result.state,
            confidence: result.confidence,
        }
    }
}

/// theta/alpha of 1.0 maps to 30; a confirmed fatigue state lifts the floor
fn fatigue_score(result: &AnalysisResult) -> f64 {
    let mut score = ((result.metrics.theta_alpha - 1.0) * 50.0 + 30.0).clamp(0.0, 100.0);
    if result.state == StateLabel::Fatigue {
        score = score.max(50.0 + result.confidence * 45.0);
    }
    round_to(score, 2)
}
