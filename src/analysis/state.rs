// State labels for the cognitive-state classifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cognitive state tracked by the hysteresis state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveState {
    /// Drowsiness (high theta relative to alpha)
    Fatigue,
    /// Very high beta, often erratic
    Stress,
    /// Moderate-high beta, stable signal
    Focused,
    /// High alpha relative to beta
    Relaxed,
    /// Balanced ratios; the resting default
    Normal,
}

impl CognitiveState {
    /// Candidate search order; safety-critical states first
    pub const PRIORITY: [CognitiveState; 5] = [
        CognitiveState::Fatigue,
        CognitiveState::Stress,
        CognitiveState::Focused,
        CognitiveState::Relaxed,
        CognitiveState::Normal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CognitiveState::Fatigue => "fatigue",
            CognitiveState::Stress => "stress",
            CognitiveState::Focused => "focused",
            CognitiveState::Relaxed => "relaxed",
            CognitiveState::Normal => "normal",
        }
    }
}

impl fmt::Display for CognitiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label reported to consumers: a confirmed state, or unknown for gated frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateLabel {
    Fatigue,
    Stress,
    Focused,
    Relaxed,
    Normal,
    Unknown,
}

impl StateLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateLabel::Fatigue => "fatigue",
            StateLabel::Stress => "stress",
            StateLabel::Focused => "focused",
            StateLabel::Relaxed => "relaxed",
            StateLabel::Normal => "normal",
            StateLabel::Unknown => "unknown",
        }
    }

    /// The underlying cognitive state, if this label carries one
    pub fn cognitive_state(&self) -> Option<CognitiveState> {
        match self {
            StateLabel::Fatigue => Some(CognitiveState::Fatigue),
            StateLabel::Stress => Some(CognitiveState::Stress),
            StateLabel::Focused => Some(CognitiveState::Focused),
            StateLabel::Relaxed => Some(CognitiveState::Relaxed),
            StateLabel::Normal => Some(CognitiveState::Normal),
            StateLabel::Unknown => None,
        }
    }
}

impl From<CognitiveState> for StateLabel {
    fn from(state: CognitiveState) -> Self {
        match state {
            CognitiveState::Fatigue => StateLabel::Fatigue,
            CognitiveState::Stress => StateLabel::Stress,
            CognitiveState::Focused => StateLabel::Focused,
            CognitiveState::Relaxed => StateLabel::Relaxed,
            CognitiveState::Normal => StateLabel::Normal,
        }
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_match_wire_format() {
        assert_eq!(
            serde_json::to_string(&CognitiveState::Focused).unwrap(),
            "\"focused\""
        );
        assert_eq!(
            serde_json::to_string(&StateLabel::Unknown).unwrap(),
            "\"unknown\""
        );
        let parsed: StateLabel = serde_json::from_str("\"fatigue\"").unwrap();
        assert_eq!(parsed, StateLabel::Fatigue);
    }

    #[test]
    fn test_label_conversion() {
        for state in CognitiveState::PRIORITY {
            let label = StateLabel::from(state);
            assert_eq!(label.as_str(), state.as_str());
            assert_eq!(label.cognitive_state(), Some(state));
        }
        assert_eq!(StateLabel::Unknown.cognitive_state(), None);
    }
}
