// Hysteresis - turns five competing scores into one confirmed state
//
// Per cycle, in order:
// 1. Safety override: a very high fatigue (then stress) score promotes
//    immediately, ignoring the hold timer. Fatigue is checked first.
// 2. Hold: the current state is locked for its minimum dwell time.
// 3. Exit: the current state is kept while its score stays at or above its
//    exit threshold (lower than the entry threshold).
// 4. Candidate: the first other state, in priority order, whose score reaches
//    its entry threshold; normal with a score of 0.0 when none does.
// 5. Promotion: the same candidate must win on consecutive cycles
//    (candidate_min_streak, 2 by default) before it becomes current. A normal
//    fallback winning while already in normal restarts the normal dwell
//    without reporting a transition.
//
// The confirmed state changes at most once per step, and only through
// promote().

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::scorer::StateScores;
use crate::analysis::state::CognitiveState;
use crate::config::HysteresisConfig;

/// Mutable hysteresis state; only `step()` changes it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HysteresisContext {
    /// Confirmed state reported to the outside world
    pub current_state: CognitiveState,
    /// Clock reading when the current state was entered
    pub state_entered_at: Duration,
    /// State being evaluated for promotion
    pub candidate_state: CognitiveState,
    /// Consecutive cycles the candidate has won
    pub candidate_streak: u32,
}

impl HysteresisContext {
    fn new(now: Duration) -> Self {
        Self {
            current_state: CognitiveState::Normal,
            state_entered_at: now,
            candidate_state: CognitiveState::Normal,
            candidate_streak: 0,
        }
    }
}

/// Why a transition happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// Score crossed the safety override level
    SafetyOverride,
    /// Candidate persisted long enough
    CandidatePromoted,
}

/// A change of confirmed state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: CognitiveState,
    pub to: CognitiveState,
    pub cause: TransitionCause,
}

/// Which branch of the selection algorithm decided this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Safety override promoted fatigue or stress
    Override,
    /// Minimum hold time not yet elapsed
    Holding,
    /// Current score still at or above its exit threshold
    Sustained,
    /// Candidate seen but not yet persistent enough
    Pending { candidate: CognitiveState, streak: u32 },
    /// Candidate promoted to current
    Promoted,
    /// Fallback normal won while already in normal; dwell timer restarted
    Restarted,
}

/// Result of one hysteresis step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Confirmed state after this step
    pub state: CognitiveState,
    /// Score reported alongside the state (before quality weighting)
    pub score: f64,
    pub decision: Decision,
    pub transition: Option<Transition>,
}

/// Finite-state machine over `CognitiveState` driven by a threshold table
#[derive(Debug, Clone)]
pub struct HysteresisStateMachine {
    table: HysteresisConfig,
    context: HysteresisContext,
}

impl HysteresisStateMachine {
    /// Start in normal, entered at `now`
    pub fn new(table: HysteresisConfig, now: Duration) -> Self {
        Self {
            table,
            context: HysteresisContext::new(now),
        }
    }

    pub fn current_state(&self) -> CognitiveState {
        self.context.current_state
    }

    pub fn context(&self) -> &HysteresisContext {
        &self.context
    }

    /// Run one selection cycle
    ///
    /// # Arguments
    /// * `scores` - Per-state scores for this cycle
    /// * `now` - Clock reading (must not go backwards)
    pub fn step(&mut self, scores: &StateScores, now: Duration) -> StepOutcome {
        let current = self.context.current_state;

        if let Some(target) = self.safety_override(scores) {
            let transition = self.promote(target, now, TransitionCause::SafetyOverride);
            return StepOutcome {
                state: target,
                score: scores.get(target),
                decision: Decision::Override,
                transition: Some(transition),
            };
        }

        let current_score = scores.get(current);
        let thresholds = self.table.thresholds(current);

        let held = now.saturating_sub(self.context.state_entered_at);
        if held.as_secs_f64() < thresholds.hold_sec {
            return self.stay(current_score, Decision::Holding);
        }

        if current_score >= thresholds.exit {
            self.context.candidate_state = current;
            self.context.candidate_streak = 0;
            return self.stay(current_score, Decision::Sustained);
        }

        let (candidate, candidate_score) = self.find_candidate(scores);
        if candidate == self.context.candidate_state {
            self.context.candidate_streak += 1;
        } else {
            self.context.candidate_state = candidate;
            self.context.candidate_streak = 1;
        }

        if self.context.candidate_streak >= self.table.candidate_min_streak {
            let transition = self.promote(candidate, now, TransitionCause::CandidatePromoted);
            let (decision, transition) = if candidate == current {
                (Decision::Restarted, None)
            } else {
                (Decision::Promoted, Some(transition))
            };
            return StepOutcome {
                state: candidate,
                score: candidate_score,
                decision,
                transition,
            };
        }

        self.stay(
            current_score,
            Decision::Pending {
                candidate,
                streak: self.context.candidate_streak,
            },
        )
    }

    /// Safety-critical state forced by a very high score, fatigue first
    fn safety_override(&self, scores: &StateScores) -> Option<CognitiveState> {
        let current = self.context.current_state;
        if scores.fatigue >= self.table.fatigue_override && current != CognitiveState::Fatigue {
            return Some(CognitiveState::Fatigue);
        }
        if scores.stress >= self.table.stress_override && current != CognitiveState::Stress {
            return Some(CognitiveState::Stress);
        }
        None
    }

    /// First non-current state in priority order meeting its entry threshold,
    /// with its score; `(Normal, 0.0)` when none qualifies
    fn find_candidate(&self, scores: &StateScores) -> (CognitiveState, f64) {
        CognitiveState::PRIORITY
            .into_iter()
            .filter(|state| *state != self.context.current_state)
            .map(|state| (state, scores.get(state)))
            .find(|(state, score)| *score >= self.table.thresholds(*state).entry)
            .unwrap_or((CognitiveState::Normal, 0.0))
    }

    fn stay(&self, score: f64, decision: Decision) -> StepOutcome {
        StepOutcome {
            state: self.context.current_state,
            score,
            decision,
            transition: None,
        }
    }

    /// Switch to `to` and restart the hold timer and candidate tracking
    fn promote(&mut self, to: CognitiveState, now: Duration, cause: TransitionCause) -> Transition {
        let from = self.context.current_state;
        self.context = HysteresisContext {
            current_state: to,
            state_entered_at: now,
            candidate_state: to,
            candidate_streak: 0,
        };
        Transition { from, to, cause }
    }
}

#[cfg(test)]
#[path = "hysteresis_tests.rs"]
mod tests;
