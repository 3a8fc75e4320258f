// Scorer - heuristic per-state confidence scoring
//
// Each cognitive state gets an independent 0.0-1.0 score from the smoothed
// ratio metrics plus the variability/stability signals. Scores are not a
// probability distribution; the hysteresis state machine decides between
// them. The constants below define the classification boundaries and must not
// drift.
//
// Markers (relative to baseline):
// - fatigue: theta/alpha > 1.4
// - stress:  beta/alpha > 1.8, boosted by erratic beta (variability > 0.15)
// - focused: 1.2 <= beta/alpha <= 1.8 and theta/alpha < 1.3, boosted by stability
// - relaxed: alpha/beta > 1.3 and theta/alpha < 1.2
// - normal:  inversely coupled to the others and to ratio imbalance

use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::NormalizedMetrics;
use crate::analysis::state::CognitiveState;

const FATIGUE_THETA_ALPHA_MIN: f64 = 1.4;

const STRESS_BETA_ALPHA_MIN: f64 = 1.8;
const STRESS_VARIABILITY_MIN: f64 = 0.15;

const FOCUSED_BETA_ALPHA_MIN: f64 = 1.2;
const FOCUSED_BETA_ALPHA_MAX: f64 = 1.8;
const FOCUSED_THETA_ALPHA_MAX: f64 = 1.3;
const FOCUSED_STABILITY_MIN: f64 = 0.7;
const FOCUSED_VARIABILITY_MAX: f64 = 0.1;

const RELAXED_ALPHA_BETA_MIN: f64 = 1.3;
const RELAXED_THETA_ALPHA_MAX: f64 = 1.2;

/// Independent confidence score per cognitive state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StateScores {
    pub fatigue: f64,
    pub stress: f64,
    pub focused: f64,
    pub relaxed: f64,
    pub normal: f64,
}

impl StateScores {
    /// Score for `state`
    pub fn get(&self, state: CognitiveState) -> f64 {
        match state {
            CognitiveState::Fatigue => self.fatigue,
            CognitiveState::Stress => self.stress,
            CognitiveState::Focused => self.focused,
            CognitiveState::Relaxed => self.relaxed,
            CognitiveState::Normal => self.normal,
        }
    }

    /// Highest-scoring state; ties go to the earlier state in priority order
    pub fn argmax(&self) -> CognitiveState {
        let mut best = CognitiveState::Fatigue;
        for state in CognitiveState::PRIORITY {
            if self.get(state) > self.get(best) {
                best = state;
            }
        }
        best
    }

    /// Copy with every score rounded to 2 decimal places
    pub fn rounded(&self) -> Self {
        Self {
            fatigue: round_to(self.fatigue, 2),
            stress: round_to(self.stress, 2),
            focused: round_to(self.focused, 2),
            relaxed: round_to(self.relaxed, 2),
            normal: round_to(self.normal, 2),
        }
    }
}

/// Round `value` to `decimals` decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Compute all five state scores
///
/// # Arguments
/// * `metrics` - Smoothed, baseline-normalised metrics
/// * `variability` - Std-dev of recent smoothed beta/alpha
/// * `stability` - Raw-label stability (0.0 flickering, 1.0 steady)
pub fn score_states(metrics: &NormalizedMetrics, variability: f64, stability: f64) -> StateScores {
    let fatigue = fatigue_score(metrics.theta_alpha);
    let stress = stress_score(metrics.beta_alpha, variability);
    let focused = focused_score(metrics.beta_alpha, metrics.theta_alpha, variability, stability);
    let relaxed = relaxed_score(metrics.alpha_beta, metrics.theta_alpha);
    let normal = normal_score(metrics, fatigue, stress, focused, relaxed);

    StateScores {
        fatigue,
        stress,
        focused,
        relaxed,
        normal,
    }
}

/// High theta relative to alpha = drowsy
fn fatigue_score(theta_alpha: f64) -> f64 {
    // Written so that NaN also scores zero
    if !(theta_alpha > FATIGUE_THETA_ALPHA_MIN) {
        return 0.0;
    }
    let excess = theta_alpha - FATIGUE_THETA_ALPHA_MIN;
    (0.5 + excess * 0.5).min(1.0)
}

/// Very high beta, boosted when erratic
fn stress_score(beta_alpha: f64, variability: f64) -> f64 {
    if !(beta_alpha > STRESS_BETA_ALPHA_MIN) {
        return 0.0;
    }
    let excess = beta_alpha - STRESS_BETA_ALPHA_MIN;
    let score = (0.4 + excess * 0.3).min(0.8);
    if variability > STRESS_VARIABILITY_MIN {
        (score + 0.2).min(1.0)
    } else {
        score
    }
}

/// Moderate-high beta while alert, boosted by a steady, calm signal
fn focused_score(beta_alpha: f64, theta_alpha: f64, variability: f64, stability: f64) -> f64 {
    let in_band = (FOCUSED_BETA_ALPHA_MIN..=FOCUSED_BETA_ALPHA_MAX).contains(&beta_alpha);
    if !(in_band && theta_alpha < FOCUSED_THETA_ALPHA_MAX) {
        return 0.0;
    }
    let mut score = 0.5;
    if stability > FOCUSED_STABILITY_MIN {
        score += 0.3;
    }
    if variability < FOCUSED_VARIABILITY_MAX {
        score += 0.2;
    }
    f64::min(score, 1.0)
}

/// High alpha relative to beta without drowsiness
fn relaxed_score(alpha_beta: f64, theta_alpha: f64) -> f64 {
    if !(alpha_beta > RELAXED_ALPHA_BETA_MIN && theta_alpha < RELAXED_THETA_ALPHA_MAX) {
        return 0.0;
    }
    let excess = alpha_beta - RELAXED_ALPHA_BETA_MIN;
    (0.5 + excess * 0.3).min(1.0)
}

/// Resting default: high when the other states are quiet and the ratios sit near 1.0
fn normal_score(
    metrics: &NormalizedMetrics,
    fatigue: f64,
    stress: f64,
    focused: f64,
    relaxed: f64,
) -> f64 {
    let dominant = fatigue
        .max(stress * 0.8)
        .max(focused * 0.6)
        .max(relaxed * 0.6);
    let inverse = 1.0 - dominant;

    let balance = [metrics.theta_alpha, metrics.beta_alpha, metrics.alpha_beta]
        .iter()
        .fold(1.0, |acc, ratio| acc - (ratio - 1.0).abs() * 0.2);

    inverse.min(balance).max(0.0)
}

#[cfg(test)]
#[path = "scorer_tests.rs"]
mod tests;
