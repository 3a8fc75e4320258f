//! Deterministic synthetic sessions for demos and smoke tests.
//!
//! Each scenario produces ratio frames around a characteristic operating
//! point with seeded jitter, preceded by five resting calibration frames. The
//! same seed always produces the same recording.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::analysis::features::EegFeatures;
use crate::fixtures::{RecordedCycle, SessionRecording};

const CALIBRATION_FRAMES: usize = 5;
const RATIO_JITTER: f64 = 0.05;

/// Scripted cognitive pattern for a synthetic session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// theta/alpha ramps up from resting to strongly drowsy
    Fatigue,
    /// High, erratic beta/alpha
    Stress,
    /// Moderate beta/alpha with steady alpha
    Focused,
    /// Alpha dominant, low beta
    Relaxed,
    /// Random operating points with frequent poor-quality frames
    Noisy,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Fatigue => "fatigue",
            Scenario::Stress => "stress",
            Scenario::Focused => "focused",
            Scenario::Relaxed => "relaxed",
            Scenario::Noisy => "noisy",
        }
    }

    /// (theta/alpha, beta/alpha, alpha/beta, quality) for cycle `idx` of `total`
    fn operating_point(&self, idx: usize, total: usize, rng: &mut StdRng) -> (f64, f64, f64, f64) {
        match self {
            Scenario::Fatigue => {
                let progress = idx as f64 / total.saturating_sub(1).max(1) as f64;
                (1.0 + 1.6 * progress, 0.9, 1.1, 0.95)
            }
            Scenario::Stress => (1.0, 2.8 + rng.gen_range(-0.8..0.8), 0.4, 0.95),
            Scenario::Focused => (1.0, 1.5, 0.7, 0.95),
            Scenario::Relaxed => (0.9, 0.6, 1.8, 0.95),
            Scenario::Noisy => (
                rng.gen_range(0.6..2.4),
                rng.gen_range(0.5..2.5),
                rng.gen_range(0.5..2.0),
                rng.gen_range(0.05..1.0),
            ),
        }
    }
}

/// Build a synthetic recording
///
/// # Arguments
/// * `scenario` - Pattern to generate
/// * `cycle_count` - Number of analysis cycles
/// * `seed` - RNG seed
/// * `interval_sec` - Spacing between cycle timestamps
pub fn synthesize(
    scenario: Scenario,
    cycle_count: usize,
    seed: u64,
    interval_sec: f64,
) -> SessionRecording {
    let mut rng = StdRng::seed_from_u64(seed);
    let interval = if interval_sec.is_finite() && interval_sec > 0.0 {
        interval_sec
    } else {
        1.0
    };

    let calibration = (0..CALIBRATION_FRAMES)
        .map(|_| jittered_frame(&mut rng, 1.0, 1.0, 1.0))
        .collect();

    let cycles = (0..cycle_count)
        .map(|idx| {
            let (theta_alpha, beta_alpha, alpha_beta, quality) =
                scenario.operating_point(idx, cycle_count, &mut rng);
            RecordedCycle {
                t: (idx + 1) as f64 * interval,
                quality,
                features: jittered_frame(&mut rng, theta_alpha, beta_alpha, alpha_beta),
            }
        })
        .collect();

    SessionRecording {
        name: format!("synthetic_{}_{seed}", scenario.as_str()),
        notes: None,
        calibration,
        cycles,
        expect: Vec::new(),
    }
}

fn jittered_frame(rng: &mut StdRng, theta_alpha: f64, beta_alpha: f64, alpha_beta: f64) -> EegFeatures {
    let mut jitter = |value: f64| (value + rng.gen_range(-RATIO_JITTER..RATIO_JITTER)).max(0.01);
    EegFeatures::from_ratios(jitter(theta_alpha), jitter(beta_alpha), jitter(alpha_beta))
}
