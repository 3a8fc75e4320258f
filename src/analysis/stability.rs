// Stability module - auxiliary signals for the scorer
//
// Variability: standard deviation of the smoothed beta/alpha ratio over a
// short window. Erratic beta activity is a stress marker.
//
// Stability: how rarely the raw (pre-hysteresis) arg-max state changed
// between consecutive cycles. A steady raw label supports "focused".

use crate::analysis::state::CognitiveState;
use crate::analysis::window::RollingWindow;

/// Minimum samples before variability/stability are computed
const MIN_SAMPLES: usize = 3;

/// Stability reported while the history is too short
const DEFAULT_STABILITY: f64 = 0.5;

/// Rolling standard deviation of the smoothed beta/alpha ratio
#[derive(Debug, Clone)]
pub struct VariabilityTracker {
    window: RollingWindow<f64>,
}

impl VariabilityTracker {
    pub fn new(window: usize) -> Self {
        Self {
            window: RollingWindow::new(window),
        }
    }

    /// Record the latest smoothed beta/alpha and return the current variability
    ///
    /// Returns 0.0 until at least three values have been seen.
    pub fn observe(&mut self, beta_alpha: f64) -> f64 {
        self.window.push(beta_alpha);
        if self.window.len() < MIN_SAMPLES {
            return 0.0;
        }
        self.window.std_dev()
    }
}

/// Bounded history of raw arg-max state labels
#[derive(Debug, Clone)]
pub struct StateHistory {
    labels: RollingWindow<CognitiveState>,
}

impl StateHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            labels: RollingWindow::new(capacity),
        }
    }

    pub fn push(&mut self, state: CognitiveState) {
        self.labels.push(state);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 1 - (adjacent changes / (len - 1)); 0.5 with fewer than three labels
    pub fn stability(&self) -> f64 {
        let len = self.labels.len();
        if len < MIN_SAMPLES {
            return DEFAULT_STABILITY;
        }

        let labels: Vec<CognitiveState> = self.labels.iter().copied().collect();
        let changes = labels.windows(2).filter(|pair| pair[0] != pair[1]).count();
        1.0 - changes as f64 / (len - 1) as f64
    }
}
