// Smoother - rolling median over the normalised ratio metrics
//
// A median over the last N cycles rejects single-sample spikes from blink and
// motion artifacts while lagging less than a long moving average would.
// Band powers are passed through unsmoothed.

use crate::analysis::normalizer::NormalizedMetrics;
use crate::analysis::window::RollingWindow;

/// Three ratio windows of fixed capacity
#[derive(Debug, Clone)]
pub struct TemporalSmoother {
    theta_alpha: RollingWindow<f64>,
    beta_alpha: RollingWindow<f64>,
    alpha_beta: RollingWindow<f64>,
}

impl TemporalSmoother {
    /// Create a smoother keeping the last `history_size` values per ratio
    pub fn new(history_size: usize) -> Self {
        Self {
            theta_alpha: RollingWindow::new(history_size),
            beta_alpha: RollingWindow::new(history_size),
            alpha_beta: RollingWindow::new(history_size),
        }
    }

    /// Push the newest metrics and return the smoothed view
    pub fn smooth(&mut self, metrics: &NormalizedMetrics) -> NormalizedMetrics {
        self.theta_alpha.push(metrics.theta_alpha);
        self.beta_alpha.push(metrics.beta_alpha);
        self.alpha_beta.push(metrics.alpha_beta);

        NormalizedMetrics {
            theta_alpha: self.theta_alpha.median(),
            beta_alpha: self.beta_alpha.median(),
            alpha_beta: self.alpha_beta.median(),
            ..*metrics
        }
    }

    /// Number of cycles currently held in the windows
    pub fn len(&self) -> usize {
        self.theta_alpha.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theta_alpha.is_empty()
    }
}
