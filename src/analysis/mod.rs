// Analysis module - cognitive-state pipeline and its facade
//
// This module orchestrates the per-chunk analysis pipeline, turning one frame
// of EEG band features into a confirmed cognitive state.
//
// Architecture:
// - CognitiveAnalyzer: per-session facade owning every piece of state
// - Pipeline: normalize → TemporalSmoother → Variability/StateHistory →
//   score_states → HysteresisStateMachine
// - Output: AnalysisResult consumed by the relay/alerting layer
//
// One analyzer exists per monitoring session. Calls are serialised through
// `&mut self`; time comes from an injected Clock so the hold timer can be
// tested without sleeping.

use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub mod features;
pub mod hysteresis;
pub mod normalizer;
pub mod scorer;
pub mod smoother;
pub mod stability;
pub mod state;
pub mod window;

use crate::calibration::{Baseline, BaselineCalibrator, CalibrationProgress, SampleOutcome};
use crate::clock::{Clock, SystemClock};
use crate::config::AnalyzerConfig;
use crate::error::{log_calibration_error, CalibrationError, ConfigError};
use crate::telemetry::{MetricEvent, TelemetryCollector};

use features::EegFeatures;
use hysteresis::{HysteresisContext, HysteresisStateMachine, StepOutcome};
use normalizer::normalize;
use scorer::{round_to, score_states, StateScores};
use smoother::TemporalSmoother;
use stability::{StateHistory, VariabilityTracker};
use state::{CognitiveState, StateLabel};

/// Smoothed ratio metrics as reported to consumers (3 decimal places)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RatioMetrics {
    pub theta_alpha: f64,
    pub beta_alpha: f64,
    pub alpha_beta: f64,
}

/// Auxiliary values exposed for observability
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DebugInfo {
    pub variability: f64,
    pub stability: f64,
    pub calibrated: bool,
}

/// Result of one analysis cycle
///
/// Serialised shape matches what the relay layer consumes. Gated cycles
/// report `unknown` with zero confidence, zeroed metrics, empty scores and no
/// debug block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Confirmed state, or unknown for gated frames
    pub state: StateLabel,
    /// Hysteresis-reported score weighted by signal quality (0.0-1.0)
    pub confidence: f64,
    pub metrics: RatioMetrics,
    /// Raw per-state scores (2 decimal places); None for gated frames
    #[serde(serialize_with = "serialize_scores")]
    pub scores: Option<StateScores>,
    pub quality: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

impl AnalysisResult {
    fn gated(quality: f64) -> Self {
        Self {
            state: StateLabel::Unknown,
            confidence: 0.0,
            metrics: RatioMetrics::default(),
            scores: None,
            quality,
            debug: None,
        }
    }
}

fn serialize_scores<S: Serializer>(
    scores: &Option<StateScores>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match scores {
        Some(scores) => scores.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// Per-session cognitive-state analyzer
pub struct CognitiveAnalyzer<C: Clock = SystemClock> {
    config: AnalyzerConfig,
    clock: C,
    calibrator: BaselineCalibrator,
    smoother: TemporalSmoother,
    variability: VariabilityTracker,
    history: StateHistory,
    hysteresis: HysteresisStateMachine,
    telemetry: Option<Arc<TelemetryCollector>>,
}

impl CognitiveAnalyzer<SystemClock> {
    /// Analyzer with default configuration on the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for CognitiveAnalyzer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> CognitiveAnalyzer<C> {
    /// Analyzer with default configuration on a custom clock
    pub fn with_clock(clock: C) -> Self {
        Self::build(AnalyzerConfig::default(), clock)
    }

    /// Analyzer with a validated custom configuration
    ///
    /// # Returns
    /// * `Err(ConfigError)` - Configuration rejected by `AnalyzerConfig::validate`
    pub fn with_config(config: AnalyzerConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: AnalyzerConfig, clock: C) -> Self {
        let now = clock.now();
        Self {
            calibrator: BaselineCalibrator::new(config.calibration.clone()),
            smoother: TemporalSmoother::new(config.smoothing.history_size),
            variability: VariabilityTracker::new(config.smoothing.variability_window),
            history: StateHistory::new(config.smoothing.history_size),
            hysteresis: HysteresisStateMachine::new(config.hysteresis.clone(), now),
            telemetry: None,
            config,
            clock,
        }
    }

    /// Attach a telemetry collector
    pub fn with_telemetry(mut self, telemetry: Arc<TelemetryCollector>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Start (or restart) baseline calibration
    pub fn start_calibration(&mut self) {
        self.calibrator.start();
    }

    /// Offer one calibration frame
    ///
    /// # Returns
    /// `true` exactly when this sample completed the calibration. Samples
    /// offered while no calibration is running are ignored.
    pub fn add_calibration_sample(&mut self, features: &EegFeatures) -> bool {
        match self.calibrator.add_sample(features) {
            Ok(SampleOutcome::Completed(baseline)) => {
                self.publish(MetricEvent::CalibrationComplete { baseline });
                true
            }
            Ok(SampleOutcome::Collected { collected, needed }) => {
                log::debug!("[Calibration] Sample {}/{}", collected, needed);
                false
            }
            Err(CalibrationError::NotActive) => false,
            Err(err) => {
                log_calibration_error(&err, "add_calibration_sample");
                false
            }
        }
    }

    pub fn calibration_progress(&self) -> CalibrationProgress {
        self.calibrator.progress()
    }

    /// Baseline currently used for normalisation
    pub fn baseline(&self) -> &Baseline {
        self.calibrator.baseline()
    }

    /// Baseline from a finished calibration
    pub fn calibrated_baseline(&self) -> Result<&Baseline, CalibrationError> {
        self.calibrator.calibrated_baseline()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrator.is_calibrated()
    }

    pub fn current_state(&self) -> CognitiveState {
        self.hysteresis.current_state()
    }

    pub fn hysteresis_context(&self) -> &HysteresisContext {
        self.hysteresis.context()
    }

    /// Classify one feature frame
    ///
    /// # Arguments
    /// * `features` - Band and ratio samples for this chunk
    /// * `signal_quality` - Upstream quality estimate (0.0-1.0)
    ///
    /// Empty frames and frames below the quality gate return `unknown`
    /// without touching any stored state.
    pub fn analyze(&mut self, features: &EegFeatures, signal_quality: f64) -> AnalysisResult {
        let gate = self.config.gating.min_signal_quality;
        // NaN quality fails the comparison and is gated too
        if features.is_empty() || !(signal_quality >= gate) {
            tracing::debug!(
                "[Analyzer] Gated cycle: empty={}, quality={:.2}",
                features.is_empty(),
                signal_quality
            );
            self.publish(MetricEvent::Gated {
                quality: signal_quality,
            });
            return AnalysisResult::gated(signal_quality);
        }

        let normalized = normalize(features, self.calibrator.baseline());
        let smoothed = self.smoother.smooth(&normalized);

        let variability = self.variability.observe(smoothed.beta_alpha);
        let stability = self.history.stability();
        let scores = score_states(&smoothed, variability, stability);

        self.history.push(scores.argmax());
        let now = self.clock.now();
        let outcome = self.hysteresis.step(&scores, now);
        self.report_transition(&outcome, now);

        let confidence = (outcome.score * signal_quality).clamp(0.0, 1.0);
        let result = AnalysisResult {
            state: outcome.state.into(),
            confidence: round_to(confidence, 2),
            metrics: RatioMetrics {
                theta_alpha: round_to(smoothed.theta_alpha, 3),
                beta_alpha: round_to(smoothed.beta_alpha, 3),
                alpha_beta: round_to(smoothed.alpha_beta, 3),
            },
            scores: Some(scores.rounded()),
            quality: round_to(signal_quality, 2),
            debug: Some(DebugInfo {
                variability: round_to(variability, 3),
                stability: round_to(stability, 2),
                calibrated: self.calibrator.is_calibrated(),
            }),
        };

        tracing::debug!(
            "[Analyzer] state={} confidence={:.2} theta/alpha={:.3} beta/alpha={:.3} decision={:?}",
            result.state,
            result.confidence,
            result.metrics.theta_alpha,
            result.metrics.beta_alpha,
            outcome.decision
        );
        self.publish(MetricEvent::Classification {
            state: result.state,
            confidence: result.confidence,
        });

        result
    }

    fn report_transition(&self, outcome: &StepOutcome, now: std::time::Duration) {
        if let Some(transition) = outcome.transition {
            tracing::info!(
                "[Analyzer] {} -> {} ({:?}, score={:.2})",
                transition.from,
                transition.to,
                transition.cause,
                outcome.score
            );
            self.publish(MetricEvent::Transition {
                from: transition.from,
                to: transition.to,
                cause: transition.cause,
                at_ms: now.as_millis() as u64,
            });
        }
    }

    fn publish(&self, event: MetricEvent) {
        if let Some(telemetry) = &self.telemetry {
            telemetry.publish(event);
        }
    }
}

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod tests;
