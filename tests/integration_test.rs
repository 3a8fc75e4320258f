//! Integration tests for the analyzer facade
//!
//! These tests drive `CognitiveAnalyzer` through the public API only:
//! - Quality gating leaves the session untouched
//! - Safety override and hysteresis timing on a manual clock
//! - Noise tolerance of the confirmed state
//! - Relay mapping of analysis results
//! - Telemetry fan-out

use std::sync::Arc;

use eeg_cognition::analysis::hysteresis::TransitionCause;
use eeg_cognition::config::StateThresholds;
use eeg_cognition::telemetry::{MetricEvent, TelemetryCollector};
use eeg_cognition::{
    AnalyzerConfig, CognitiveAnalyzer, CognitiveState, DriverAssessment, DriverState, EegFeatures,
    ManualClock, StateLabel,
};

fn frame(theta_alpha: f64, beta_alpha: f64, alpha_beta: f64) -> EegFeatures {
    EegFeatures::from_ratios(theta_alpha, beta_alpha, alpha_beta)
}

fn analyzer() -> (CognitiveAnalyzer<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    (CognitiveAnalyzer::with_clock(clock.clone()), clock)
}

/// A gated frame between two identical frames changes nothing
#[test]
fn test_gated_frame_is_invisible() {
    let (mut with_gate, clock_a) = analyzer();
    let (mut without_gate, clock_b) = analyzer();

    for (idx, theta) in [1.0, 1.6, 2.1, 1.2].into_iter().enumerate() {
        clock_a.advance_secs(1.0);
        clock_b.advance_secs(1.0);
        if idx == 2 {
            let gated = with_gate.analyze(&frame(3.0, 2.5, 0.3), 0.15);
            assert_eq!(gated.state, StateLabel::Unknown);
            assert_eq!(gated.confidence, 0.0);
        }
        let a = with_gate.analyze(&frame(theta, 1.0, 1.0), 0.8);
        let b = without_gate.analyze(&frame(theta, 1.0, 1.0), 0.8);
        assert_eq!(a, b, "cycle {}", idx);
    }
    assert_eq!(with_gate.hysteresis_context(), without_gate.hysteresis_context());
}

/// Strongly drowsy input forces fatigue on the first cycle
#[test]
fn test_drowsy_input_forces_fatigue_immediately() {
    let (mut analyzer, clock) = analyzer();
    clock.advance_secs(2.0);

    let result = analyzer.analyze(&frame(2.2, 1.0, 1.0), 1.0);
    assert_eq!(result.state, StateLabel::Fatigue);
    assert_eq!(result.confidence, 0.9);

    let assessment = DriverAssessment::from_result(&result);
    assert_eq!(assessment.driver_state, DriverState::Fatigued);
    assert_eq!(assessment.fatigue_score, 90.5);
}

/// With the override disabled and an exit threshold on normal, fatigue needs two cycles
#[test]
fn test_fatigue_promotion_through_candidate_route() {
    let mut config = AnalyzerConfig::default();
    config.hysteresis.normal = StateThresholds::new(0.5, 0.5, 1.0);
    config.hysteresis.fatigue_override = 1.0;
    let clock = ManualClock::new();
    let mut analyzer = CognitiveAnalyzer::with_config(config, clock.clone()).unwrap();

    clock.advance_secs(2.0);
    assert_eq!(
        analyzer.analyze(&frame(2.2, 1.0, 1.0), 1.0).state,
        StateLabel::Normal
    );
    clock.advance_secs(1.0);
    let second = analyzer.analyze(&frame(2.2, 1.0, 1.0), 1.0);
    assert_eq!(second.state, StateLabel::Fatigue);
    assert_eq!(second.confidence, 0.9);
}

/// Fatigue is held for its 4 s dwell time even after the signal recovers
#[test]
fn test_fatigue_hold_then_recovery() {
    let (mut analyzer, clock) = analyzer();
    clock.advance_secs(2.0);
    analyzer.analyze(&frame(2.6, 1.0, 1.0), 1.0);

    let mut states = Vec::new();
    for _ in 0..8 {
        clock.advance_secs(1.0);
        states.push(analyzer.analyze(&frame(1.0, 1.0, 1.0), 1.0).state);
    }

    // Hold covers t < 6 s, then normal needs two consecutive wins
    assert_eq!(&states[..3], &[StateLabel::Fatigue; 3]);
    assert!(states.contains(&StateLabel::Normal));
    assert_eq!(states.last(), Some(&StateLabel::Normal));

    let changes = states.windows(2).filter(|w| w[0] != w[1]).count();
    assert_eq!(changes, 1, "states: {:?}", states);
}

/// Alternating relaxed/focused-looking frames never flip the confirmed state
#[test]
fn test_noisy_alternation_does_not_flicker() {
    let (mut analyzer, clock) = analyzer();
    let mut confirmed = Vec::new();

    for i in 0..20 {
        clock.advance_secs(1.0);
        let features = if i % 2 == 0 {
            frame(1.0, 1.5, 0.7)
        } else {
            frame(0.9, 0.6, 1.8)
        };
        confirmed.push(analyzer.analyze(&features, 0.9).state);
    }

    assert!(confirmed.iter().all(|state| *state == StateLabel::Normal));
    assert_eq!(analyzer.current_state(), CognitiveState::Normal);
}

#[test]
fn test_calibration_then_analysis() {
    let (mut analyzer, clock) = analyzer();
    let resting = EegFeatures {
        theta: vec![12.0],
        alpha: vec![8.0],
        beta: vec![6.0],
        theta_alpha: vec![1.5],
        beta_alpha: vec![0.75],
        alpha_beta: vec![1.33],
        ..EegFeatures::default()
    };

    analyzer.start_calibration();
    let completed: Vec<bool> = (0..5)
        .map(|_| analyzer.add_calibration_sample(&resting))
        .collect();
    assert_eq!(completed, vec![false, false, false, false, true]);
    assert!(analyzer.is_calibrated());
    assert!(!analyzer.calibration_progress().active);

    // The subject's resting level now reads as 1.0 everywhere
    clock.advance_secs(1.0);
    let result = analyzer.analyze(&resting, 1.0);
    assert_eq!(result.metrics.theta_alpha, 1.0);
    assert_eq!(result.metrics.beta_alpha, 1.0);
    assert_eq!(result.metrics.alpha_beta, 1.0);
    assert_eq!(result.state, StateLabel::Normal);
}

#[test]
fn test_telemetry_stream() {
    let telemetry = Arc::new(TelemetryCollector::default());
    let mut rx = telemetry.subscribe();
    let clock = ManualClock::new();
    let mut analyzer =
        CognitiveAnalyzer::with_clock(clock.clone()).with_telemetry(Arc::clone(&telemetry));

    clock.advance_secs(1.5);
    analyzer.analyze(&frame(1.0, 1.0, 1.0), 1.0);
    clock.advance_secs(1.0);
    analyzer.analyze(&frame(1.0, 3.5, 0.3), 1.0);
    clock.advance_secs(1.0);
    analyzer.analyze(&frame(1.0, 3.5, 0.3), 1.0);

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    assert!(events
        .iter()
        .all(|event| !matches!(event, MetricEvent::Gated { .. })));
    assert!(events.iter().any(|event| matches!(
        event,
        MetricEvent::Classification {
            state: StateLabel::Normal,
            ..
        }
    )));
    let snapshot = telemetry.snapshot();
    assert_eq!(snapshot.total_events as usize, events.len());
    for event in &events {
        if let MetricEvent::Transition { cause, .. } = event {
            assert_eq!(*cause, TransitionCause::SafetyOverride);
        }
    }
}

#[test]
fn test_result_serializes_for_relay() {
    let (mut analyzer, clock) = analyzer();
    clock.advance_secs(1.0);
    let result = analyzer.analyze(&frame(1.2, 1.1, 0.9), 0.75);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["state"], "normal");
    assert_eq!(json["quality"], 0.75);
    assert_eq!(json["metrics"]["theta_alpha"], 1.2);
    for key in ["fatigue", "stress", "focused", "relaxed", "normal"] {
        assert!(json["scores"][key].is_number(), "missing score {}", key);
    }
    assert_eq!(json["debug"]["calibrated"], false);
}
