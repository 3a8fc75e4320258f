use super::*;

/// Helper to build a ratio-only calibration frame
fn frame(theta_alpha: f64) -> EegFeatures {
    EegFeatures::from_ratios(theta_alpha, 1.0, 1.0)
}

#[test]
fn test_new_calibrator_is_inactive_and_uncalibrated() {
    let calibrator = BaselineCalibrator::new_default();

    assert!(!calibrator.is_active());
    assert!(!calibrator.is_calibrated());
    assert_eq!(*calibrator.baseline(), Baseline::default());
    assert_eq!(
        calibrator.calibrated_baseline(),
        Err(CalibrationError::NotComplete)
    );
}

#[test]
fn test_add_sample_while_inactive_is_rejected() {
    let mut calibrator = BaselineCalibrator::new_default();

    let result = calibrator.add_sample(&frame(1.0));
    assert_eq!(result, Err(CalibrationError::NotActive));
    assert_eq!(calibrator.progress().samples_collected, 0);
}

#[test]
fn test_completes_exactly_at_fifth_sample() {
    let mut calibrator = BaselineCalibrator::new_default();
    calibrator.start();

    for i in 1..5 {
        match calibrator.add_sample(&frame(1.0)) {
            Ok(SampleOutcome::Collected { collected, needed }) => {
                assert_eq!(collected, i);
                assert_eq!(needed, 5);
            }
            other => panic!("Expected Collected on sample {}, got {:?}", i, other),
        }
    }

    match calibrator.add_sample(&frame(1.0)) {
        Ok(SampleOutcome::Completed(baseline)) => assert_eq!(baseline.theta_alpha, 1.0),
        other => panic!("Expected Completed, got {:?}", other),
    }

    assert!(calibrator.is_calibrated());
    assert!(!calibrator.is_active());
    assert!(calibrator.calibrated_baseline().is_ok());
}

#[test]
fn test_baseline_uses_median_of_buffer() {
    let mut calibrator = BaselineCalibrator::new_default();
    calibrator.start();

    for value in [0.8, 1.2, 1.0, 0.9, 1.1] {
        calibrator.add_sample(&frame(value)).unwrap();
    }

    assert!((calibrator.baseline().theta_alpha - 1.0).abs() < 1e-12);
}

#[test]
fn test_empty_frame_is_not_collected() {
    let mut calibrator = BaselineCalibrator::new_default();
    calibrator.start();

    let result = calibrator.add_sample(&EegFeatures::default());
    assert!(matches!(
        result,
        Err(CalibrationError::InvalidFeatures { .. })
    ));
    assert_eq!(calibrator.progress().samples_collected, 0);
    assert!(calibrator.is_active());
}

#[test]
fn test_non_finite_sample_is_rejected() {
    let mut calibrator = BaselineCalibrator::new_default();
    calibrator.start();

    let result = calibrator.add_sample(&frame(f64::INFINITY));
    assert!(matches!(
        result,
        Err(CalibrationError::InvalidFeatures { .. })
    ));
    assert_eq!(calibrator.progress().samples_collected, 0);
}

#[test]
fn test_recalibration_keeps_old_baseline_until_complete() {
    let mut calibrator = BaselineCalibrator::new_default();
    calibrator.start();
    for _ in 0..5 {
        calibrator.add_sample(&frame(2.0)).unwrap();
    }
    assert_eq!(calibrator.baseline().theta_alpha, 2.0);

    calibrator.start();
    for _ in 0..4 {
        calibrator.add_sample(&frame(4.0)).unwrap();
    }
    // Still the first baseline while the second run is in progress
    assert_eq!(calibrator.baseline().theta_alpha, 2.0);
    assert!(calibrator.is_calibrated());

    calibrator.add_sample(&frame(4.0)).unwrap();
    assert_eq!(calibrator.baseline().theta_alpha, 4.0);
}

#[test]
fn test_progress_reporting() {
    let mut calibrator = BaselineCalibrator::new(CalibrationConfig {
        samples_required: 4,
        baseline_floor: 0.01,
    });
    calibrator.start();
    calibrator.add_sample(&frame(1.0)).unwrap();

    let progress = calibrator.progress();
    assert!(progress.active);
    assert_eq!(progress.samples_collected, 1);
    assert_eq!(progress.samples_needed, 4);
    assert!((progress.fraction() - 0.25).abs() < f32::EPSILON);
    assert!(!progress.calibrated);
}
