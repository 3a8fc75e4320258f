//! Session recordings and the deterministic replay harness.
//!
//! A session recording is a JSON document holding the calibration frames and
//! the timestamped analysis cycles of one monitoring session, plus optional
//! expected states. Replaying drives a fresh analyzer on a `ManualClock` so the
//! hold timers see the recorded timestamps instead of wall-clock time. Used by
//! the CLI and by integration tests; there is no live headset involved.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::features::EegFeatures;
use crate::analysis::state::StateLabel;
use crate::analysis::{AnalysisResult, CognitiveAnalyzer};
use crate::clock::ManualClock;
use crate::config::AnalyzerConfig;
use crate::relay::DriverAssessment;
use crate::telemetry::{TelemetryCollector, TelemetrySnapshot};

/// Latest accepted cycle timestamp, about 31 years into a session
const MAX_TIMESTAMP_SEC: f64 = 1.0e9;

pub mod synthetic;

pub use synthetic::{synthesize, Scenario};

/// Default location for session recordings.
pub const DEFAULT_FIXTURE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

const EXPECT_SUFFIX: &str = ".expect.json";

/// One recorded monitoring session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecording {
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Warm-up frames fed to calibration before the first cycle
    #[serde(default)]
    pub calibration: Vec<EegFeatures>,
    pub cycles: Vec<RecordedCycle>,
    #[serde(default)]
    pub expect: Vec<ExpectedState>,
}

/// One analysis cycle: timestamp in seconds since session start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordedCycle {
    pub t: f64,
    #[serde(default = "default_quality")]
    pub quality: f64,
    pub features: EegFeatures,
}

fn default_quality() -> f64 {
    1.0
}

/// Confirmed state expected after a given cycle (0-based).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ExpectedState {
    pub cycle: usize,
    pub state: StateLabel,
}

/// Stand-alone expectation file overriding a recording's inline expectations.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpectationFile {
    #[serde(default)]
    pub notes: Option<String>,
    pub expect: Vec<ExpectedState>,
}

impl SessionRecording {
    /// Parse a recording from JSON and check it can be replayed.
    pub fn from_json(data: &str) -> Result<Self> {
        let recording: SessionRecording =
            serde_json::from_str(data).context("parsing session recording JSON")?;
        recording.validate()?;
        Ok(recording)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading session {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("loading session {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(anyhow!("session name cannot be empty"));
        }
        if self.cycles.is_empty() {
            return Err(anyhow!("session {} has no cycles", self.name));
        }

        let mut previous = 0.0;
        for (idx, cycle) in self.cycles.iter().enumerate() {
            if !cycle.t.is_finite() || cycle.t < previous || cycle.t > MAX_TIMESTAMP_SEC {
                return Err(anyhow!(
                    "session {} cycle {} has invalid timestamp {} (must be finite, non-decreasing and at most {} s)",
                    self.name,
                    idx,
                    cycle.t,
                    MAX_TIMESTAMP_SEC
                ));
            }
            previous = cycle.t;
        }

        self.validate_expectations(&self.expect)
    }

    fn validate_expectations(&self, expect: &[ExpectedState]) -> Result<()> {
        if let Some(bad) = expect.iter().find(|e| e.cycle >= self.cycles.len()) {
            return Err(anyhow!(
                "session {} expects cycle {} but only has {} cycles",
                self.name,
                bad.cycle,
                self.cycles.len()
            ));
        }
        Ok(())
    }

    /// Replace inline expectations with the ones from `path`.
    pub fn apply_expectation_file(&mut self, path: &Path) -> Result<()> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading expectation {}", path.display()))?;
        let file: ExpectationFile =
            serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;
        self.validate_expectations(&file.expect)?;
        self.expect = file.expect;
        Ok(())
    }

    /// Compare replayed cycles against the expected states.
    pub fn verify(&self, replayed: &[ReplayedCycle]) -> std::result::Result<(), ExpectationDiff> {
        let failures: Vec<ExpectationFailure> = self
            .expect
            .iter()
            .filter_map(|expected| {
                let actual = replayed.get(expected.cycle).map(|cycle| cycle.result.state);
                (actual != Some(expected.state)).then_some(ExpectationFailure {
                    cycle: expected.cycle,
                    expected: expected.state,
                    actual,
                })
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExpectationDiff { failures })
        }
    }
}

/// Outcome of comparing replayed states with expectations.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationDiff {
    pub failures: Vec<ExpectationFailure>,
}

impl ExpectationDiff {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "failures": self.failures.iter().map(|failure| {
                serde_json::json!({
                    "cycle": failure.cycle,
                    "expected": failure.expected,
                    "actual": failure.actual,
                })
            }).collect::<Vec<_>>()
        })
    }
}

/// Detailed diff entry for a single failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectationFailure {
    pub cycle: usize,
    pub expected: StateLabel,
    /// None when the cycle was never replayed
    pub actual: Option<StateLabel>,
}

/// Analyzer output for one replayed cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayedCycle {
    pub cycle: usize,
    pub t: f64,
    pub result: AnalysisResult,
    pub assessment: DriverAssessment,
}

/// Full replay output.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session: String,
    pub calibrated: bool,
    pub cycle_count: usize,
    pub cycles: Vec<ReplayedCycle>,
    pub telemetry: TelemetrySnapshot,
}

impl SessionReport {
    /// Confirmed state after the last cycle
    pub fn final_state(&self) -> Option<StateLabel> {
        self.cycles.last().map(|cycle| cycle.result.state)
    }
}

/// Replays recordings through a fresh analyzer per run.
#[derive(Debug, Clone, Default)]
pub struct SessionReplay {
    config: AnalyzerConfig,
}

impl SessionReplay {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, recording: &SessionRecording) -> Result<SessionReport> {
        recording.validate()?;
        let clock = ManualClock::new();
        let telemetry = Arc::new(TelemetryCollector::new(256, recording.cycles.len().max(1) * 2));
        let mut analyzer = CognitiveAnalyzer::with_config(self.config.clone(), clock.clone())
            .context("building analyzer for replay")?
            .with_telemetry(Arc::clone(&telemetry));

        if !recording.calibration.is_empty() {
            analyzer.start_calibration();
            for frame in &recording.calibration {
                analyzer.add_calibration_sample(frame);
            }
            if !analyzer.is_calibrated() {
                let progress = analyzer.calibration_progress();
                log::warn!(
                    "[Replay] Session {} calibration incomplete ({}/{} samples); using unity baseline",
                    recording.name,
                    progress.samples_collected,
                    progress.samples_needed
                );
            }
        }

        let mut cycles = Vec::with_capacity(recording.cycles.len());
        for (idx, cycle) in recording.cycles.iter().enumerate() {
            let at = Duration::try_from_secs_f64(cycle.t)
                .with_context(|| format!("cycle {} timestamp {}", idx, cycle.t))?;
            clock.set(at);
            let result = analyzer.analyze(&cycle.features, cycle.quality);
            let assessment = DriverAssessment::from_result(&result);
            cycles.push(ReplayedCycle {
                cycle: idx,
                t: cycle.t,
                result,
                assessment,
            });
        }

        log::info!(
            "[Replay] Session {} replayed {} cycles, final state {}",
            recording.name,
            cycles.len(),
            analyzer.current_state()
        );

        Ok(SessionReport {
            session: recording.name.clone(),
            calibrated: analyzer.is_calibrated(),
            cycle_count: cycles.len(),
            cycles,
            telemetry: telemetry.snapshot(),
        })
    }
}

/// Metadata describing a recording on disk.
#[derive(Clone, Debug)]
pub struct SessionMetadata {
    pub name: String,
    pub path: PathBuf,
    pub expect_path: Option<PathBuf>,
}

/// Catalog responsible for discovering recordings on disk.
pub struct FixtureCatalog {
    root: PathBuf,
}

impl FixtureCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all recordings by their metadata.
    pub fn discover(&self) -> Result<Vec<SessionMetadata>> {
        let mut sessions = Vec::new();
        if !self.root.exists() {
            return Ok(sessions);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            if file_name.ends_with(EXPECT_SUFFIX) || !file_name.ends_with(".json") {
                continue;
            }
            sessions.push(self.metadata_for_path(&path)?);
        }

        sessions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sessions)
    }

    /// Load a recording by name or path, applying any expectation override.
    pub fn load(&self, session: &str, override_expect: Option<PathBuf>) -> Result<SessionRecording> {
        let path = self.resolve_session_path(session)?;
        let metadata = self.metadata_for_path(&path)?;
        let mut recording = SessionRecording::load(&path)?;

        if let Some(expect_path) = override_expect.or(metadata.expect_path) {
            recording.apply_expectation_file(&expect_path)?;
        }
        Ok(recording)
    }

    fn resolve_session_path(&self, session: &str) -> Result<PathBuf> {
        let as_path = Path::new(session);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }

        let candidate = self.root.join(format!("{session}.json"));
        if candidate.exists() {
            Ok(candidate)
        } else {
            Err(anyhow!(
                "Session '{session}' not found in {}",
                self.root.display()
            ))
        }
    }

    fn metadata_for_path(&self, path: &Path) -> Result<SessionMetadata> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("Invalid session name for {}", path.display()))?
            .to_string();
        let expect_path = path.with_file_name(format!("{name}{EXPECT_SUFFIX}"));
        Ok(SessionMetadata {
            name,
            path: path.to_path_buf(),
            expect_path: expect_path.exists().then_some(expect_path),
        })
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_FIXTURE_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(cycles: Vec<RecordedCycle>, expect: Vec<ExpectedState>) -> SessionRecording {
        SessionRecording {
            name: "unit".to_string(),
            notes: None,
            calibration: Vec::new(),
            cycles,
            expect,
        }
    }

    fn cycle(t: f64, theta_alpha: f64, quality: f64) -> RecordedCycle {
        RecordedCycle {
            t,
            quality,
            features: EegFeatures::from_ratios(theta_alpha, 1.0, 1.0),
        }
    }

    #[test]
    fn test_parse_recording_with_defaults() {
        let json = r#"{
            "name": "minimal",
            "cycles": [{"t": 0.5, "features": {"theta_alpha": [1.0]}}]
        }"#;
        let recording = SessionRecording::from_json(json).unwrap();
        assert_eq!(recording.cycles[0].quality, 1.0);
        assert!(recording.calibration.is_empty());
        assert!(recording.expect.is_empty());
    }

    #[test]
    fn test_rejects_decreasing_timestamps() {
        let json = r#"{
            "name": "backwards",
            "cycles": [
                {"t": 2.0, "features": {"theta_alpha": [1.0]}},
                {"t": 1.0, "features": {"theta_alpha": [1.0]}}
            ]
        }"#;
        let err = SessionRecording::from_json(json).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }

    #[test]
    fn test_rejects_out_of_range_timestamps() {
        let json = r#"{
            "name": "far_future",
            "cycles": [{"t": 1.0e19, "features": {"theta_alpha": [1.0]}}]
        }"#;
        let err = SessionRecording::from_json(json).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));

        let session = recording(vec![cycle(2.0, 1.0, 1.0), cycle(1.0e19, 1.0, 1.0)], Vec::new());
        assert!(SessionReplay::default().run(&session).is_err());
    }

    #[test]
    fn test_rejects_expectation_past_end() {
        let json = r#"{
            "name": "short",
            "cycles": [{"t": 0.0, "features": {"theta_alpha": [1.0]}}],
            "expect": [{"cycle": 3, "state": "normal"}]
        }"#;
        assert!(SessionRecording::from_json(json).is_err());
    }

    #[test]
    fn test_replay_uses_recorded_timestamps() {
        let session = recording(
            vec![cycle(2.0, 2.2, 1.0), cycle(3.0, 0.8, 1.0), cycle(7.0, 0.8, 1.0)],
            Vec::new(),
        );
        let report = SessionReplay::default().run(&session).unwrap();

        assert_eq!(report.cycle_count, 3);
        assert_eq!(report.cycles[0].result.state, StateLabel::Fatigue);
        // Still inside the 4 s fatigue hold
        assert_eq!(report.cycles[1].result.state, StateLabel::Fatigue);
        assert_eq!(report.telemetry.transitions, 1);
    }

    #[test]
    fn test_replay_calibrates_first() {
        let mut session = recording(vec![cycle(0.0, 2.0, 1.0)], Vec::new());
        session.calibration = vec![EegFeatures::from_ratios(2.0, 1.0, 1.0); 5];

        let report = SessionReplay::default().run(&session).unwrap();
        assert!(report.calibrated);
        assert_eq!(report.cycles[0].result.metrics.theta_alpha, 1.0);
    }

    #[test]
    fn test_verify_reports_mismatches() {
        let session = recording(
            vec![cycle(2.0, 2.2, 1.0), cycle(3.0, 1.0, 0.1)],
            vec![
                ExpectedState {
                    cycle: 0,
                    state: StateLabel::Fatigue,
                },
                ExpectedState {
                    cycle: 1,
                    state: StateLabel::Normal,
                },
            ],
        );
        let report = SessionReplay::default().run(&session).unwrap();

        let diff = session.verify(&report.cycles).unwrap_err();
        assert_eq!(
            diff.failures,
            vec![ExpectationFailure {
                cycle: 1,
                expected: StateLabel::Normal,
                actual: Some(StateLabel::Unknown),
            }]
        );
        let json = diff.to_json();
        assert_eq!(json["failures"][0]["actual"], "unknown");
    }

    #[test]
    fn test_default_catalog_lists_sessions() {
        let sessions = FixtureCatalog::default().discover().unwrap();
        assert!(sessions.iter().any(|s| s.name == "drowsy_drive"));
        assert!(sessions.iter().all(|s| !s.name.ends_with(".expect")));
    }
}
