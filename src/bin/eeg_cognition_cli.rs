use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use eeg_cognition::config::AnalyzerConfig;
use eeg_cognition::error::log_config_error;
use eeg_cognition::fixtures::{
    synthesize, ExpectationDiff, FixtureCatalog, Scenario, SessionReplay, SessionReport,
};

#[derive(Parser, Debug)]
#[command(
    name = "eeg_cognition_cli",
    about = "Deterministic session replay harness for the EEG cognitive-state classifier"
)]
struct Cli {
    /// Override directory containing session recordings (defaults to ./fixtures)
    #[arg(long)]
    fixtures_dir: Option<PathBuf>,
    /// Analyzer configuration JSON (defaults to the bundled assets/analyzer_config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded session and optionally compare against expectations
    Replay {
        #[arg(long)]
        session: String,
        #[arg(long)]
        expect: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate a synthetic session and stream one JSON result per cycle
    Simulate {
        #[arg(long, value_enum)]
        scenario: ScenarioArg,
        #[arg(long, default_value_t = 30)]
        cycles: usize,
        #[arg(long, default_value_t = 7)]
        seed: u64,
        #[arg(long, default_value_t = 1.0)]
        interval: f64,
    },
    /// Print the effective analyzer configuration
    DumpConfig,
    /// List available session recordings
    DumpFixtures,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScenarioArg {
    Fatigue,
    Stress,
    Focused,
    Relaxed,
    Noisy,
}

impl From<ScenarioArg> for Scenario {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::Fatigue => Scenario::Fatigue,
            ScenarioArg::Stress => Scenario::Stress,
            ScenarioArg::Focused => Scenario::Focused,
            ScenarioArg::Relaxed => Scenario::Relaxed,
            ScenarioArg::Noisy => Scenario::Noisy,
        }
    }
}

fn main() -> ExitCode {
    eeg_cognition::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let catalog = cli
        .fixtures_dir
        .map(FixtureCatalog::new)
        .unwrap_or_default();
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Replay {
            session,
            expect,
            output,
        } => run_replay(&catalog, config, &session, expect, output),
        Commands::Simulate {
            scenario,
            cycles,
            seed,
            interval,
        } => run_simulate(config, scenario.into(), cycles, seed, interval),
        Commands::DumpConfig => run_dump_config(&config),
        Commands::DumpFixtures => run_dump_fixtures(&catalog),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<AnalyzerConfig> {
    let config = match path {
        Some(path) => AnalyzerConfig::load_from_file(path),
        None => AnalyzerConfig::load(),
    };
    if let Err(err) = config.validate() {
        log_config_error(&err, "load_config");
        return Err(err).context("invalid analyzer configuration");
    }
    Ok(config)
}

fn run_replay(
    catalog: &FixtureCatalog,
    config: AnalyzerConfig,
    session: &str,
    override_expect: Option<PathBuf>,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let recording = catalog.load(session, override_expect)?;
    let report = SessionReplay::new(config)
        .run(&recording)
        .with_context(|| format!("replaying session {}", session))?;

    emit_report(&report, output_path)?;

    if recording.expect.is_empty() {
        return Ok(ExitCode::from(0));
    }
    match recording.verify(&report.cycles) {
        Ok(()) => Ok(ExitCode::from(0)),
        Err(diff) => {
            emit_diff(&diff)?;
            Ok(ExitCode::from(2))
        }
    }
}

fn run_simulate(
    config: AnalyzerConfig,
    scenario: Scenario,
    cycles: usize,
    seed: u64,
    interval: f64,
) -> Result<ExitCode> {
    let recording = synthesize(scenario, cycles, seed, interval);
    let report = SessionReplay::new(config)
        .run(&recording)
        .with_context(|| format!("simulating scenario {}", scenario.as_str()))?;

    for cycle in &report.cycles {
        println!("{}", serde_json::to_string(cycle)?);
    }
    Ok(ExitCode::from(0))
}

fn run_dump_config(config: &AnalyzerConfig) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(ExitCode::from(0))
}

fn run_dump_fixtures(catalog: &FixtureCatalog) -> Result<ExitCode> {
    let sessions = catalog.discover()?;
    if sessions.is_empty() {
        println!("No sessions found under {}", catalog.root().display());
        return Ok(ExitCode::from(0));
    }

    for metadata in sessions {
        if let Some(expect) = metadata.expect_path {
            println!("{} -> {}", metadata.name, expect.display());
        } else {
            println!("{}", metadata.name);
        }
    }
    Ok(ExitCode::from(0))
}

fn emit_report(report: &SessionReport, output_path: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn emit_diff(diff: &ExpectationDiff) -> Result<()> {
    let json = serde_json::to_string_pretty(&diff.to_json())?;
    eprintln!("{json}");
    Ok(())
}
