//! Headless match runner.
//!
//! Runs a match without graphics and prints a JSON report, for CI
//! testing and balance work.
//!
//! # Usage
//!
//! ```bash
//! # Run the built-in default skirmish
//! cargo run -p skirmish_headless
//!
//! # Run a scenario file
//! cargo run -p skirmish_headless -- --scenario scenarios/rush.ron
//!
//! # Cap the run and write the report to a file
//! cargo run -p skirmish_headless -- --max-ticks 18000 --output report.json
//! ```
//!
//! Logs go to stderr; the JSON report goes to stdout (or `--output`).

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skirmish_headless::runner::MatchRunner;
use skirmish_headless::scenario::Scenario;

#[derive(Parser)]
#[command(name = "skirmish_headless")]
#[command(about = "Headless match runner for CI and balance testing")]
#[command(version)]
struct Cli {
    /// Scenario RON file; uses the built-in default skirmish if omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Maximum ticks before the run stops undecided
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Logging goes to stderr; stdout carries the report.
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    let scenario = match &cli.scenario {
        Some(path) => match Scenario::load(path) {
            Ok(scenario) => scenario,
            Err(e) => {
                tracing::error!(error = %e, "could not load scenario");
                std::process::exit(1);
            }
        },
        None => Scenario::default(),
    };

    let report = MatchRunner::new().run(&scenario, cli.max_ticks);

    let json = match serde_json::to_string_pretty(&report) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "could not serialize report");
            std::process::exit(1);
        }
    };
    match &cli.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &json) {
                tracing::error!(error = %e, path = %path.display(), "could not write report");
                std::process::exit(1);
            }
        }
        None => println!("{json}"),
    }
}
