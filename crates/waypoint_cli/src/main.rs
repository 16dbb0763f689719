//! Waypoint CLI
//!
//! Replay scripted scroll scenarios against a headless document and print
//! the enter/progress/exit callbacks a scroll trigger raises.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod report;
mod runner;
mod scenario;

use report::{Format, Summary};
use scenario::Scenario;

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scroll trigger scenario runner", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print every callback
    Run {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Validate a scenario without running it
    Check {
        /// Scenario file (TOML)
        scenario: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run { scenario, format } => cmd_run(&scenario, format),
        Commands::Check { scenario } => cmd_check(&scenario),
    }
}

fn cmd_run(path: &Path, format: Format) -> Result<()> {
    let scenario = Scenario::load(path)?;
    scenario.validate()?;

    info!("Running {} ({} steps)", path.display(), scenario.steps.len());
    let records = runner::run(&scenario)?;

    let stdout = io::stdout();
    report::write_records(&mut stdout.lock(), &records, format)?;

    let summary = Summary::from_records(&records);
    info!(
        "{} enter, {} progress, {} exit",
        summary.enters, summary.progresses, summary.exits
    );
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    scenario.validate()?;

    info!(
        "{} is valid: {} container(s), {} step(s)",
        path.display(),
        scenario.containers.len(),
        scenario.steps.len()
    );
    Ok(())
}
