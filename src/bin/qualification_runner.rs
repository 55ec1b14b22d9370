//! Qualification runner CLI
//!
//! Runs one qualification batch described by a configuration file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use qualification::{QualificationRunner, RunMode, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "qualification-runner")]
#[command(about = "Export simulations, observed data and the report mapping of a project snapshot")]
struct Cli {
    /// Path to the qualification configuration (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Only check configuration, snapshot and building-block swaps
    #[arg(long)]
    validate: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = qualification::logging::init(&cli.log_level) {
        eprintln!("error: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let options = RunOptions {
        configuration_file: cli.config,
        validate: cli.validate,
    };

    match QualificationRunner::default().run_batch(&options) {
        Ok(report) => {
            match report.mode {
                RunMode::Validate => info!("Configuration is valid for project '{}'", report.project_name),
                RunMode::Export => info!(
                    "Project '{}' exported: {} simulation(s), {} observed data, {} plot(s)",
                    report.project_name,
                    report.exported_simulations,
                    report.exported_observed_data,
                    report.plots
                ),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Qualification run failed: {e}");
            ExitCode::FAILURE
        }
    }
}
