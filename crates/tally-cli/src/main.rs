//! Tally CLI - Household transaction analysis
//!
//! Usage:
//!   tally analyze --file CSV            Profile, clean, report and chart
//!   tally profile --file CSV            Inspect the raw file
//!   tally clean --file CSV --output OUT Write the cleaned dataset
//!   tally report summary --file CSV     Print a single report
//!   tally charts --file CSV             Render charts only

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            file,
            output,
            no_charts,
            json,
            report,
        } => commands::cmd_analyze(
            &config,
            &file,
            output.as_deref(),
            report.as_deref(),
            no_charts,
            json,
        ),
        Commands::Profile { file, rows } => commands::cmd_profile(&config, &file, rows),
        Commands::Clean { file, output } => commands::cmd_clean(&config, &file, &output),
        Commands::Report { report_type } => match report_type {
            ReportType::Summary { input } => {
                commands::cmd_report_summary(&config, &input.file, input.json)
            }
            ReportType::Counts { input, by, limit } => {
                commands::cmd_report_counts(&config, &input.file, by, limit, input.json)
            }
            ReportType::Monthly { input } => {
                commands::cmd_report_monthly(&config, &input.file, input.json)
            }
            ReportType::Daily { input } => {
                commands::cmd_report_daily(&config, &input.file, input.json)
            }
            ReportType::Weekday { input } => {
                commands::cmd_report_weekday(&config, &input.file, input.json)
            }
            ReportType::Correlation { input } => {
                commands::cmd_report_correlation(&config, &input.file, input.json)
            }
        },
        Commands::Charts { file, output } => {
            commands::cmd_charts(&config, &file, output.as_deref())
        }
    }
}
