//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tally_core::CountBy;

/// Tally - Explore household transaction exports
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Exploratory analysis of household transaction CSV exports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analysis config file (defaults to the user override, then built-in settings)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: profile, clean, report and render charts
    Analyze {
        /// Transactions CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Chart output directory (defaults to the configured chart_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip chart rendering
        #[arg(long)]
        no_charts: bool,

        /// Print the reports as JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Also save the full report as a JSON file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Profile the raw file: shape, missing values and a preview
    Profile {
        /// Transactions CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Number of preview rows
        #[arg(long, default_value = "5")]
        rows: usize,
    },

    /// Clean the file and write the result as CSV
    Clean {
        /// Transactions CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print a single report
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Render charts only
    Charts {
        /// Transactions CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Chart output directory (defaults to the configured chart_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Input options shared by every report
#[derive(Args)]
pub struct ReportInput {
    /// Transactions CSV file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Descriptive statistics of transaction amounts
    Summary {
        #[command(flatten)]
        input: ReportInput,
    },

    /// Transaction counts by a categorical column
    Counts {
        #[command(flatten)]
        input: ReportInput,

        /// Column to count: mode, category or flow
        #[arg(long, default_value = "category")]
        by: CountBy,

        /// Only show the most frequent values
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Total amount per month
    Monthly {
        #[command(flatten)]
        input: ReportInput,
    },

    /// Total amount per day
    Daily {
        #[command(flatten)]
        input: ReportInput,
    },

    /// Total amount per day of the week
    Weekday {
        #[command(flatten)]
        input: ReportInput,
    },

    /// Correlation of monthly average amounts between categories
    Correlation {
        #[command(flatten)]
        input: ReportInput,
    },
}
