//! Tally Core Library
//!
//! Exploratory analysis of household transaction exports:
//! - CSV loading by header name and raw-data profiling
//! - Cleaning (date coercion, missing-value filling, amount imputation, dedup)
//! - Descriptive statistics, value counts and time-based aggregation
//! - Category correlation over monthly averages
//! - SVG chart rendering
//! - Cleaned-data export

pub mod analysis;
pub mod charts;
pub mod clean;
pub mod config;
pub mod error;
pub mod export;
pub mod load;
pub mod models;
pub mod profile;
pub mod stats;

pub use analysis::Analysis;
pub use charts::{render_all, truncate, ChartKind, RenderSummary};
pub use clean::clean;
pub use config::{AnalysisConfig, ChartOptions, CleaningOptions};
pub use error::{Error, Result};
pub use export::{export_cleaned, export_report_json, write_cleaned_csv};
pub use load::{load_file, read_records};
pub use models::*;
pub use profile::profile;
