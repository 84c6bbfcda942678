//! Shared utilities for commands
//!
//! This module contains:
//! - `load_config` - Resolve the analysis config from `--config` or defaults
//! - `load_transactions` - Load and clean a transactions file
//! - `print_json` - Pretty-print a JSON report

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tally_core::{clean, load_file, AnalysisConfig, CleaningReport, Transaction};

/// Explicit config path, or the user override with built-in fallback
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            AnalysisConfig::from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => AnalysisConfig::load().context("Failed to load analysis config"),
    }
}

/// Load a CSV file and run the cleaning stage over it
pub fn load_transactions(
    config: &AnalysisConfig,
    file: &Path,
) -> Result<(Vec<Transaction>, CleaningReport)> {
    let records =
        load_file(file).with_context(|| format!("Failed to load {}", file.display()))?;
    clean(&records, &config.cleaning).context("Failed to clean transactions")
}

pub fn print_json(value: Value) -> Result<()> {
    let json = serde_json::to_string_pretty(&value).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}
