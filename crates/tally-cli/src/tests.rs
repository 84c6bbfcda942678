//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tally_core::{AnalysisConfig, ChartKind, CountBy};

use crate::cli::{Cli, Commands, ReportType};
use crate::commands::{self, truncate};

const SAMPLE_CSV: &str = "Date,Mode,Category,Subcategory,Note,Amount,Income/Expense,Currency
20/09/2018 12:04:08,Cash,Transportation,Train,2 Place 5 to Place 0,30,Expense,INR
20/09/2018 12:03:15,Cash,Food,snacks,Idli medu Vada mix 2 plates,60,Expense,INR
20/09/2018 12:03:15,Cash,Food,snacks,Idli medu Vada mix 2 plates,60,Expense,INR
17/09/2018 23:41:17,Saving Bank account 1,Salary,,,50000,Income,INR
15/10/2018 08:30:00,Credit Card,Food,Dinner,Pizza,450,Expense,INR
14/10/2018,Cash,Transportation,auto,Office,abc,Expense,INR
13/10/2018,Saving Bank account 1,Salary,,October,50000,Income,INR
";

fn write_sample(dir: &Path) -> PathBuf {
    let path = dir.join("transactions.csv");
    fs::write(&path, SAMPLE_CSV).unwrap();
    path
}

// ========== Pipeline Helper Tests ==========

#[test]
fn test_load_config_defaults() {
    let config = commands::load_config(None);
    assert!(config.is_ok());
}

#[test]
fn test_load_config_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analysis.toml");
    fs::write(&path, "[charts]\ntop_categories = 3\n").unwrap();

    let config = commands::load_config(Some(path.as_path())).unwrap();
    assert_eq!(config.charts.top_categories, 3);
}

#[test]
fn test_load_config_missing_path_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = commands::load_config(Some(dir.path().join("missing.toml").as_path()));
    assert!(result.is_err());
}

#[test]
fn test_load_transactions() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());

    let (transactions, report) =
        commands::load_transactions(&AnalysisConfig::default(), &path).unwrap();
    assert_eq!(transactions.len(), 6);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.amounts_imputed, 1);
}

#[test]
fn test_load_transactions_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result =
        commands::load_transactions(&AnalysisConfig::default(), &dir.path().join("nope.csv"));
    assert!(result.is_err());
}

// ========== Data Command Tests ==========

#[test]
fn test_cmd_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let result = commands::cmd_profile(&AnalysisConfig::default(), &path, 3);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_clean_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let output = dir.path().join("cleaned.csv");

    let result = commands::cmd_clean(&AnalysisConfig::default(), &path, &output);
    assert!(result.is_ok());

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 7);
    assert!(content.contains("Unknown,No Note"));
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_reports() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let config = AnalysisConfig::default();

    for json in [false, true] {
        assert!(commands::cmd_report_summary(&config, &path, json).is_ok());
        assert!(commands::cmd_report_counts(&config, &path, CountBy::Mode, None, json).is_ok());
        assert!(
            commands::cmd_report_counts(&config, &path, CountBy::Category, Some(2), json).is_ok()
        );
        assert!(commands::cmd_report_monthly(&config, &path, json).is_ok());
        assert!(commands::cmd_report_daily(&config, &path, json).is_ok());
        assert!(commands::cmd_report_weekday(&config, &path, json).is_ok());
        assert!(commands::cmd_report_correlation(&config, &path, json).is_ok());
    }
}

// ========== Analyze Command Tests ==========

#[test]
fn test_cmd_analyze_renders_charts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let charts = dir.path().join("charts");

    let result = commands::cmd_analyze(
        &AnalysisConfig::default(),
        &path,
        Some(charts.as_path()),
        None,
        false,
        false,
    );
    assert!(result.is_ok());
    assert!(charts
        .join(ChartKind::AmountDistribution.file_name())
        .exists());
    assert!(charts.join(ChartKind::MonthlyTotals.file_name()).exists());
}

#[test]
fn test_cmd_analyze_no_charts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let charts = dir.path().join("charts");
    let report = dir.path().join("report.json");

    let result = commands::cmd_analyze(
        &AnalysisConfig::default(),
        &path,
        Some(charts.as_path()),
        Some(report.as_path()),
        true,
        true,
    );
    assert!(result.is_ok());
    assert!(!charts.exists());
    assert!(fs::read_to_string(&report)
        .unwrap()
        .contains("\"transaction_count\": 6"));
}

#[test]
fn test_cmd_charts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample(dir.path());
    let charts = dir.path().join("out");

    let result = commands::cmd_charts(&AnalysisConfig::default(), &path, Some(charts.as_path()));
    assert!(result.is_ok());
    assert!(charts.join(ChartKind::WeekdayTotals.file_name()).exists());
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_report_counts() {
    let cli = Cli::try_parse_from([
        "tally", "report", "counts", "-f", "data.csv", "--by", "mode", "--limit", "3", "--json",
    ])
    .unwrap();

    match cli.command {
        Commands::Report {
            report_type: ReportType::Counts { input, by, limit },
        } => {
            assert_eq!(input.file, PathBuf::from("data.csv"));
            assert!(input.json);
            assert_eq!(by, CountBy::Mode);
            assert_eq!(limit, Some(3));
        }
        _ => panic!("expected report counts"),
    }
}

#[test]
fn test_parse_rejects_unknown_count_column() {
    let result = Cli::try_parse_from([
        "tally", "report", "counts", "-f", "data.csv", "--by", "merchant",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_global_flags() {
    let cli = Cli::try_parse_from([
        "tally",
        "analyze",
        "-f",
        "data.csv",
        "--no-charts",
        "--config",
        "custom.toml",
        "-v",
    ])
    .unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    assert!(matches!(
        cli.command,
        Commands::Analyze {
            no_charts: true,
            json: false,
            ..
        }
    ));
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Food", 10), "Food");
    assert_eq!(truncate("Transportation", 10), "Transpo...");
    assert_eq!(truncate("Saving Bank account 1", 8), "Savin...");
}
