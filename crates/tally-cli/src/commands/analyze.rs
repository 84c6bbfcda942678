//! Full analysis and chart command implementations

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;
use tally_core::{
    clean, export_report_json, load_file, profile, render_all, Analysis, AnalysisConfig,
    AnalysisReport, ChartOptions, CountBy,
};

use super::{
    load_transactions, print_cleaning, print_correlation, print_counts, print_json,
    print_profile, print_summary, print_trend, print_weekdays,
};

pub fn cmd_analyze(
    config: &AnalysisConfig,
    file: &Path,
    output: Option<&Path>,
    report_path: Option<&Path>,
    no_charts: bool,
    json: bool,
) -> Result<()> {
    let records = load_file(file).with_context(|| format!("Failed to load {}", file.display()))?;
    let raw = profile(&records, 5, &config.cleaning.date_formats);
    let (transactions, cleaning) =
        clean(&records, &config.cleaning).context("Failed to clean transactions")?;
    let report = Analysis::new(&transactions, &config.charts).run();

    if json {
        print_json(json!({
            "profile": raw,
            "cleaning": cleaning,
            "analysis": report,
        }))?;
    } else {
        print_profile(&raw);
        print_cleaning(&cleaning);
        print_report(&report, &config.charts);
    }

    if let Some(path) = report_path {
        export_report_json(path, &report)
            .with_context(|| format!("Failed to save report to {}", path.display()))?;
        if !json {
            println!();
            println!("💾 Report saved to {}", path.display());
        }
    }

    if no_charts {
        return Ok(());
    }
    let dir = output.unwrap_or(config.chart_dir.as_path());
    render_charts(&report, dir, &config.charts, !json)
}

pub fn cmd_charts(config: &AnalysisConfig, file: &Path, output: Option<&Path>) -> Result<()> {
    let (transactions, _) = load_transactions(config, file)?;
    let report = Analysis::new(&transactions, &config.charts).run();
    let dir = output.unwrap_or(config.chart_dir.as_path());
    render_charts(&report, dir, &config.charts, true)
}

fn print_report(report: &AnalysisReport, options: &ChartOptions) {
    let total = report.transaction_count;

    print_summary(report.amount_summary.as_ref(), &options.currency_label);
    print_counts(CountBy::Mode.title(), &report.mode_counts, total);
    print_counts(
        &format!("{} (top {})", CountBy::Category.title(), options.top_categories),
        &report.category_counts,
        total,
    );
    print_counts(CountBy::Flow.title(), &report.flow_counts, total);
    print_trend("Monthly Totals", "Month", &report.monthly_totals);
    println!(
        "   {} distinct days with transactions",
        report.daily_totals.len()
    );
    print_weekdays(&report.weekday_summary);
    print_correlation(&report.category_correlation);
}

fn render_charts(
    report: &AnalysisReport,
    dir: &Path,
    options: &ChartOptions,
    print_paths: bool,
) -> Result<()> {
    let summary = render_all(report, dir, options)
        .with_context(|| format!("Failed to render charts into {}", dir.display()))?;

    if print_paths {
        println!();
        println!("🖼️  Charts written to {}", dir.display());
        for path in &summary.written {
            let name = path.file_name().unwrap_or(path.as_os_str());
            println!("   {}", name.to_string_lossy());
        }
        for (kind, reason) in &summary.skipped {
            println!("   ⚠️  Skipped {}: {}", kind.file_name(), reason);
        }
    }
    Ok(())
}
