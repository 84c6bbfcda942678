//! Report command implementations

use std::path::Path;

use anyhow::Result;
use serde_json::json;
use tally_core::{
    Analysis, AnalysisConfig, CorrelationOutcome, CountBy, SummaryStats, TrendDataPoint,
    ValueCount, WeekdaySummary,
};

use super::{load_transactions, print_json, truncate};

pub fn cmd_report_summary(config: &AnalysisConfig, file: &Path, json: bool) -> Result<()> {
    let (transactions, _) = load_transactions(config, file)?;
    let summary = Analysis::new(&transactions, &config.charts).amount_summary();

    if json {
        return print_json(json!(summary));
    }
    print_summary(summary.as_ref(), &config.charts.currency_label);
    Ok(())
}

pub fn cmd_report_counts(
    config: &AnalysisConfig,
    file: &Path,
    by: CountBy,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let (transactions, _) = load_transactions(config, file)?;
    let analysis = Analysis::new(&transactions, &config.charts);
    let counts = match limit {
        Some(limit) => analysis.top_counts(by, limit),
        None => analysis.counts(by),
    };

    if json {
        return print_json(json!(counts));
    }
    print_counts(by.title(), &counts, transactions.len());
    Ok(())
}

pub fn cmd_report_monthly(config: &AnalysisConfig, file: &Path, json: bool) -> Result<()> {
    let (transactions, _) = load_transactions(config, file)?;
    let totals = Analysis::new(&transactions, &config.charts).monthly_totals();

    if json {
        return print_json(json!(totals));
    }
    print_trend("Monthly Totals", "Month", &totals);
    Ok(())
}

pub fn cmd_report_daily(config: &AnalysisConfig, file: &Path, json: bool) -> Result<()> {
    let (transactions, _) = load_transactions(config, file)?;
    let totals = Analysis::new(&transactions, &config.charts).daily_totals();

    if json {
        return print_json(json!(totals));
    }
    print_trend("Daily Totals", "Date", &totals);
    Ok(())
}

pub fn cmd_report_weekday(config: &AnalysisConfig, file: &Path, json: bool) -> Result<()> {
    let (transactions, _) = load_transactions(config, file)?;
    let summary = Analysis::new(&transactions, &config.charts).weekday_summary();

    if json {
        return print_json(json!(summary));
    }
    print_weekdays(&summary);
    Ok(())
}

pub fn cmd_report_correlation(config: &AnalysisConfig, file: &Path, json: bool) -> Result<()> {
    let (transactions, _) = load_transactions(config, file)?;
    let outcome = Analysis::new(&transactions, &config.charts).category_correlation();

    if json {
        return print_json(json!(outcome));
    }
    print_correlation(&outcome);
    Ok(())
}

pub fn print_summary(summary: Option<&SummaryStats>, currency: &str) {
    println!();
    println!("📊 Amount Summary ({})", currency);
    println!("   ─────────────────────────────────────────────────────────────");

    let Some(s) = summary else {
        println!("   No transactions found.");
        return;
    };

    let std = s
        .std
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "n/a".to_string());
    println!("   {:8} {:>14}", "count", s.count);
    println!("   {:8} {:>14.2}", "mean", s.mean);
    println!("   {:8} {:>14}", "std", std);
    println!("   {:8} {:>14.2}", "min", s.min);
    println!("   {:8} {:>14.2}", "25%", s.p25);
    println!("   {:8} {:>14.2}", "50%", s.p50);
    println!("   {:8} {:>14.2}", "75%", s.p75);
    println!("   {:8} {:>14.2}", "max", s.max);
}

pub fn print_counts(title: &str, counts: &[ValueCount], total: usize) {
    println!();
    println!("🏷️  Transactions by {}", title);
    println!("   ─────────────────────────────────────────────────────────────");

    if counts.is_empty() {
        println!("   No values found.");
        return;
    }

    println!("   {:30} │ {:>7} │ {:>6}", "Value", "Count", "%");
    println!("   ───────────────────────────────┼─────────┼────────");
    for c in counts {
        let pct = if total > 0 {
            c.count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        println!(
            "   {:30} │ {:>7} │ {:>5.1}%",
            truncate(&c.value, 30),
            c.count,
            pct
        );
    }
}

pub fn print_trend(title: &str, period_label: &str, points: &[TrendDataPoint]) {
    println!();
    println!("📈 {}", title);
    println!("   ─────────────────────────────────────────────────────────────");

    if points.is_empty() {
        println!("   No dated transactions found.");
        return;
    }

    println!("   {:10} │ {:>14} │ {:>6}", period_label, "Amount", "Count");
    println!("   ───────────┼────────────────┼───────");
    for p in points {
        println!(
            "   {:10} │ {:>14.2} │ {:>6}",
            p.period, p.amount, p.transaction_count
        );
    }

    let total: f64 = points.iter().map(|p| p.amount).sum();
    println!("   ───────────┼────────────────┼───────");
    println!(
        "   {:10} │ {:>14.2} │ {:>6}",
        "Total",
        total,
        points.iter().map(|p| p.transaction_count).sum::<usize>()
    );
}

pub fn print_weekdays(summary: &[WeekdaySummary]) {
    println!();
    println!("📅 Totals by Day of Week");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:10} │ {:>14} │ {:>6}", "Day", "Amount", "Count");
    println!("   ───────────┼────────────────┼───────");
    for d in summary {
        println!(
            "   {:10} │ {:>14.2} │ {:>6}",
            d.weekday, d.amount, d.transaction_count
        );
    }
}

pub fn print_correlation(outcome: &CorrelationOutcome) {
    println!();
    println!("🔗 Category Correlation (monthly average amounts)");
    println!("   ─────────────────────────────────────────────────────────────");

    let matrix = match outcome {
        CorrelationOutcome::Matrix(matrix) => matrix,
        CorrelationOutcome::Insufficient { reason } => {
            println!("   Not enough data: {}", reason);
            return;
        }
    };

    println!(
        "   {} months × {} categories",
        matrix.months.len(),
        matrix.categories.len()
    );
    println!();

    let mut header = format!("   {:14}", "");
    for category in &matrix.categories {
        header.push_str(&format!(" {:>8}", truncate(category, 8)));
    }
    println!("{}", header);

    for (category, row) in matrix.categories.iter().zip(&matrix.values) {
        let mut line = format!("   {:14}", truncate(category, 14));
        for value in row {
            match value {
                Some(v) => line.push_str(&format!(" {:>8.2}", v)),
                None => line.push_str(&format!(" {:>8}", "n/a")),
            }
        }
        println!("{}", line);
    }
}
