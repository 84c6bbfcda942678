//! Profile and clean command implementations

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{
    export_cleaned, load_file, profile, AnalysisConfig, CleaningReport, DatasetProfile,
};

use super::{load_transactions, truncate};

pub fn cmd_profile(config: &AnalysisConfig, file: &Path, rows: usize) -> Result<()> {
    let records = load_file(file).with_context(|| format!("Failed to load {}", file.display()))?;
    let profile = profile(&records, rows, &config.cleaning.date_formats);
    print_profile(&profile);
    Ok(())
}

pub fn cmd_clean(config: &AnalysisConfig, file: &Path, output: &Path) -> Result<()> {
    let (transactions, report) = load_transactions(config, file)?;
    print_cleaning(&report);

    export_cleaned(output, &transactions)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!();
    println!(
        "✅ Wrote {} cleaned transactions to {}",
        transactions.len(),
        output.display()
    );
    Ok(())
}

pub fn print_profile(profile: &DatasetProfile) {
    println!();
    println!("📋 Dataset Profile");
    println!(
        "   Rows: {}   Columns: {}",
        profile.rows,
        profile.columns.len()
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:16} │ {:>8} │ {:>7} │ {:6}",
        "Column", "Non-null", "Missing", "Kind"
    );
    println!("   ─────────────────┼──────────┼─────────┼───────");
    for column in &profile.columns {
        println!(
            "   {:16} │ {:>8} │ {:>7} │ {:6}",
            column.column.header(),
            column.non_missing,
            column.missing,
            column.kind.as_str()
        );
    }

    if profile.head.is_empty() {
        return;
    }

    println!();
    println!("   First {} rows:", profile.head.len());
    println!(
        "   {:19} │ {:16} │ {:16} │ {:>10} │ {:8}",
        "Date", "Mode", "Category", "Amount", "Type"
    );
    println!("   ────────────────────┼──────────────────┼──────────────────┼────────────┼─────────");
    for record in &profile.head {
        let cell = |v: &Option<String>, max: usize| truncate(v.as_deref().unwrap_or("-"), max);
        println!(
            "   {:19} │ {:16} │ {:16} │ {:>10} │ {:8}",
            cell(&record.date, 19),
            cell(&record.mode, 16),
            cell(&record.category, 16),
            cell(&record.amount, 10),
            cell(&record.flow, 8)
        );
    }
}

pub fn print_cleaning(report: &CleaningReport) {
    println!();
    println!("🧹 Cleaning");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Rows in:              {}", report.rows_in);
    println!(
        "   Dates unparseable:    {} (missing: {})",
        report.dates_unparsed, report.dates_missing
    );
    println!(
        "   Filled subcategories: {} (notes: {})",
        report.subcategory_filled, report.note_filled
    );
    match report.imputed_mean {
        Some(mean) => println!(
            "   Imputed amounts:      {} (mean {:.2})",
            report.amounts_imputed, mean
        ),
        None => println!("   Imputed amounts:      0"),
    }
    println!("   Duplicates removed:   {}", report.duplicates_removed);
    println!("   Rows out:             {}", report.rows_out);
}
