//! Export of the cleaned dataset and of analysis reports
//!
//! Cleaned rows keep the source column names and add the derived `YearMonth`
//! and `DayOfWeek` columns so the file can be reloaded for further analysis.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::models::{AnalysisReport, Transaction};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One exported row
#[derive(Debug, Serialize)]
struct CleanedRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Mode")]
    mode: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Subcategory")]
    subcategory: &'a str,
    #[serde(rename = "Note")]
    note: &'a str,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Income/Expense")]
    flow: &'a str,
    #[serde(rename = "Currency")]
    currency: &'a str,
    #[serde(rename = "YearMonth")]
    year_month: String,
    #[serde(rename = "DayOfWeek")]
    day_of_week: &'a str,
}

impl<'a> From<&'a Transaction> for CleanedRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            date: tx
                .date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            mode: tx.mode.as_deref().unwrap_or(""),
            category: tx.category.as_deref().unwrap_or(""),
            subcategory: &tx.subcategory,
            note: &tx.note,
            amount: tx.amount,
            flow: tx.flow.as_deref().unwrap_or(""),
            currency: tx.currency.as_deref().unwrap_or(""),
            year_month: tx.year_month().unwrap_or_default(),
            day_of_week: tx.day_of_week().unwrap_or(""),
        }
    }
}

/// Write cleaned transactions as CSV with a header row
pub fn write_cleaned_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for tx in transactions {
        wtr.serialize(CleanedRow::from(tx))?;
    }
    // An empty dataset still gets its header
    if transactions.is_empty() {
        wtr.write_record(HEADERS)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write cleaned transactions to a CSV file
pub fn export_cleaned(path: &Path, transactions: &[Transaction]) -> Result<()> {
    let file = File::create(path)?;
    write_cleaned_csv(file, transactions)?;
    info!(
        "Exported {} cleaned transactions to {}",
        transactions.len(),
        path.display()
    );
    Ok(())
}

/// Write an analysis report as pretty-printed JSON
pub fn export_report_json(path: &Path, report: &AnalysisReport) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    info!("Saved analysis report to {}", path.display());
    Ok(())
}

const HEADERS: [&str; 10] = [
    "Date",
    "Mode",
    "Category",
    "Subcategory",
    "Note",
    "Amount",
    "Income/Expense",
    "Currency",
    "YearMonth",
    "DayOfWeek",
];
