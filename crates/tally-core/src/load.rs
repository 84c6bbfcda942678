//! CSV loading for household transaction files
//!
//! Columns are located by header name, so column order does not matter and
//! extra columns are ignored. Every cell is kept as text; empty cells become
//! missing values for the cleaning stage to deal with.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Column, RawRecord};

/// Load raw records from a CSV file on disk
pub fn load_file(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "{} (please ensure the file is in the correct directory)",
            path.display()
        )));
    }

    let file = File::open(path)?;
    let records = read_records(file)?;
    info!("Loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}

/// Parse raw records from any CSV source
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let index = resolve_columns(&headers)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let cell = |column: Column| -> Option<String> {
            index
                .get(&column)
                .and_then(|&i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        records.push(RawRecord {
            date: cell(Column::Date),
            mode: cell(Column::Mode),
            category: cell(Column::Category),
            subcategory: cell(Column::Subcategory),
            note: cell(Column::Note),
            amount: cell(Column::Amount),
            flow: cell(Column::Flow),
            currency: cell(Column::Currency),
        });
    }

    debug!("Parsed {} transaction rows", records.len());
    Ok(records)
}

/// Map each known column to its position in the header row
fn resolve_columns(headers: &StringRecord) -> Result<HashMap<Column, usize>> {
    let mut index = HashMap::new();

    for column in Column::all() {
        let wanted = column.header().to_lowercase();
        let position = headers
            .iter()
            .position(|h| h.trim().trim_start_matches('\u{feff}').to_lowercase() == wanted);

        match position {
            Some(i) => {
                index.insert(*column, i);
            }
            None if column.required() => {
                return Err(Error::InvalidData(format!(
                    "Unable to locate '{}' column",
                    column.header()
                )));
            }
            None => debug!("Optional column '{}' not present", column.header()),
        }
    }

    Ok(index)
}

/// Parse a date string with the given chrono formats, tried in order.
///
/// Date-only formats resolve to midnight. Returns `None` when no format matches.
pub fn parse_date<S: AsRef<str>>(s: &str, formats: &[S]) -> Option<NaiveDateTime> {
    let s = s.trim();

    for fmt in formats {
        let fmt = fmt.as_ref();
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Parse an amount string, handling currency symbols and commas.
///
/// Returns `None` for anything that is not a finite number.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', '₹', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
