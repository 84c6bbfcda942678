//! Dataset profiling: row counts, missing values and inferred column kinds

use crate::load::{parse_amount, parse_date};
use crate::models::{Column, ColumnKind, ColumnProfile, DatasetProfile, RawRecord};

/// Profile raw records, keeping the first `head_rows` rows as a preview
pub fn profile<S: AsRef<str>>(
    records: &[RawRecord],
    head_rows: usize,
    date_formats: &[S],
) -> DatasetProfile {
    let columns = Column::all()
        .iter()
        .map(|&column| {
            let present: Vec<&str> = records.iter().filter_map(|r| r.get(column)).collect();
            ColumnProfile {
                column,
                non_missing: present.len(),
                missing: records.len() - present.len(),
                kind: infer_kind(&present, date_formats),
            }
        })
        .collect();

    DatasetProfile {
        rows: records.len(),
        columns,
        head: records.iter().take(head_rows).cloned().collect(),
    }
}

/// A column is numeric (or a date) only if every present value parses
fn infer_kind<S: AsRef<str>>(values: &[&str], date_formats: &[S]) -> ColumnKind {
    if values.is_empty() {
        return ColumnKind::Text;
    }
    if values.iter().all(|v| parse_amount(v).is_some()) {
        ColumnKind::Number
    } else if values.iter().all(|v| parse_date(v, date_formats).is_some()) {
        ColumnKind::Date
    } else {
        ColumnKind::Text
    }
}
