//! Cleaning: date coercion, missing-value filling, amount imputation and
//! deduplication of exact duplicate rows

use std::collections::HashSet;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::CleaningOptions;
use crate::error::{Error, Result};
use crate::load::{parse_amount, parse_date};
use crate::models::{CleaningReport, RawRecord, Transaction};

/// Clean raw records into transactions
pub fn clean(
    records: &[RawRecord],
    options: &CleaningOptions,
) -> Result<(Vec<Transaction>, CleaningReport)> {
    let mut report = CleaningReport {
        rows_in: records.len(),
        ..Default::default()
    };

    // Amounts are coerced first so the imputation mean is known up front
    let amounts: Vec<Option<f64>> = records
        .iter()
        .map(|r| r.amount.as_deref().and_then(parse_amount))
        .collect();
    let valid: Vec<f64> = amounts.iter().flatten().copied().collect();
    let missing_amounts = amounts.len() - valid.len();

    let fill_amount = if missing_amounts > 0 {
        if valid.is_empty() {
            return Err(Error::InvalidData(
                "Amount column has no numeric values".into(),
            ));
        }
        let mean = valid.iter().sum::<f64>() / valid.len() as f64;
        info!(
            "Filled {} missing/non-numeric amounts with mean: {:.2}",
            missing_amounts, mean
        );
        report.amounts_imputed = missing_amounts;
        report.imputed_mean = Some(mean);
        mean
    } else {
        0.0
    };

    let mut transactions = Vec::with_capacity(records.len());
    for (record, amount) in records.iter().zip(amounts) {
        let date = match record.date.as_deref() {
            Some(raw) => {
                let parsed = parse_date(raw, &options.date_formats);
                if parsed.is_none() {
                    debug!("Unparseable date: {}", raw);
                    report.dates_unparsed += 1;
                }
                parsed
            }
            None => {
                report.dates_missing += 1;
                None
            }
        };

        let subcategory = record.subcategory.clone().unwrap_or_else(|| {
            report.subcategory_filled += 1;
            options.subcategory_fill.clone()
        });
        let note = record.note.clone().unwrap_or_else(|| {
            report.note_filled += 1;
            options.note_fill.clone()
        });

        transactions.push(Transaction {
            date,
            mode: record.mode.clone(),
            category: record.category.clone(),
            subcategory,
            note,
            amount: amount.unwrap_or(fill_amount),
            flow: record.flow.clone(),
            currency: record.currency.clone(),
        });
    }

    if report.dates_unparsed > 0 {
        warn!("{} dates could not be parsed", report.dates_unparsed);
    }
    debug!(
        "Filled {} subcategories and {} notes",
        report.subcategory_filled, report.note_filled
    );

    let transactions = drop_duplicates(transactions);
    report.rows_out = transactions.len();
    report.duplicates_removed = report.rows_in - report.rows_out;
    info!("Removed {} duplicate rows", report.duplicates_removed);

    Ok((transactions, report))
}

/// Remove exact duplicates, keeping the first occurrence
pub fn drop_duplicates(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    transactions
        .into_iter()
        .filter(|tx| seen.insert(fingerprint(tx)))
        .collect()
}

/// SHA-256 over every field of a cleaned row
pub fn fingerprint(tx: &Transaction) -> String {
    fn field(hasher: &mut Sha256, value: Option<&str>) {
        match value {
            Some(v) => {
                hasher.update([1u8]);
                hasher.update((v.len() as u64).to_be_bytes());
                hasher.update(v.as_bytes());
            }
            None => hasher.update([0u8]),
        }
    }

    let mut hasher = Sha256::new();
    let date = tx.date.map(|d| d.to_string());
    field(&mut hasher, date.as_deref());
    field(&mut hasher, tx.mode.as_deref());
    field(&mut hasher, tx.category.as_deref());
    field(&mut hasher, Some(&tx.subcategory));
    field(&mut hasher, Some(&tx.note));
    // -0.0 and 0.0 compare equal, so they must hash alike
    let amount = if tx.amount == 0.0 { 0.0 } else { tx.amount };
    hasher.update(amount.to_be_bytes());
    field(&mut hasher, tx.flow.as_deref());
    field(&mut hasher, tx.currency.as_deref());
    hex::encode(hasher.finalize())
}
