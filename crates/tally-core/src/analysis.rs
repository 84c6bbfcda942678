//! Exploratory analysis over cleaned transactions
//!
//! Every report here is computed in memory from the cleaned rows:
//! - Amount summary statistics and distribution
//! - Counts by payment mode, category and Income/Expense flag
//! - Amount spread per top category and per flag
//! - Monthly, daily and weekday totals
//! - Correlation of monthly mean amounts between categories

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::config::ChartOptions;
use crate::models::{
    AmountHistogram, AnalysisReport, BoxStats, CorrelationMatrix, CorrelationOutcome, CountBy,
    SummaryStats, Transaction, TrendDataPoint, ValueCount, WeekdaySummary, weekday_name,
};
use crate::stats;

/// Runs the analyses over a borrowed set of cleaned transactions
pub struct Analysis<'a> {
    transactions: &'a [Transaction],
    options: &'a ChartOptions,
}

impl<'a> Analysis<'a> {
    pub fn new(transactions: &'a [Transaction], options: &'a ChartOptions) -> Self {
        Self {
            transactions,
            options,
        }
    }

    /// Compute every report
    pub fn run(&self) -> AnalysisReport {
        let category_counts = self.top_counts(CountBy::Category, self.options.top_categories);
        let report = AnalysisReport {
            transaction_count: self.transactions.len(),
            amount_summary: self.amount_summary(),
            amount_histogram: self.amount_histogram(),
            mode_counts: self.counts(CountBy::Mode),
            category_counts,
            flow_counts: self.counts(CountBy::Flow),
            category_boxes: self.top_boxes(CountBy::Category, self.options.box_plot_categories),
            flow_boxes: self.boxes(CountBy::Flow),
            monthly_totals: self.monthly_totals(),
            daily_totals: self.daily_totals(),
            weekday_summary: self.weekday_summary(),
            category_correlation: self.category_correlation(),
        };
        debug!(
            "Analysis complete: {} transactions, {} months, {} days",
            report.transaction_count,
            report.monthly_totals.len(),
            report.daily_totals.len()
        );
        report
    }

    fn amounts(&self) -> Vec<f64> {
        self.transactions.iter().map(|t| t.amount).collect()
    }

    pub fn amount_summary(&self) -> Option<SummaryStats> {
        stats::describe(&self.amounts())
    }

    /// Histogram with a KDE overlay scaled to bin counts
    pub fn amount_histogram(&self) -> AmountHistogram {
        let amounts = self.amounts();
        let bins = stats::histogram(&amounts, self.options.histogram_bins);
        let kde = match bins.first() {
            Some(bin) => {
                let scale = amounts.len() as f64 * (bin.end - bin.start);
                stats::kde_curve(&amounts, self.options.kde_points, scale)
            }
            None => Vec::new(),
        };
        AmountHistogram { bins, kde }
    }

    /// Transaction counts for every value of a column, most frequent first
    pub fn counts(&self, by: CountBy) -> Vec<ValueCount> {
        stats::value_counts(self.transactions.iter().map(|t| t.label(by)))
    }

    pub fn top_counts(&self, by: CountBy, limit: usize) -> Vec<ValueCount> {
        let mut counts = self.counts(by);
        counts.truncate(limit);
        counts
    }

    /// Amount box stats for each value of a column, in count order
    pub fn boxes(&self, by: CountBy) -> Vec<BoxStats> {
        self.boxes_for(by, &self.counts(by))
    }

    /// Amount box stats for the `limit` most frequent values of a column
    pub fn top_boxes(&self, by: CountBy, limit: usize) -> Vec<BoxStats> {
        self.boxes_for(by, &self.top_counts(by, limit))
    }

    fn boxes_for(&self, by: CountBy, groups: &[ValueCount]) -> Vec<BoxStats> {
        groups
            .iter()
            .filter_map(|group| {
                let values: Vec<f64> = self
                    .transactions
                    .iter()
                    .filter(|t| t.label(by) == Some(group.value.as_str()))
                    .map(|t| t.amount)
                    .collect();
                stats::box_stats(&group.value, &values)
            })
            .collect()
    }

    /// Total amount per calendar month, oldest first
    pub fn monthly_totals(&self) -> Vec<TrendDataPoint> {
        let mut months: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for t in self.transactions {
            if let Some(month) = t.year_month() {
                let entry = months.entry(month).or_default();
                entry.0 += t.amount;
                entry.1 += 1;
            }
        }
        to_trend(months)
    }

    /// Total amount per calendar day, oldest first
    pub fn daily_totals(&self) -> Vec<TrendDataPoint> {
        let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for t in self.transactions {
            if let Some(day) = t.day() {
                let entry = days.entry(day).or_default();
                entry.0 += t.amount;
                entry.1 += 1;
            }
        }
        to_trend(days)
    }

    /// Count and total per day of week, Monday first
    pub fn weekday_summary(&self) -> Vec<WeekdaySummary> {
        let mut slots = [(0usize, 0.0f64); 7];
        for t in self.transactions {
            if let Some(date) = t.date {
                let slot = &mut slots[date.weekday().num_days_from_monday() as usize];
                slot.0 += 1;
                slot.1 += t.amount;
            }
        }

        let mut weekday = chrono::Weekday::Mon;
        slots
            .iter()
            .map(|&(count, amount)| {
                let summary = WeekdaySummary {
                    weekday: weekday_name(weekday).to_string(),
                    transaction_count: count,
                    amount,
                };
                weekday = weekday.succ();
                summary
            })
            .collect()
    }

    /// Correlate per-category monthly mean amounts
    ///
    /// Builds a months x categories pivot of mean amounts (empty cells are
    /// zero) and correlates every pair of category columns.
    pub fn category_correlation(&self) -> CorrelationOutcome {
        let mut cells: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();
        let mut months = BTreeSet::new();
        let mut categories = BTreeSet::new();

        for t in self.transactions {
            if let (Some(month), Some(category)) = (t.year_month(), t.category.as_deref()) {
                months.insert(month.clone());
                categories.insert(category.to_string());
                let entry = cells.entry((month, category.to_string())).or_default();
                entry.0 += t.amount;
                entry.1 += 1;
            }
        }

        if cells.is_empty() {
            return CorrelationOutcome::Insufficient {
                reason: "no dated, categorized transactions to pivot".to_string(),
            };
        }
        if categories.len() < 2 {
            return CorrelationOutcome::Insufficient {
                reason: "at least two categories are needed for a correlation matrix".to_string(),
            };
        }

        let months: Vec<String> = months.into_iter().collect();
        let categories: Vec<String> = categories.into_iter().collect();

        let columns: Vec<Vec<f64>> = categories
            .iter()
            .map(|category| {
                months
                    .iter()
                    .map(|month| {
                        cells
                            .get(&(month.clone(), category.clone()))
                            .map(|(sum, n)| sum / *n as f64)
                            .unwrap_or(0.0)
                    })
                    .collect()
            })
            .collect();

        let values = columns
            .iter()
            .map(|a| columns.iter().map(|b| stats::pearson(a, b)).collect())
            .collect();

        debug!(
            "Correlation pivot: {} months x {} categories",
            months.len(),
            categories.len()
        );

        CorrelationOutcome::Matrix(CorrelationMatrix {
            categories,
            months,
            values,
        })
    }
}

fn to_trend<K: ToString>(groups: BTreeMap<K, (f64, usize)>) -> Vec<TrendDataPoint> {
    groups
        .into_iter()
        .map(|(period, (amount, transaction_count))| TrendDataPoint {
            period: period.to_string(),
            amount,
            transaction_count,
        })
        .collect()
}
