//! Domain models for Tally

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Columns of the household transactions dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Date,
    Mode,
    Category,
    Subcategory,
    Note,
    Amount,
    /// The Income/Expense flag
    Flow,
    Currency,
}

impl Column {
    pub fn all() -> &'static [Column] {
        &[
            Self::Date,
            Self::Mode,
            Self::Category,
            Self::Subcategory,
            Self::Note,
            Self::Amount,
            Self::Flow,
            Self::Currency,
        ]
    }

    /// Header name as it appears in the CSV file
    pub fn header(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Mode => "Mode",
            Self::Category => "Category",
            Self::Subcategory => "Subcategory",
            Self::Note => "Note",
            Self::Amount => "Amount",
            Self::Flow => "Income/Expense",
            Self::Currency => "Currency",
        }
    }

    /// Whether loading fails when the column is absent
    pub fn required(&self) -> bool {
        !matches!(self, Self::Currency)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// A row as read from the CSV file. `None` marks a missing (empty) cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: Option<String>,
    pub mode: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub note: Option<String>,
    pub amount: Option<String>,
    pub flow: Option<String>,
    pub currency: Option<String>,
}

impl RawRecord {
    pub fn get(&self, column: Column) -> Option<&str> {
        match column {
            Column::Date => self.date.as_deref(),
            Column::Mode => self.mode.as_deref(),
            Column::Category => self.category.as_deref(),
            Column::Subcategory => self.subcategory.as_deref(),
            Column::Note => self.note.as_deref(),
            Column::Amount => self.amount.as_deref(),
            Column::Flow => self.flow.as_deref(),
            Column::Currency => self.currency.as_deref(),
        }
    }
}

/// A cleaned transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// `None` when the source date was missing or unparseable
    pub date: Option<NaiveDateTime>,
    pub mode: Option<String>,
    pub category: Option<String>,
    pub subcategory: String,
    pub note: String,
    pub amount: f64,
    pub flow: Option<String>,
    pub currency: Option<String>,
}

impl Transaction {
    /// Calendar day of the transaction
    pub fn day(&self) -> Option<NaiveDate> {
        self.date.map(|d| d.date())
    }

    /// Calendar month as `YYYY-MM`
    pub fn year_month(&self) -> Option<String> {
        self.date.map(|d| format!("{:04}-{:02}", d.year(), d.month()))
    }

    /// Full English weekday name, e.g. "Monday"
    pub fn day_of_week(&self) -> Option<&'static str> {
        self.date.map(|d| weekday_name(d.weekday()))
    }

    /// Grouping value for a categorical column
    pub fn label(&self, by: CountBy) -> Option<&str> {
        match by {
            CountBy::Mode => self.mode.as_deref(),
            CountBy::Category => self.category.as_deref(),
            CountBy::Flow => self.flow.as_deref(),
        }
    }
}

pub fn weekday_name(weekday: chrono::Weekday) -> &'static str {
    use chrono::Weekday::*;
    match weekday {
        Mon => "Monday",
        Tue => "Tuesday",
        Wed => "Wednesday",
        Thu => "Thursday",
        Fri => "Friday",
        Sat => "Saturday",
        Sun => "Sunday",
    }
}

/// Categorical columns that can be counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountBy {
    Mode,
    Category,
    Flow,
}

impl CountBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mode => "mode",
            Self::Category => "category",
            Self::Flow => "flow",
        }
    }

    /// Human-readable axis title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Mode => "Payment Mode",
            Self::Category => "Category",
            Self::Flow => "Income/Expense",
        }
    }
}

impl std::str::FromStr for CountBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mode" | "payment-mode" => Ok(Self::Mode),
            "category" => Ok(Self::Category),
            "flow" | "type" | "income-expense" => Ok(Self::Flow),
            _ => Err(format!(
                "Unknown column: {} (valid: mode, category, flow)",
                s
            )),
        }
    }
}

impl std::fmt::Display for CountBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Profiling
// =============================================================================

/// Inferred value kind of a raw column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Date,
    Number,
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Number => "number",
            Self::Text => "text",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub column: Column,
    pub non_missing: usize,
    pub missing: usize,
    pub kind: ColumnKind,
}

/// First look at a raw dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
    pub head: Vec<RawRecord>,
}

// =============================================================================
// Cleaning
// =============================================================================

/// What the cleaning stage changed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows_in: usize,
    pub rows_out: usize,
    /// Dates present in the source but not parseable
    pub dates_unparsed: usize,
    /// Dates missing from the source
    pub dates_missing: usize,
    pub subcategory_filled: usize,
    pub note_filled: usize,
    pub amounts_imputed: usize,
    /// Mean used to fill missing amounts, when any were filled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imputed_mean: Option<f64>,
    pub duplicates_removed: usize,
}

// =============================================================================
// Statistics
// =============================================================================

/// Summary statistics for a numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, absent for fewer than two values
    pub std: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

/// Occurrence count of a categorical value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// One histogram bin, `[start, end)` (the last bin is closed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Amount distribution with a density overlay scaled to counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountHistogram {
    pub bins: Vec<HistogramBin>,
    pub kde: Vec<(f64, f64)>,
}

/// Box-and-whisker statistics for a group of amounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub label: String,
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

// =============================================================================
// Reports
// =============================================================================

/// A single data point in a trends report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendDataPoint {
    pub period: String,
    pub amount: f64,
    pub transaction_count: usize,
}

/// Activity on one day of the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdaySummary {
    pub weekday: String,
    pub transaction_count: usize,
    pub amount: f64,
}

/// Correlation of monthly mean amounts between categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Column/row labels, alphabetical
    pub categories: Vec<String>,
    /// Months the pivot was built over
    pub months: Vec<String>,
    /// `values[i][j]` correlates `categories[i]` with `categories[j]`;
    /// `None` where undefined
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.categories.iter().position(|c| c == a)?;
        let j = self.categories.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CorrelationOutcome {
    Matrix(CorrelationMatrix),
    Insufficient { reason: String },
}

impl CorrelationOutcome {
    pub fn matrix(&self) -> Option<&CorrelationMatrix> {
        match self {
            Self::Matrix(m) => Some(m),
            Self::Insufficient { .. } => None,
        }
    }
}

/// Everything the analysis stage computes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub transaction_count: usize,
    pub amount_summary: Option<SummaryStats>,
    pub amount_histogram: AmountHistogram,
    pub mode_counts: Vec<ValueCount>,
    pub category_counts: Vec<ValueCount>,
    pub flow_counts: Vec<ValueCount>,
    pub category_boxes: Vec<BoxStats>,
    pub flow_boxes: Vec<BoxStats>,
    pub monthly_totals: Vec<TrendDataPoint>,
    pub daily_totals: Vec<TrendDataPoint>,
    pub weekday_summary: Vec<WeekdaySummary>,
    pub category_correlation: CorrelationOutcome,
}
