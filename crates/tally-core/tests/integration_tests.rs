//! Integration tests for tally-core
//!
//! These tests exercise the full load → clean → analyze → render → export workflow.

use std::fs;

use tally_core::{
    clean, export_cleaned, load_file, profile, render_all, Analysis, AnalysisConfig, ChartKind,
    CorrelationOutcome, Error,
};

/// Three months of household transactions with the usual dirt:
/// - one exact duplicate row
/// - a missing subcategory and a missing note
/// - a non-numeric amount and an unparseable date
fn household_csv() -> &'static str {
    "Date,Mode,Category,Subcategory,Note,Amount,Income/Expense,Currency
20/09/2018 12:04:08,Cash,Transportation,Train,2 Place 5 to Place 0,30,Expense,INR
20/09/2018 12:03:15,Cash,Food,snacks,Idli medu Vada mix 2 plates,60,Expense,INR
20/09/2018 12:03:15,Cash,Food,snacks,Idli medu Vada mix 2 plates,60,Expense,INR
19/09/2018,Saving Bank account 1,subscription,Netflix,1 month subscription,199,Expense,INR
17/09/2018 23:41:17,Saving Bank account 1,Salary,,,50000,Income,INR
16/09/2018,Cash,Food,,Chicken,120,Expense,INR
15/10/2018 08:30:00,Credit Card,Food,Dinner,Pizza,450,Expense,INR
14/10/2018,Cash,Transportation,auto,Office,abc,Expense,INR
13/10/2018,Saving Bank account 1,Salary,,October,50000,Income,INR
12/10/2018,Cash,Household,Grocery,Milk,48,Expense,INR
10/11/2018 19:00:00,Credit Card,Food,Lunch,Thali,220,Expense,INR
09/11/2018,Cash,Transportation,Train,Monthly pass,350,Expense,INR
08/11/2018,Saving Bank account 1,Salary,,November,52000,Income,INR
07/11/2018,Cash,Household,Grocery,Vegetables,310,Expense,INR
sometime,Cash,Food,snacks,Samosa,20,Expense,INR
"
}

fn write_csv(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("transactions.csv");
    fs::write(&path, household_csv()).unwrap();
    path
}

// =============================================================================
// Pipeline Tests
// =============================================================================

#[test]
fn test_full_analysis_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path());
    let config = AnalysisConfig::default();

    let records = load_file(&path).unwrap();
    assert_eq!(records.len(), 15);

    let raw = profile(&records, 5, &config.cleaning.date_formats);
    assert_eq!(raw.rows, 15);
    assert_eq!(raw.head.len(), 5);

    let (transactions, report) = clean(&records, &config.cleaning).unwrap();
    assert_eq!(report.rows_in, 15);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.rows_out, 14);
    assert_eq!(report.amounts_imputed, 1);
    assert_eq!(report.dates_unparsed, 1);
    assert_eq!(report.subcategory_filled, 4);
    assert_eq!(report.note_filled, 1);

    let analysis = Analysis::new(&transactions, &config.charts).run();
    assert_eq!(analysis.transaction_count, 14);

    let summary = analysis.amount_summary.as_ref().unwrap();
    assert_eq!(summary.count, 14);
    assert_eq!(summary.max, 52000.0);

    assert_eq!(analysis.category_counts[0].value, "Food");
    assert_eq!(analysis.category_counts[0].count, 5);
    assert_eq!(analysis.flow_counts[0].value, "Expense");

    // The undated row is left out of every time grouping
    let months: Vec<&str> = analysis
        .monthly_totals
        .iter()
        .map(|p| p.period.as_str())
        .collect();
    assert_eq!(months, vec!["2018-09", "2018-10", "2018-11"]);
    let dated: usize = analysis
        .monthly_totals
        .iter()
        .map(|p| p.transaction_count)
        .sum();
    assert_eq!(dated, 13);
    let weekday_total: usize = analysis
        .weekday_summary
        .iter()
        .map(|d| d.transaction_count)
        .sum();
    assert_eq!(weekday_total, 13);

    match &analysis.category_correlation {
        CorrelationOutcome::Matrix(matrix) => {
            assert!(matrix.categories.contains(&"Food".to_string()));
            assert_eq!(matrix.months.len(), 3);
        }
        other => panic!("expected correlation matrix, got {:?}", other),
    }
}

#[test]
fn test_charts_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path());
    let config = AnalysisConfig::default();

    let records = load_file(&path).unwrap();
    let (transactions, _) = clean(&records, &config.cleaning).unwrap();
    let analysis = Analysis::new(&transactions, &config.charts).run();

    let chart_dir = dir.path().join("out").join("charts");
    let rendered = render_all(&analysis, &chart_dir, &config.charts).unwrap();
    assert!(rendered.skipped.is_empty(), "skipped: {:?}", rendered.skipped);
    assert_eq!(rendered.written.len(), ChartKind::all().len());
    for kind in ChartKind::all() {
        let svg = fs::read_to_string(chart_dir.join(kind.file_name())).unwrap();
        assert!(svg.contains("<svg"));
    }

    let cleaned = dir.path().join("cleaned.csv");
    export_cleaned(&cleaned, &transactions).unwrap();
    let reloaded = load_file(&cleaned).unwrap();
    assert_eq!(reloaded.len(), transactions.len());

    let content = fs::read_to_string(&cleaned).unwrap();
    assert!(content.starts_with("Date,Mode,Category,Subcategory,Note,Amount,Income/Expense,Currency,YearMonth,DayOfWeek"));
    assert!(content.contains("2018-09-20 12:04:08"));
}

#[test]
fn test_single_category_skips_correlation_chart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("food.csv");
    fs::write(
        &path,
        "Date,Mode,Category,Subcategory,Note,Amount,Income/Expense
01/01/2019,Cash,Food,Lunch,a,10,Expense
01/02/2019,Cash,Food,Lunch,b,20,Expense
",
    )
    .unwrap();
    let config = AnalysisConfig::default();

    let records = load_file(&path).unwrap();
    let (transactions, _) = clean(&records, &config.cleaning).unwrap();
    let analysis = Analysis::new(&transactions, &config.charts).run();
    assert!(matches!(
        analysis.category_correlation,
        CorrelationOutcome::Insufficient { .. }
    ));

    let rendered = render_all(&analysis, &dir.path().join("charts"), &config.charts).unwrap();
    assert_eq!(rendered.skipped.len(), 1);
    assert_eq!(rendered.skipped[0].0, ChartKind::CategoryCorrelation);
    assert!(!dir
        .path()
        .join("charts")
        .join(ChartKind::CategoryCorrelation.file_name())
        .exists());
}

#[test]
fn test_amounts_near_f64_limits_skip_unbounded_charts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("extreme.csv");
    fs::write(
        &path,
        "Date,Mode,Category,Subcategory,Note,Amount,Income/Expense
01/01/2019,Cash,Food,Lunch,a,1e308,Expense
01/02/2019,Cash,Food,Lunch,b,-1e308,Expense
",
    )
    .unwrap();
    let config = AnalysisConfig::default();

    let records = load_file(&path).unwrap();
    let (transactions, _) = clean(&records, &config.cleaning).unwrap();
    let analysis = Analysis::new(&transactions, &config.charts).run();
    assert!(analysis.amount_histogram.bins.is_empty());
    assert!(analysis.amount_histogram.kde.is_empty());

    let chart_dir = dir.path().join("charts");
    let rendered = render_all(&analysis, &chart_dir, &config.charts).unwrap();
    let skipped: Vec<ChartKind> = rendered.skipped.iter().map(|(kind, _)| *kind).collect();
    for kind in [
        ChartKind::AmountDistribution,
        ChartKind::AmountByTopCategories,
        ChartKind::AmountByFlow,
        ChartKind::MonthlyTotals,
    ] {
        assert!(skipped.contains(&kind), "{:?} not skipped", kind);
        assert!(!chart_dir.join(kind.file_name()).exists());
    }
    assert!(chart_dir.join(ChartKind::ModeCounts.file_name()).exists());
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_file(&dir.path().join("nope.csv"));
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn test_missing_required_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "Date,Mode,Category\n01/01/2019,Cash,Food\n").unwrap();
    assert!(matches!(load_file(&path), Err(Error::InvalidData(_))));
}
