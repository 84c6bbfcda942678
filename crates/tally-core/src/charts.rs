//! SVG chart rendering
//!
//! Each chart is written as a standalone SVG file into an output directory.
//! Categorical axes are plotted on a numeric axis with one unit per category
//! and a label formatter mapping positions back to names.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use tracing::{debug, info, warn};

use crate::config::ChartOptions;
use crate::error::Result;
use crate::models::{
    AmountHistogram, AnalysisReport, BoxStats, CorrelationMatrix, CorrelationOutcome, CountBy,
    TrendDataPoint, ValueCount, WeekdaySummary,
};

const FONT: &str = "sans-serif";
const BAR: RGBColor = RGBColor(76, 114, 176);
const ACCENT: RGBColor = RGBColor(221, 132, 82);
const GRID: RGBColor = RGBColor(220, 220, 220);
const UNDEFINED: RGBColor = RGBColor(200, 200, 200);
const LABEL_CHARS: usize = 18;

/// The charts produced by a full analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    AmountDistribution,
    ModeCounts,
    TopCategories,
    FlowCounts,
    AmountByTopCategories,
    AmountByFlow,
    MonthlyTotals,
    DailyTotals,
    WeekdayTotals,
    CategoryCorrelation,
}

impl ChartKind {
    pub fn all() -> &'static [ChartKind] {
        &[
            Self::AmountDistribution,
            Self::ModeCounts,
            Self::TopCategories,
            Self::FlowCounts,
            Self::AmountByTopCategories,
            Self::AmountByFlow,
            Self::MonthlyTotals,
            Self::DailyTotals,
            Self::WeekdayTotals,
            Self::CategoryCorrelation,
        ]
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::AmountDistribution => "amount_distribution.svg",
            Self::ModeCounts => "mode_counts.svg",
            Self::TopCategories => "top_categories.svg",
            Self::FlowCounts => "income_expense_counts.svg",
            Self::AmountByTopCategories => "amount_by_top_categories.svg",
            Self::AmountByFlow => "amount_by_flow.svg",
            Self::MonthlyTotals => "monthly_totals.svg",
            Self::DailyTotals => "daily_totals.svg",
            Self::WeekdayTotals => "weekday_totals.svg",
            Self::CategoryCorrelation => "category_correlation.svg",
        }
    }

    pub fn title(&self, options: &ChartOptions) -> String {
        match self {
            Self::AmountDistribution => "Distribution of Transaction Amounts".to_string(),
            Self::ModeCounts => "Transaction Counts by Mode of Payment".to_string(),
            Self::TopCategories => format!(
                "Top {} Transaction Categories by Count",
                options.top_categories
            ),
            Self::FlowCounts => "Transaction Counts by Income/Expense".to_string(),
            Self::AmountByTopCategories => format!(
                "Distribution of Amount by Top {} Categories",
                options.box_plot_categories
            ),
            Self::AmountByFlow => "Distribution of Amount by Income/Expense Type".to_string(),
            Self::MonthlyTotals => "Monthly Total Transaction Amounts".to_string(),
            Self::DailyTotals => "Daily Total Transaction Amounts".to_string(),
            Self::WeekdayTotals => "Total Transaction Amounts by Day of Week".to_string(),
            Self::CategoryCorrelation => {
                "Correlation of Monthly Average Amounts by Category".to_string()
            }
        }
    }
}

/// Outcome of rendering a whole chart set
#[derive(Debug, Clone, Default)]
pub struct RenderSummary {
    pub written: Vec<PathBuf>,
    /// Charts skipped for lack of data, with the reason
    pub skipped: Vec<(ChartKind, String)>,
}

/// Render every chart whose data is available into `dir`
pub fn render_all(
    report: &AnalysisReport,
    dir: &Path,
    options: &ChartOptions,
) -> Result<RenderSummary> {
    fs::create_dir_all(dir)?;
    let mut summary = RenderSummary::default();

    for &kind in ChartKind::all() {
        let path = dir.join(kind.file_name());
        match render(kind, report, &path, options)? {
            Some(reason) => {
                warn!("Skipped {}: {}", kind.file_name(), reason);
                summary.skipped.push((kind, reason));
            }
            None => {
                debug!("Wrote {}", path.display());
                summary.written.push(path);
            }
        }
    }

    info!(
        "Rendered {} charts into {}",
        summary.written.len(),
        dir.display()
    );
    Ok(summary)
}

/// Render one chart. Returns the reason when there was nothing to draw.
pub fn render(
    kind: ChartKind,
    report: &AnalysisReport,
    path: &Path,
    options: &ChartOptions,
) -> Result<Option<String>> {
    let title = kind.title(options);
    let drawn = match kind {
        ChartKind::AmountDistribution => {
            amount_distribution(&report.amount_histogram, path, &title, options)?
        }
        ChartKind::ModeCounts => count_chart(
            &report.mode_counts,
            path,
            &title,
            CountBy::Mode.title(),
            options,
        )?,
        ChartKind::TopCategories => count_chart(
            &report.category_counts,
            path,
            &title,
            CountBy::Category.title(),
            options,
        )?,
        ChartKind::FlowCounts => {
            count_chart(&report.flow_counts, path, &title, CountBy::Flow.title(), options)?
        }
        ChartKind::AmountByTopCategories => box_chart(
            &report.category_boxes,
            path,
            &title,
            CountBy::Category.title(),
            options,
        )?,
        ChartKind::AmountByFlow => {
            box_chart(&report.flow_boxes, path, &title, CountBy::Flow.title(), options)?
        }
        ChartKind::MonthlyTotals => monthly_chart(&report.monthly_totals, path, &title, options)?,
        ChartKind::DailyTotals => daily_chart(&report.daily_totals, path, &title, options)?,
        ChartKind::WeekdayTotals => weekday_chart(&report.weekday_summary, path, &title, options)?,
        ChartKind::CategoryCorrelation => match &report.category_correlation {
            CorrelationOutcome::Matrix(matrix) => heatmap(matrix, path, &title, options)?,
            CorrelationOutcome::Insufficient { reason } => return Ok(Some(reason.clone())),
        },
    };

    Ok(if drawn {
        None
    } else {
        Some("no plottable data".to_string())
    })
}

/// Histogram bars with the density curve on top
pub fn amount_distribution(
    histogram: &AmountHistogram,
    path: &Path,
    title: &str,
    options: &ChartOptions,
) -> Result<bool> {
    let (first, last) = match (histogram.bins.first(), histogram.bins.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(false),
    };

    let peak = histogram
        .bins
        .iter()
        .map(|b| b.count as f64)
        .chain(histogram.kde.iter().map(|(_, y)| *y))
        .fold(1.0, f64::max);
    if !(first.start.is_finite() && last.end.is_finite() && peak.is_finite()) {
        return Ok(false);
    }

    let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(first.start..last.end, 0f64..peak * 1.1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(WHITE)
        .bold_line_style(GRID)
        .x_desc(options.amount_label())
        .y_desc("Frequency")
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    chart.draw_series(histogram.bins.iter().map(|b| {
        Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], BAR.mix(0.75).filled())
    }))?;

    if !histogram.kde.is_empty() {
        chart.draw_series(LineSeries::new(
            histogram.kde.iter().copied(),
            ACCENT.stroke_width(2),
        ))?;
    }

    root.present()?;
    Ok(true)
}

/// Vertical bars of value counts, in the given order
pub fn count_chart(
    counts: &[ValueCount],
    path: &Path,
    title: &str,
    x_desc: &str,
    options: &ChartOptions,
) -> Result<bool> {
    let bars: Vec<(String, f64)> = counts
        .iter()
        .map(|c| (c.value.clone(), c.count as f64))
        .collect();
    bar_chart(&bars, path, title, x_desc, "Count", options)
}

/// Total amount per weekday
pub fn weekday_chart(
    summary: &[WeekdaySummary],
    path: &Path,
    title: &str,
    options: &ChartOptions,
) -> Result<bool> {
    if summary.iter().all(|d| d.transaction_count == 0) {
        return Ok(false);
    }
    let bars: Vec<(String, f64)> = summary
        .iter()
        .map(|d| (d.weekday.clone(), d.amount))
        .collect();
    let y_desc = format!("Total Amount ({})", options.currency_label);
    bar_chart(&bars, path, title, "Day of Week", &y_desc, options)
}

fn bar_chart(
    bars: &[(String, f64)],
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    options: &ChartOptions,
) -> Result<bool> {
    if bars.is_empty() {
        return Ok(false);
    }
    let labels: Vec<String> = bars.iter().map(|(l, _)| truncate(l, LABEL_CHARS)).collect();
    let y_range = match padded_range(bars.iter().map(|(_, v)| *v).chain(std::iter::once(0.0))) {
        Some(range) => range,
        None => return Ok(false),
    };

    let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(category_axis(bars.len()), y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(WHITE)
        .bold_line_style(GRID)
        .x_labels(bars.len() + 1)
        .x_label_formatter(&|v| category_label(&labels, *v))
        .x_label_style((FONT, 12))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
        let x = i as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *value)], BAR.filled())
    }))?;

    root.present()?;
    Ok(true)
}

/// Horizontal box plots on a logarithmic amount axis, first group on top
///
/// A log axis cannot show zero or negative amounts; such statistics are
/// drawn at the left edge of the axis.
pub fn box_chart(
    boxes: &[BoxStats],
    path: &Path,
    title: &str,
    y_desc: &str,
    options: &ChartOptions,
) -> Result<bool> {
    let positive: Vec<f64> = boxes
        .iter()
        .flat_map(|b| {
            [b.whisker_low, b.q1, b.median, b.q3, b.whisker_high]
                .into_iter()
                .chain(b.outliers.iter().copied())
        })
        .filter(|v| *v > 0.0)
        .collect();
    if positive.is_empty() {
        return Ok(false);
    }

    let lo = positive.iter().copied().fold(f64::INFINITY, f64::min) / 1.5;
    let hi = positive.iter().copied().fold(f64::NEG_INFINITY, f64::max) * 1.5;
    if !hi.is_finite() {
        return Ok(false);
    }
    let floor = |v: f64| v.max(lo);
    let n = boxes.len();
    // First box is drawn at the top of the chart
    let row = |i: usize| (n - 1 - i) as f64;
    let labels: Vec<String> = (0..n)
        .map(|r| truncate(&boxes[n - 1 - r].label, LABEL_CHARS))
        .collect();

    let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(140)
        .build_cartesian_2d((lo..hi).log_scale(), category_axis(n))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .light_line_style(WHITE)
        .bold_line_style(GRID)
        .y_labels(n + 1)
        .y_label_formatter(&|v| category_label(&labels, *v))
        .x_label_formatter(&|v| format_amount(*v))
        .x_desc(options.amount_label())
        .y_desc(y_desc)
        .draw()?;

    let half = 0.3;
    let cap = 0.15;

    chart.draw_series(boxes.iter().enumerate().map(|(i, b)| {
        let y = row(i);
        Rectangle::new(
            [(floor(b.q1), y - half), (floor(b.q3), y + half)],
            BAR.mix(0.75).filled(),
        )
    }))?;
    chart.draw_series(boxes.iter().enumerate().map(|(i, b)| {
        let y = row(i);
        Rectangle::new(
            [(floor(b.q1), y - half), (floor(b.q3), y + half)],
            BLACK.stroke_width(1),
        )
    }))?;

    for (i, b) in boxes.iter().enumerate() {
        let y = row(i);
        let segments = [
            // median
            [(floor(b.median), y - half), (floor(b.median), y + half)],
            // whiskers
            [(floor(b.whisker_low), y), (floor(b.q1), y)],
            [(floor(b.q3), y), (floor(b.whisker_high), y)],
            // caps
            [(floor(b.whisker_low), y - cap), (floor(b.whisker_low), y + cap)],
            [(floor(b.whisker_high), y - cap), (floor(b.whisker_high), y + cap)],
        ];
        chart.draw_series(
            segments
                .into_iter()
                .map(|s| PathElement::new(s.to_vec(), BLACK.stroke_width(1))),
        )?;
        chart.draw_series(
            b.outliers
                .iter()
                .map(|v| Circle::new((floor(*v), y), 3, BLACK.mix(0.6).filled())),
        )?;
    }

    root.present()?;
    Ok(true)
}

/// Line with markers over months
pub fn monthly_chart(
    points: &[TrendDataPoint],
    path: &Path,
    title: &str,
    options: &ChartOptions,
) -> Result<bool> {
    if points.is_empty() {
        return Ok(false);
    }
    let labels: Vec<String> = points.iter().map(|p| p.period.clone()).collect();
    let series: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.amount))
        .collect();
    let y_desc = format!("Total {}", options.amount_label());
    let x_labels = labels.len().min(24) + 1;

    line_chart(
        &series,
        category_axis(points.len()),
        &|v| category_label(&labels, *v),
        x_labels,
        path,
        title,
        "Month",
        &y_desc,
        options,
    )
}

/// Line with markers over calendar days
pub fn daily_chart(
    points: &[TrendDataPoint],
    path: &Path,
    title: &str,
    options: &ChartOptions,
) -> Result<bool> {
    let dated: Vec<(NaiveDate, f64)> = points
        .iter()
        .filter_map(|p| {
            NaiveDate::parse_from_str(&p.period, "%Y-%m-%d")
                .ok()
                .map(|d| (d, p.amount))
        })
        .collect();
    let start = match dated.first() {
        Some((start, _)) => *start,
        None => return Ok(false),
    };

    let series: Vec<(f64, f64)> = dated
        .iter()
        .map(|(d, amount)| ((*d - start).num_days() as f64, *amount))
        .collect();
    let span = series.last().map(|(x, _)| *x).unwrap_or(0.0);
    let y_desc = format!("Total {}", options.amount_label());
    let format_day = |v: &f64| {
        let day = start + Duration::days(v.round() as i64);
        day.format("%Y-%m-%d").to_string()
    };

    line_chart(
        &series,
        -0.5..span + 0.5,
        &format_day,
        8,
        path,
        title,
        "Date",
        &y_desc,
        options,
    )
}

#[allow(clippy::too_many_arguments)]
fn line_chart(
    series: &[(f64, f64)],
    x_range: Range<f64>,
    x_formatter: &dyn Fn(&f64) -> String,
    x_labels: usize,
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    options: &ChartOptions,
) -> Result<bool> {
    let y_range = match padded_range(series.iter().map(|(_, y)| *y).chain(std::iter::once(0.0))) {
        Some(range) => range,
        None => return Ok(false),
    };
    let marker = if series.len() > 120 { 2 } else { 4 };

    let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .light_line_style(WHITE)
        .bold_line_style(GRID)
        .x_labels(x_labels)
        .x_label_formatter(x_formatter)
        .x_label_style((FONT, 11))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(LineSeries::new(series.iter().copied(), BAR.stroke_width(1)))?;
    chart.draw_series(
        series
            .iter()
            .map(|&(x, y)| Circle::new((x, y), marker, BAR.filled())),
    )?;

    root.present()?;
    Ok(true)
}

/// Annotated correlation heatmap, first category in the top row
pub fn heatmap(
    matrix: &CorrelationMatrix,
    path: &Path,
    title: &str,
    options: &ChartOptions,
) -> Result<bool> {
    let n = matrix.categories.len();
    if n == 0 {
        return Ok(false);
    }
    let column_labels: Vec<String> = matrix
        .categories
        .iter()
        .map(|c| truncate(c, 12))
        .collect();
    let row_labels: Vec<String> = column_labels.iter().rev().cloned().collect();
    let side = options.width.max(options.height);
    let font_size = if n > 15 { 9 } else { 12 };

    let root = SVGBackend::new(path, (side, side)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 22))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(120)
        .build_cartesian_2d(category_axis(n), category_axis(n))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n + 1)
        .y_labels(n + 1)
        .x_label_formatter(&|v| category_label(&column_labels, *v))
        .y_label_formatter(&|v| category_label(&row_labels, *v))
        .x_label_style((FONT, font_size))
        .y_label_style((FONT, font_size))
        .draw()?;

    let cells: Vec<(f64, f64, Option<f64>)> = matrix
        .values
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(move |(j, value)| (j as f64, (n - 1 - i) as f64, *value))
        })
        .collect();

    chart.draw_series(cells.iter().map(|&(x, y, value)| {
        let color = value.map(coolwarm).unwrap_or(UNDEFINED);
        Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], color.filled())
    }))?;
    chart.draw_series(cells.iter().map(|&(x, y, _)| {
        Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], WHITE.stroke_width(1))
    }))?;
    chart.draw_series(cells.iter().map(|&(x, y, value)| {
        let text = value
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "n/a".to_string());
        Text::new(text, (x - 0.2, y + 0.1), (FONT, font_size).into_font())
    }))?;

    root.present()?;
    Ok(true)
}

/// Axis for `n` categories, one unit each, centered on 0..n-1
fn category_axis(n: usize) -> Range<f64> {
    -0.5..n as f64 - 0.5
}

/// Name of the category at an axis position, empty between categories
fn category_label(labels: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Axis range covering all values with some headroom
///
/// `None` when a value or the padded bounds do not fit in a finite `f64`.
fn padded_range<I: IntoIterator<Item = f64>>(values: I) -> Option<Range<f64>> {
    let (lo, hi) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi || lo == hi {
        return Some(0.0..1.0);
    }
    let pad = (hi - lo) * 0.1;
    let lo = if lo < 0.0 { lo - pad } else { lo };
    let range = lo..hi + pad;
    (range.start.is_finite() && range.end.is_finite()).then_some(range)
}

fn format_amount(v: f64) -> String {
    if v >= 1.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

/// Map a correlation in [-1, 1] onto a diverging blue-white-red scale
fn coolwarm(value: f64) -> RGBColor {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    let t = value.clamp(-1.0, 1.0);
    let (from, to, f) = if t < 0.0 {
        (MID, COLD, -t)
    } else {
        (MID, WARM, t)
    };
    let mix = |a: f64, b: f64| (a + (b - a) * f).round() as u8;
    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Shorten a label to `max` characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
