//! Numeric helpers: summary statistics, value counts, histograms, kernel
//! density, box plot statistics and Pearson correlation
//!
//! Quantiles use linear interpolation between order statistics and standard
//! deviations are sample (n - 1) deviations, matching what most dataframe
//! libraries report by default.

use std::collections::HashMap;

use crate::models::{BoxStats, HistogramBin, SummaryStats, ValueCount};

/// Whisker reach as a multiple of the interquartile range
const WHISKER_IQR: f64 = 1.5;

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

/// Linear-interpolated quantile of already sorted values
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    // Weighted form stays finite where `hi - lo` would overflow
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Count, mean, std, min, quartiles and max
pub fn describe(values: &[f64]) -> Option<SummaryStats> {
    let s = sorted(values);
    let first = *s.first()?;
    let last = *s.last()?;

    Some(SummaryStats {
        count: s.len(),
        mean: mean(&s)?,
        std: std_dev(&s),
        min: first,
        p25: quantile_sorted(&s, 0.25),
        p50: quantile_sorted(&s, 0.50),
        p75: quantile_sorted(&s, 0.75),
        max: last,
    })
}

/// Occurrences of each present value, most frequent first (ties alphabetical)
pub fn value_counts<'a, I>(values: I) -> Vec<ValueCount>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_default() += 1;
    }

    let mut result: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    result
}

/// Equal-width histogram between the minimum and maximum value
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    // A span wider than f64::MAX has no usable bin edges
    if !width.is_finite() {
        return Vec::new();
    }

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

/// Gaussian kernel density estimate sampled at `points` evenly spaced
/// positions across the data range, multiplied by `scale`.
///
/// Bandwidth follows Scott's rule. Empty when the estimate is undefined
/// (fewer than two values, no spread, or a spread too wide for `f64`).
pub fn kde_curve(values: &[f64], points: usize, scale: f64) -> Vec<(f64, f64)> {
    let n = values.len();
    let sd = match std_dev(values) {
        Some(sd) if sd > 0.0 && sd.is_finite() => sd,
        _ => return Vec::new(),
    };
    if points < 2 {
        return Vec::new();
    }

    let bandwidth = sd * (n as f64).powf(-0.2);
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (hi - lo) / (points - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    if !(step.is_finite() && norm.is_finite()) {
        return Vec::new();
    }

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density * scale)
        })
        .collect()
}

/// Quartiles, 1.5 IQR whiskers and outliers for a group of values
pub fn box_stats(label: &str, values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let s = sorted(values);
    let q1 = quantile_sorted(&s, 0.25);
    let median = quantile_sorted(&s, 0.50);
    let q3 = quantile_sorted(&s, 0.75);
    let reach = WHISKER_IQR * (q3 - q1);
    let (low_fence, high_fence) = (q1 - reach, q3 + reach);

    let inside = s.iter().copied().filter(|v| *v >= low_fence && *v <= high_fence);
    let whisker_low = inside.clone().fold(f64::INFINITY, f64::min);
    let whisker_high = inside.fold(f64::NEG_INFINITY, f64::max);

    Some(BoxStats {
        label: label.to_string(),
        count: s.len(),
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        outliers: s
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect(),
    })
}

/// Pearson correlation coefficient of two equally long series
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;

    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }

    if vx == 0.0 || vy == 0.0 || !(cov.is_finite() && vx.is_finite() && vy.is_finite()) {
        return None;
    }
    Some((cov / (vx * vy).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_describe() {
        let stats = describe(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert!(approx(stats.mean, 2.5));
        assert!(approx(stats.std.unwrap(), 1.2909944487358056));
        assert_eq!(stats.min, 1.0);
        assert!(approx(stats.p25, 1.75));
        assert!(approx(stats.p50, 2.5));
        assert!(approx(stats.p75, 3.25));
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn test_describe_edge_cases() {
        assert!(describe(&[]).is_none());

        let single = describe(&[7.0]).unwrap();
        assert_eq!(single.std, None);
        assert_eq!(single.p25, 7.0);
        assert_eq!(single.max, 7.0);
    }

    #[test]
    fn test_value_counts_order() {
        let values = vec![
            Some("Food"),
            Some("Transport"),
            None,
            Some("Food"),
            Some("Apparel"),
            Some("Transport"),
            Some("Gift"),
        ];
        let counts = value_counts(values);
        let names: Vec<&str> = counts.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(names, vec!["Food", "Transport", "Apparel", "Gift"]);
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), 6);
    }

    #[test]
    fn test_histogram_bins() {
        let bins = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0, 10.0], 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[4].end, 10.0);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 2);
        // max lands in the closed last bin
        assert_eq!(bins[4].count, 1);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 6);
    }

    #[test]
    fn test_histogram_constant_values() {
        let bins = histogram(&[5.0, 5.0, 5.0], 4);
        assert_eq!(bins[0].start, 4.5);
        assert_eq!(bins[3].end, 5.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert!(histogram(&[], 10).is_empty());
    }

    #[test]
    fn test_kde_curve() {
        let values = [1.0, 2.0, 2.5, 3.0, 10.0];
        let curve = kde_curve(&values, 50, 1.0);
        assert_eq!(curve.len(), 50);
        assert_eq!(curve[0].0, 1.0);
        assert!(approx(curve[49].0, 10.0));
        assert!(curve.iter().all(|(_, y)| *y > 0.0));

        // Density integrates to roughly one over a wide enough grid
        let step = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|(_, y)| y * step).sum();
        assert!(area > 0.4 && area < 1.1);

        assert!(kde_curve(&[3.0, 3.0], 10, 1.0).is_empty());
        assert!(kde_curve(&[3.0], 10, 1.0).is_empty());
    }

    #[test]
    fn test_box_stats_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stats = box_stats("Food", &values).unwrap();
        assert!(approx(stats.q1, 2.25));
        assert!(approx(stats.median, 3.5));
        assert!(approx(stats.q3, 4.75));
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 5.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert!(approx(stats.iqr(), 2.5));

        assert!(box_stats("Empty", &[]).is_none());
    }

    #[test]
    fn test_pearson() {
        assert!(approx(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap(), 1.0));
        assert!(approx(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap(), -1.0));
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
        assert_eq!(pearson(&[1e308, -1e308], &[1.0, 2.0]), None);
    }

    #[test]
    fn test_extreme_spread_is_undefined() {
        let values = [1e308, -1e308];
        assert!(histogram(&values, 10).is_empty());
        assert!(kde_curve(&values, 50, 1.0).is_empty());

        let stats = box_stats("Extreme", &values).unwrap();
        assert!(stats.q1.is_finite() && stats.q1 < 0.0);
        assert_eq!(stats.median, 0.0);
        assert!(stats.q3.is_finite() && stats.q3 > 0.0);
        assert_eq!(stats.whisker_low, -1e308);
        assert_eq!(stats.whisker_high, 1e308);
    }
}
