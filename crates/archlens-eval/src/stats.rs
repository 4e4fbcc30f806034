//! Small aggregation helpers shared by the engine sections.

use std::collections::HashMap;

use crate::metrics::{Distribution, DistributionEntry, Histogram, HistogramBin};

/// `count / total * 100`, zero when `total` is zero.
pub(crate) fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// `count / total`, zero when `total` is zero.
pub(crate) fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Sum of the present values; missing values are skipped.
pub(crate) fn sum(values: &[Option<f64>]) -> f64 {
    values.iter().flatten().sum()
}

/// Mean of the present values, `None` when there are none.
pub(crate) fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present = values.iter().flatten().collect::<Vec<_>>();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().copied().sum::<f64>() / present.len() as f64)
    }
}

/// Count labels by exact equality.
///
/// Entries are ordered by count descending, ties by first appearance.
/// Percentages are relative to `rows`, so null labels lower the total share.
pub(crate) fn distribution(column: &str, labels: &[Option<String>], rows: usize) -> Distribution {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels.iter().flatten() {
        let count = counts.entry(label.as_str()).or_insert_with(|| {
            order.push(label.as_str());
            0
        });
        *count += 1;
    }

    let mut entries = order
        .into_iter()
        .map(|label| {
            let count = counts.get(label).copied().unwrap_or(0);
            DistributionEntry {
                label: label.to_string(),
                count,
                pct: percentage(count, rows),
            }
        })
        .collect::<Vec<_>>();
    // sort_by is stable, so equal counts keep first-appearance order.
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    Distribution {
        column: column.to_string(),
        entries,
    }
}

/// Equal-width histogram over the present values.
///
/// A constant series is spread over `[value - 0.5, value + 0.5]`.
pub(crate) fn histogram(column: &str, values: &[Option<f64>], bins: usize) -> Option<Histogram> {
    let present = values.iter().flatten().copied().collect::<Vec<_>>();
    if present.is_empty() || bins == 0 {
        return None;
    }

    let mut min = present.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }
    let width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for value in &present {
        let index = (((value - min) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            lower: min + width * idx as f64,
            upper: if idx + 1 == bins {
                max
            } else {
                min + width * (idx + 1) as f64
            },
            count,
        })
        .collect();

    Some(Histogram {
        column: column.to_string(),
        mean: mean(values),
        bins,
    })
}

/// Pearson correlation coefficient, `None` for fewer than two points or zero variance.
pub(crate) fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x[..n].iter().zip(&y[..n]) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    let coefficient = covariance / (var_x.sqrt() * var_y.sqrt());
    Some(coefficient.clamp(-1.0, 1.0))
}
