//! Spearman rank correlation.
//!
//! Spearman's rho is the Pearson correlation of the two samples' ranks.
//! Tied values share the average of the ranks they span, so a column of
//! identical values has zero rank variance and no defined correlation.

use std::cmp::Ordering;

/// 1-based ranks with ties resolved to their average rank.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0usize;
    while start < order.len() {
        let value = values[order[start]];
        let mut end = start + 1;
        while end < order.len() && values[order[end]].total_cmp(&value) == Ordering::Equal {
            end += 1;
        }
        // Positions start..end hold ranks start+1..=end.
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Pearson correlation, or `None` with fewer than two pairs, mismatched
/// lengths, or zero variance on either side.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut num = 0.0_f64;
    let mut den_x = 0.0_f64;
    let mut den_y = 0.0_f64;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        num = dx.mul_add(dy, num);
        den_x = dx.mul_add(dx, den_x);
        den_y = dy.mul_add(dy, den_y);
    }

    let den = (den_x * den_y).sqrt();
    if den > 0.0 && den.is_finite() {
        Some((num / den).clamp(-1.0, 1.0))
    } else {
        None
    }
}

/// Spearman rank correlation of paired samples.
///
/// Callers are expected to have dropped pairs with a missing side already.
#[must_use]
pub fn spearman(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    pearson(&average_ranks(x), &average_ranks(y))
}
