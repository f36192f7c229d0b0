//! Descriptive statistics over a set of total marks.
//!
//! Used for the leaderboard insights: sample count, mean, population standard
//! deviation, interpolated percentiles and a fixed-width histogram.

use serde::{Deserialize, Serialize};

/// Summary of a marks distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksDistribution {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub median: f64,
    pub p90: f64,
    pub min: f64,
    pub max: f64,
}

impl MarksDistribution {
    /// Compute the distribution. Returns `None` for an empty input or one
    /// containing NaN.
    pub fn from_marks(marks: &[f64]) -> Option<Self> {
        if marks.is_empty() || marks.iter().any(|m| m.is_nan()) {
            return None;
        }
        let mut sorted = marks.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            median: percentile(&sorted, 0.5),
            p90: percentile(&sorted, 0.9),
            min: sorted[0],
            max: sorted[count - 1],
        })
    }
}

/// Linearly interpolated percentile of an ascending, non-empty slice.
/// `p` is a fraction in `[0, 1]`.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = (n - 1) as f64 * p.clamp(0.0, 1.0);
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            if lower == upper {
                sorted[lower]
            } else {
                sorted[lower] * (upper as f64 - rank) + sorted[upper] * (rank - lower as f64)
            }
        }
    }
}

/// Bucket marks into `bins` equal-width bins spanning `[min, max]`.
/// The maximum lands in the last bin.
pub fn histogram(marks: &[f64], bins: usize) -> Vec<usize> {
    let mut counts = vec![0; bins];
    if bins == 0 || marks.is_empty() {
        return counts;
    }
    let min = marks.iter().copied().fold(f64::INFINITY, f64::min);
    let max = marks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };
    let step = span / bins as f64;

    for &mark in marks {
        let index = (((mark - min) / step).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }
    counts
}
