//! Summary statistics over dataset columns
//!
//! Small descriptive toolkit backing the analytics report: moments,
//! quartiles, and fixed-bin histograms. Non-finite values are counted
//! as missing and excluded from every aggregate.

use serde::{Deserialize, Serialize};

/// Summary statistics for a numeric column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of finite values
    pub count: usize,
    /// Number of missing/NaN values
    pub missing: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
}

impl SummaryStats {
    /// Compute summary statistics from data
    pub fn from_data(data: &[f64]) -> Self {
        let finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        let missing = data.len() - finite.len();

        if finite.is_empty() {
            return Self::empty(missing);
        }

        let count = finite.len();
        let mean = finite.iter().sum::<f64>() / count as f64;
        let variance = finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut sorted = finite;
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Self {
            count,
            missing,
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
            median,
        }
    }

    /// Create empty statistics (all NaN)
    fn empty(missing: usize) -> Self {
        Self {
            count: 0,
            missing,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            std_dev: f64::NAN,
            median: f64::NAN,
        }
    }
}

/// Five number summary statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// Compute min, quartiles, and max from data
    ///
    /// Returns `None` when no finite values remain. Quantiles follow the
    /// empirical CDF rule: the smallest value x with ECDF(x) >= p.
    pub fn from_data(data: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Some(Self {
            min: sorted[0],
            q1: ecdf_quantile(&sorted, 0.25),
            median: ecdf_quantile(&sorted, 0.5),
            q3: ecdf_quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }

    /// Get the interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Smallest sorted value whose empirical CDF reaches p
fn ecdf_quantile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let idx = ((p * n as f64).ceil() as usize).max(1) - 1;
    sorted[idx.min(n - 1)]
}

/// Equal-width histogram over a fixed range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin data into `bins` equal-width buckets spanning `[lo, hi]`
    ///
    /// Values outside the range are clamped into the edge bins so every
    /// observation is counted; the top edge is inclusive.
    pub fn from_data(data: &[f64], bins: usize, lo: f64, hi: f64) -> Self {
        let bins = bins.max(1);
        let width = (hi - lo) / bins as f64;
        let mut counts = vec![0_u64; bins];

        for &x in data.iter().filter(|x| x.is_finite()) {
            let bin = if width > 0.0 {
                (((x - lo) / width).floor() as i64).clamp(0, bins as i64 - 1) as usize
            } else {
                0
            };
            counts[bin] += 1;
        }

        Self {
            start: lo,
            bin_width: width,
            counts,
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Inclusive-exclusive edges of bin `i`
    pub fn bin_range(&self, i: usize) -> (f64, f64) {
        let lo = self.start + i as f64 * self.bin_width;
        (lo, lo + self.bin_width)
    }
}
