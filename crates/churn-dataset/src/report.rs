//! Descriptive churn analytics
//!
//! Aggregates the historical dataset into the numbers the dashboard
//! renders: overall churn rate, per-category rates, the
//! failed-transactions spread for each outcome, and the tenure
//! distribution stacked by outcome. Rendering is someone else's job;
//! this module only produces the figures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::reader::Dataset;
use crate::row::DatasetRow;
use crate::stats::{FiveNumberSummary, Histogram, SummaryStats};

/// Tenure histogram bin count, matching the dashboard chart
pub const DEFAULT_TENURE_BINS: usize = 30;

/// Churn rate within one categorical group
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryRate {
    pub category: String,
    pub customers: usize,
    pub churn_rate: f64,
}

/// A numeric distribution split by observed outcome
///
/// Either side is `None` when the dataset has no customers with that
/// outcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutcomeSplit {
    pub stay: Option<FiveNumberSummary>,
    pub churn: Option<FiveNumberSummary>,
}

/// Tenure distribution stacked by outcome over shared bin edges
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TenureHistogram {
    pub stay: Histogram,
    pub churn: Histogram,
}

impl TenureHistogram {
    fn from_rows(rows: &[DatasetRow], bins: usize) -> Self {
        let tenures: Vec<f64> = rows
            .iter()
            .map(|r| r.customer_tenure_months as f64)
            .collect();
        let lo = tenures.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = tenures.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let split = |churned: bool| {
            let values: Vec<f64> = rows
                .iter()
                .filter(|r| r.churned() == churned)
                .map(|r| r.customer_tenure_months as f64)
                .collect();
            Histogram::from_data(&values, bins, lo, hi)
        };

        Self {
            stay: split(false),
            churn: split(true),
        }
    }

    pub fn bins(&self) -> usize {
        self.stay.counts.len()
    }

    /// Combined count in bin `i` across both outcomes
    pub fn total_in_bin(&self, i: usize) -> u64 {
        self.stay.counts[i] + self.churn.counts[i]
    }
}

/// The full analytics report over one dataset
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChurnReport {
    pub generated_at: DateTime<Utc>,
    pub total_customers: usize,
    pub churned_customers: usize,
    pub churn_rate: f64,
    /// Spread of per-customer average transaction value
    pub transaction_value: SummaryStats,
    pub by_gender: Vec<CategoryRate>,
    pub by_location: Vec<CategoryRate>,
    pub by_account_type: Vec<CategoryRate>,
    pub failed_transactions: OutcomeSplit,
    pub tenure: TenureHistogram,
}

impl ChurnReport {
    /// Aggregate a dataset with the default tenure binning
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self::with_bins(dataset, DEFAULT_TENURE_BINS)
    }

    /// Aggregate a dataset with a caller-chosen tenure bin count
    pub fn with_bins(dataset: &Dataset, tenure_bins: usize) -> Self {
        let rows = dataset.rows();
        // Dataset construction rejects empty row sets
        let total_customers = rows.len();
        let churned_customers = rows.iter().filter(|r| r.churned()).count();

        let report = Self {
            generated_at: Utc::now(),
            total_customers,
            churned_customers,
            churn_rate: churned_customers as f64 / total_customers as f64,
            transaction_value: SummaryStats::from_data(
                &rows
                    .iter()
                    .map(|r| r.avg_transaction_value)
                    .collect::<Vec<f64>>(),
            ),
            by_gender: category_rates(rows, |r| &r.gender),
            by_location: category_rates(rows, |r| &r.location),
            by_account_type: category_rates(rows, |r| &r.account_type),
            failed_transactions: outcome_split(rows, |r| r.failed_transactions as f64),
            tenure: TenureHistogram::from_rows(rows, tenure_bins),
        };
        tracing::debug!(
            customers = report.total_customers,
            churn_rate = report.churn_rate,
            "built churn report"
        );
        report
    }
}

/// Group rows by a categorical column and compute per-group churn rates
///
/// Groups come back in alphabetical order.
fn category_rates<'a, F>(rows: &'a [DatasetRow], key: F) -> Vec<CategoryRate>
where
    F: Fn(&'a DatasetRow) -> &'a str,
{
    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(key(row)).or_default();
        entry.0 += 1;
        entry.1 += usize::from(row.churned());
    }

    groups
        .into_iter()
        .map(|(category, (customers, churned))| CategoryRate {
            category: category.to_string(),
            customers,
            churn_rate: churned as f64 / customers as f64,
        })
        .collect()
}

fn outcome_split<F>(rows: &[DatasetRow], value: F) -> OutcomeSplit
where
    F: Fn(&DatasetRow) -> f64,
{
    let side = |churned: bool| {
        let values: Vec<f64> = rows
            .iter()
            .filter(|r| r.churned() == churned)
            .map(&value)
            .collect();
        FiveNumberSummary::from_data(&values)
    };

    OutcomeSplit {
        stay: side(false),
        churn: side(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use churn_core::ChurnLabel;

    fn row(
        gender: &str,
        location: &str,
        account_type: &str,
        failed: u32,
        tenure: u32,
        churn: u8,
    ) -> DatasetRow {
        DatasetRow {
            age: 30,
            gender: gender.to_string(),
            location: location.to_string(),
            account_type: account_type.to_string(),
            transactions_last_30d: 10,
            avg_transaction_value: 1000.0,
            failed_transactions: failed,
            sms_alerts: "Yes".to_string(),
            complaints_logged: 0,
            customer_tenure_months: tenure,
            churn: ChurnLabel::try_from(churn).unwrap(),
        }
    }

    fn sample_dataset() -> Dataset {
        Dataset::from_rows(vec![
            row("Male", "Urban", "Savings", 1, 24, 0),
            row("Male", "Urban", "Savings", 2, 30, 0),
            row("Male", "Rural", "Current", 6, 4, 1),
            row("Female", "Urban", "Mobile Wallet", 0, 18, 0),
            row("Female", "Rural", "Mobile Wallet", 8, 2, 1),
            row("Female", "Rural", "Current", 5, 6, 1),
        ])
        .unwrap()
    }

    #[test]
    fn test_overall_rate() {
        let report = ChurnReport::from_dataset(&sample_dataset());
        assert_eq!(report.total_customers, 6);
        assert_eq!(report.churned_customers, 3);
        assert!((report.churn_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rates_by_gender_alphabetical() {
        let report = ChurnReport::from_dataset(&sample_dataset());

        assert_eq!(report.by_gender.len(), 2);
        assert_eq!(report.by_gender[0].category, "Female");
        assert_eq!(report.by_gender[0].customers, 3);
        assert!((report.by_gender[0].churn_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.by_gender[1].category, "Male");
        assert!((report.by_gender[1].churn_rate - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rates_by_account_type() {
        let report = ChurnReport::from_dataset(&sample_dataset());

        let rates: Vec<(&str, f64)> = report
            .by_account_type
            .iter()
            .map(|r| (r.category.as_str(), r.churn_rate))
            .collect();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates[0].0, "Current");
        assert!((rates[0].1 - 1.0).abs() < 1e-9);
        assert_eq!(rates[1].0, "Mobile Wallet");
        assert!((rates[1].1 - 0.5).abs() < 1e-9);
        assert_eq!(rates[2].0, "Savings");
        assert!(rates[2].1.abs() < 1e-9);
    }

    #[test]
    fn test_transaction_value_overview() {
        let mut rows = vec![
            row("Male", "Urban", "Savings", 1, 24, 0),
            row("Female", "Rural", "Current", 6, 4, 1),
            row("Male", "Urban", "Savings", 2, 30, 0),
        ];
        rows[0].avg_transaction_value = 500.0;
        rows[1].avg_transaction_value = 1500.0;
        rows[2].avg_transaction_value = 2500.0;
        let report = ChurnReport::from_dataset(&Dataset::from_rows(rows).unwrap());

        let stats = &report.transaction_value;
        assert_eq!(stats.count, 3);
        assert_eq!(stats.missing, 0);
        assert!((stats.mean - 1500.0).abs() < 1e-9);
        assert_eq!(stats.median, 1500.0);
        assert_eq!(stats.min, 500.0);
        assert_eq!(stats.max, 2500.0);
    }

    #[test]
    fn test_failed_transactions_split() {
        let report = ChurnReport::from_dataset(&sample_dataset());

        let stay = report.failed_transactions.stay.unwrap();
        let churn = report.failed_transactions.churn.unwrap();
        // Stayers logged 0-2 failures, churners 5-8
        assert_eq!(stay.min, 0.0);
        assert_eq!(stay.max, 2.0);
        assert_eq!(churn.min, 5.0);
        assert_eq!(churn.max, 8.0);
        assert!(churn.median > stay.median);
    }

    #[test]
    fn test_split_with_single_outcome() {
        let dataset =
            Dataset::from_rows(vec![row("Male", "Urban", "Savings", 1, 12, 0)]).unwrap();
        let report = ChurnReport::from_dataset(&dataset);

        assert!(report.failed_transactions.stay.is_some());
        assert!(report.failed_transactions.churn.is_none());
        assert_eq!(report.churned_customers, 0);
    }

    #[test]
    fn test_tenure_histogram_shares_edges() {
        let report = ChurnReport::with_bins(&sample_dataset(), 7);
        let tenure = &report.tenure;

        assert_eq!(tenure.bins(), 7);
        assert_eq!(tenure.stay.start, tenure.churn.start);
        assert_eq!(tenure.stay.bin_width, tenure.churn.bin_width);

        // Every customer lands in exactly one bin on one side
        let total: u64 = (0..tenure.bins()).map(|i| tenure.total_in_bin(i)).sum();
        assert_eq!(total, 6);
        // Tenure spans 2..=30 months across both outcomes
        assert_eq!(tenure.stay.start, 2.0);
        assert_eq!(tenure.stay.counts.iter().sum::<u64>(), 3);
        assert_eq!(tenure.churn.counts.iter().sum::<u64>(), 3);
    }

    #[test]
    fn test_default_binning() {
        let report = ChurnReport::from_dataset(&sample_dataset());
        assert_eq!(report.tenure.bins(), DEFAULT_TENURE_BINS);
    }
}
