//! Subcommand implementations
//!
//! Each command resolves its collaborators (model, dataset) from the
//! configuration, runs one request, and prints plain-text tables. All
//! failures come back as `CliError` so `main` can print one friendly
//! line and exit non-zero; nothing in here panics on user input.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use churn_core::{
    ChurnPredictor, CoreError, CustomerRecord, FeatureImportance, ModelUnavailable,
    PredictionResult,
};
use churn_dataset::{CategoryRate, ChurnReport, Dataset, DatasetError, DatasetRow};
use churn_model::RandomForestModel;
use thiserror::Error;

use crate::config::{AppConfig, ConfigError};

/// Width of the text bars in report output
const BAR_WIDTH: f64 = 40.0;

/// Any failure a subcommand can surface
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot read input file {path}: {message}")]
    InputFile { path: PathBuf, message: String },

    #[error("Invalid customer record in {path}: {message}")]
    InputParse { path: PathBuf, message: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Model(#[from] ModelUnavailable),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Score one customer record from a JSON file
pub fn predict(config: &AppConfig, input: &Path, importance: bool) -> Result<(), CliError> {
    let record = read_record(input)?;

    let model = RandomForestModel::load(&config.model_path)?;
    let predictor = ChurnPredictor::new(Arc::new(model));
    let result = predictor.predict(&record)?;
    tracing::debug!(
        model = predictor.model_name(),
        label = %result.label,
        churn_probability = result.churn_probability,
        "scored record"
    );

    print!("{}", render_record(&record));
    println!();
    println!("{}", result.summary());
    println!();
    print!("{}", render_probabilities(&result));

    if importance {
        println!();
        print!(
            "{}",
            render_importance(&predictor.feature_importance_ranking())
        );
    }
    Ok(())
}

/// Print the analytics report over the historical dataset
pub fn report(config: &AppConfig) -> Result<(), CliError> {
    let dataset = Dataset::load(&config.dataset_path)?;
    let report = ChurnReport::with_bins(&dataset, config.histogram_bins);
    print!("{}", render_report(&report));
    Ok(())
}

/// Print the first rows of the dataset
pub fn sample(config: &AppConfig, rows: usize) -> Result<(), CliError> {
    let dataset = Dataset::load(&config.dataset_path)?;
    print!("{}", render_sample(dataset.head(rows)));
    println!();
    println!("{} of {} rows", dataset.head(rows).len(), dataset.len());
    Ok(())
}

/// Write a copy of the dataset as CSV
pub fn export(config: &AppConfig, output: &Path) -> Result<(), CliError> {
    let dataset = Dataset::load(&config.dataset_path)?;
    dataset.export_csv_to(output)?;
    println!("Exported {} rows to {}", dataset.len(), output.display());
    Ok(())
}

fn read_record(path: &Path) -> Result<CustomerRecord, CliError> {
    let raw = fs::read_to_string(path).map_err(|e| CliError::InputFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| CliError::InputParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn bar(fraction: f64) -> String {
    let n = (fraction.clamp(0.0, 1.0) * BAR_WIDTH).round() as usize;
    "#".repeat(n)
}

fn render_record(record: &CustomerRecord) -> String {
    let mut out = String::from("Customer input\n");
    let mut field = |label: &str, value: String| {
        out.push_str(&format!("  {label:<30} {value}\n"));
    };

    field("Age", record.age.to_string());
    field("Gender", record.gender.to_string());
    field("Location", record.location.to_string());
    field("Account Type", record.account_type.to_string());
    field(
        "Transactions (Last 30 Days)",
        record.transactions_last_30d.to_string(),
    );
    field(
        "Average Transaction Value (₦)",
        format!("{:.2}", record.avg_transaction_value),
    );
    field(
        "Failed Transactions",
        record.failed_transactions.to_string(),
    );
    field("SMS Alerts", record.sms_alerts.to_string());
    field("Complaints Logged", record.complaints_logged.to_string());
    field(
        "Customer Tenure (Months)",
        record.customer_tenure_months.to_string(),
    );
    out
}

fn render_probabilities(result: &PredictionResult) -> String {
    format!(
        "  Stay   {:>5.2}  {}\n  Churn  {:>5.2}  {}\n",
        result.stay_probability,
        bar(result.stay_probability),
        result.churn_probability,
        bar(result.churn_probability),
    )
}

fn render_importance(ranking: &[FeatureImportance]) -> String {
    let mut out = String::from("Feature importance\n");
    for entry in ranking {
        out.push_str(&format!(
            "  {:<24} {:>6.3}  {}\n",
            entry.feature,
            entry.importance,
            bar(entry.importance)
        ));
    }
    out
}

fn render_rates(title: &str, rates: &[CategoryRate]) -> String {
    let mut out = format!("{title}\n");
    for rate in rates {
        out.push_str(&format!(
            "  {:<14} {:>6}  {:>5.1}%  {}\n",
            rate.category,
            rate.customers,
            rate.churn_rate * 100.0,
            bar(rate.churn_rate)
        ));
    }
    out
}

fn render_report(report: &ChurnReport) -> String {
    let mut out = String::from("Churn analytics report\n");
    out.push_str(&format!(
        "  Generated {}\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "  {:<14} {:>6}\n  {:<14} {:>6}\n  {:<14} {:>5.1}%\n\n",
        "Customers",
        report.total_customers,
        "Churned",
        report.churned_customers,
        "Churn rate",
        report.churn_rate * 100.0
    ));

    let value = &report.transaction_value;
    out.push_str(&format!(
        "  Avg transaction value (₦): mean {:.2}, median {:.2}, std dev {:.2}\n\n",
        value.mean, value.median, value.std_dev
    ));

    out.push_str(&render_rates("Churn rate by gender", &report.by_gender));
    out.push('\n');
    out.push_str(&render_rates("Churn rate by location", &report.by_location));
    out.push('\n');
    out.push_str(&render_rates(
        "Churn rate by account type",
        &report.by_account_type,
    ));
    out.push('\n');

    out.push_str("Failed transactions by outcome\n");
    out.push_str(&format!(
        "  {:<7} {:>6} {:>6} {:>7} {:>6} {:>6}\n",
        "", "min", "q1", "median", "q3", "max"
    ));
    for (label, summary) in [
        ("Stay", &report.failed_transactions.stay),
        ("Churn", &report.failed_transactions.churn),
    ] {
        match summary {
            Some(s) => out.push_str(&format!(
                "  {:<7} {:>6.1} {:>6.1} {:>7.1} {:>6.1} {:>6.1}\n",
                label, s.min, s.q1, s.median, s.q3, s.max
            )),
            None => out.push_str(&format!("  {label:<7} no customers\n")),
        }
    }
    out.push('\n');

    out.push_str("Tenure (months) by outcome\n");
    let tenure = &report.tenure;
    let peak = (0..tenure.bins())
        .map(|i| tenure.total_in_bin(i))
        .max()
        .unwrap_or(0)
        .max(1);
    for i in 0..tenure.bins() {
        if tenure.total_in_bin(i) == 0 {
            continue;
        }
        let (lo, hi) = tenure.stay.bin_range(i);
        out.push_str(&format!(
            "  [{:>4.1}, {:>4.1})  stay {:>5}  churn {:>5}  {}\n",
            lo,
            hi,
            tenure.stay.counts[i],
            tenure.churn.counts[i],
            bar(tenure.total_in_bin(i) as f64 / peak as f64)
        ));
    }
    out
}

fn render_sample(rows: &[DatasetRow]) -> String {
    let mut out = format!(
        "{:<4} {:<7} {:<9} {:<14} {:>6} {:>10} {:>7} {:<4} {:>6} {:>7} {:>6}\n",
        "age",
        "gender",
        "location",
        "account",
        "txn30",
        "avg_val",
        "failed",
        "sms",
        "compl",
        "tenure",
        "churn"
    );
    for row in rows {
        out.push_str(&format!(
            "{:<4} {:<7} {:<9} {:<14} {:>6} {:>10.2} {:>7} {:<4} {:>6} {:>7} {:>6}\n",
            row.age,
            row.gender,
            row.location,
            row.account_type,
            row.transactions_last_30d,
            row.avg_transaction_value,
            row.failed_transactions,
            row.sms_alerts,
            row.complaints_logged,
            row.customer_tenure_months,
            u8::from(row.churn)
        ));
    }
    out
}
