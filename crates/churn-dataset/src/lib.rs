//! churn-dataset - Historical dataset ingest and descriptive analytics
//!
//! Reads the USSD customer churn dataset (CSV, one row per historical
//! customer with the observed outcome) and aggregates it into the
//! figures the analytics dashboard shows: overall and per-category churn
//! rates, outcome-split distributions, and the tenure histogram.
//!
//! # Key Components
//!
//! - **Dataset**: Eagerly loaded rows, export back to CSV
//! - **DatasetRow**: One customer observation with its churn outcome
//! - **ChurnReport**: All dashboard aggregates in one structure
//! - **SummaryStats / FiveNumberSummary / Histogram**: The numeric
//!   primitives behind the report
//!
//! The dataset file is consumed read-only.

pub mod reader;
pub mod report;
pub mod row;
pub mod stats;

pub use reader::{Dataset, DatasetError, DatasetResult};
pub use report::{
    CategoryRate, ChurnReport, OutcomeSplit, TenureHistogram, DEFAULT_TENURE_BINS,
};
pub use row::DatasetRow;
pub use stats::{FiveNumberSummary, Histogram, SummaryStats};
