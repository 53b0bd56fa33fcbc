//! Dataset loading and export
//!
//! The historical dataset is a CSV file with one row per customer: the
//! ten feature columns plus the observed `churn` outcome. This module
//! reads it eagerly (the files are small, tens of thousands of rows at
//! most) and can re-encode it for export. The source file is never
//! mutated.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use churn_core::FEATURE_NAMES;
use thiserror::Error;

use crate::row::DatasetRow;

/// Errors that can occur while reading or exporting the dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset file not found: {0}")]
    NotFound(String),

    #[error("Failed to open dataset: {0}")]
    OpenFailed(String),

    #[error("Dataset is missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Bad dataset row at line {line}: {message}")]
    Row { line: usize, message: String },

    #[error("Dataset contains no rows")]
    Empty,

    #[error("Failed to export dataset: {0}")]
    ExportFailed(String),
}

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// The loaded historical dataset, row order preserved
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<DatasetRow>,
}

impl Dataset {
    /// Load a dataset file
    pub fn load(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DatasetError::NotFound(path.display().to_string()));
        }

        let file =
            File::open(path).map_err(|e| DatasetError::OpenFailed(e.to_string()))?;
        let dataset = Self::from_reader(BufReader::new(file))?;
        tracing::info!(
            rows = dataset.len(),
            path = %path.display(),
            "loaded churn dataset"
        );
        Ok(dataset)
    }

    /// Parse CSV from any reader
    pub fn from_reader(reader: impl io::Read) -> DatasetResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| DatasetError::OpenFailed(e.to_string()))?
            .clone();
        let missing: Vec<String> = expected_columns()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns { missing });
        }

        let mut rows = Vec::new();
        for (idx, result) in csv_reader.deserialize::<DatasetRow>().enumerate() {
            // Line 1 is the header, data starts on line 2
            let row = result.map_err(|e| DatasetError::Row {
                line: idx + 2,
                message: e.to_string(),
            })?;
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(DatasetError::Empty);
        }

        Ok(Self { rows })
    }

    /// Build a dataset from rows already in memory
    pub fn from_rows(rows: Vec<DatasetRow>) -> DatasetResult<Self> {
        if rows.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows, the sample view
    pub fn head(&self, n: usize) -> &[DatasetRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Re-encode every row as CSV
    pub fn export_csv(&self, writer: impl io::Write) -> DatasetResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer
                .serialize(row)
                .map_err(|e| DatasetError::ExportFailed(e.to_string()))?;
        }
        csv_writer
            .flush()
            .map_err(|e| DatasetError::ExportFailed(e.to_string()))?;
        Ok(())
    }

    /// Export to a file path
    pub fn export_csv_to(&self, path: impl AsRef<Path>) -> DatasetResult<()> {
        let file =
            File::create(path.as_ref()).map_err(|e| DatasetError::ExportFailed(e.to_string()))?;
        self.export_csv(file)
    }
}

fn expected_columns() -> impl Iterator<Item = &'static str> {
    FEATURE_NAMES.iter().copied().chain(["churn"])
}
