//! Error types for churn-core
//!
//! The three error kinds cover the prediction pipeline's whole failure
//! surface:
//! - `InvalidInput`: a record rejected before encoding (recoverable)
//! - `ModelUnavailable`: the classifier artifact is unusable at startup (fatal)
//! - `PredictionError`: the classifier failed on a well-formed vector
//!   (non-fatal, the predictor stays usable)

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for churn prediction operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Record rejected before encoding
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// Classifier artifact missing or unusable at startup
    #[error("model unavailable: {0}")]
    ModelUnavailable(#[from] ModelUnavailable),

    /// Classifier invocation failed on a well-formed vector
    #[error("prediction failed: {0}")]
    Prediction(#[from] PredictionError),
}

/// A record field rejected before encoding
///
/// Intake forms constrain every field to these ranges already, so this
/// surfaces only when the encoder is driven directly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInput {
    /// Value outside a closed range
    #[error("{field} = {value} outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Value below an open-ended minimum
    #[error("{field} = {value} below minimum {min}")]
    BelowMinimum {
        field: &'static str,
        value: f64,
        min: f64,
    },

    /// Non-finite float
    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },

    /// Unrecognized categorical value
    #[error("unknown {field} category: '{value}', expected one of: {}", .expected.join(", "))]
    UnknownCategory {
        field: &'static str,
        value: String,
        /// Accepted labels, in form display order
        expected: Vec<&'static str>,
    },
}

/// The classifier artifact could not be loaded at process start
#[derive(Error, Debug)]
pub enum ModelUnavailable {
    /// Artifact file missing
    #[error("model artifact not found: {path}")]
    NotFound { path: PathBuf },

    /// Artifact file could not be read
    #[error("model artifact unreadable: {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    /// Artifact contents failed to decode or validate
    #[error("model artifact corrupt: {message}")]
    Corrupt { message: String },

    /// Artifact was trained against a different feature schema
    #[error("feature schema version mismatch: encoder {expected}, artifact {found}")]
    SchemaVersionMismatch { expected: u32, found: u32 },

    /// Artifact feature order disagrees with the encoder
    #[error("feature order mismatch at position {position}: encoder '{expected}', artifact '{found}'")]
    FeatureOrderMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    /// Importance vector arity does not match the feature count
    #[error("importance vector has {found} entries, expected {expected}")]
    MalformedImportances { expected: usize, found: usize },
}

/// The classifier failed while scoring a well-formed vector
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    /// Classifier demanded more features than the vector carries
    #[error("classifier expected {expected} features, got {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// Classifier produced a probability outside [0, 1]
    #[error("classifier returned probability {value} outside [0, 1]")]
    InvalidProbability { value: f64 },

    /// Any other classifier-side failure
    #[error("classifier failure: {message}")]
    ClassifierFailure { message: String },
}

/// Result type alias for churn prediction operations
pub type CoreResult<T> = Result<T, CoreError>;
