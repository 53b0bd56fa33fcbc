//! churn-core - Customer records, feature encoding, and churn scoring
//!
//! This crate provides the core prediction pipeline for the USSD banking
//! churn system: typed customer records, the fixed feature encoding the
//! model was trained against, and a predictor that turns classifier
//! probabilities into a churn verdict.
//!
//! # Key Components
//!
//! - **CustomerRecord**: Validated customer profile (demographics, usage, tenure)
//! - **FeatureVector**: The ten-feature numeric encoding, in training order
//! - **Classifier**: Trait boundary for the scoring backend
//! - **ChurnPredictor**: Encode-then-score pipeline with the decision rule
//! - **CoreError**: Input, model-availability, and prediction failure contract
//!
//! The encoding is part of the model contract: categorical codes and
//! feature positions here must match the artifact the classifier was
//! trained from, and the encoder refuses records that fall outside the
//! training domain rather than extrapolating.

pub mod classifier;
pub mod encoder;
pub mod error;
pub mod predictor;
pub mod record;

pub use classifier::{ChurnLabel, Classifier};
pub use encoder::{encode, FeatureVector, FEATURE_NAMES, FEATURE_SCHEMA_VERSION, NUM_FEATURES};
pub use error::{CoreError, CoreResult, InvalidInput, ModelUnavailable, PredictionError};
pub use predictor::{ChurnPredictor, FeatureImportance, PredictionResult};
pub use record::{
    AccountType, CustomerRecord, Gender, Location, SmsAlerts, AGE_MAX, AGE_MIN, TENURE_MIN_MONTHS,
};
