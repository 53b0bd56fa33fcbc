//! The classifier contract
//!
//! The trained model is opaque to this crate: anything that can turn a
//! feature vector into class probabilities can drive the predictor. The
//! concrete artifact loader lives in `churn-model`; tests use in-memory
//! stubs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::encoder::FeatureVector;
use crate::error::PredictionError;

/// Binary churn outcome
///
/// Integer codes (Stay 0, Churn 1) match both the training labels and the
/// historical dataset's churn column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChurnLabel {
    Stay,
    Churn,
}

impl ChurnLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChurnLabel::Stay => "Stay",
            ChurnLabel::Churn => "Churn",
        }
    }

    /// Label implied by a churn probability
    ///
    /// Churn wins strictly above one half; an exact tie resolves to Stay,
    /// matching argmax over `[p_stay, p_churn]` with first-maximum
    /// preference.
    pub fn from_churn_probability(p_churn: f64) -> Self {
        if p_churn > 0.5 {
            ChurnLabel::Churn
        } else {
            ChurnLabel::Stay
        }
    }
}

impl fmt::Display for ChurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ChurnLabel> for u8 {
    fn from(label: ChurnLabel) -> Self {
        match label {
            ChurnLabel::Stay => 0,
            ChurnLabel::Churn => 1,
        }
    }
}

impl TryFrom<u8> for ChurnLabel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ChurnLabel::Stay),
            1 => Ok(ChurnLabel::Churn),
            other => Err(format!("invalid churn label {other}, expected 0 or 1")),
        }
    }
}

/// Interface the predictor uses to talk to a trained model
///
/// Implementations are loaded once at process start and shared read-only
/// for the life of the session; nothing here takes `&mut self`.
pub trait Classifier: Send + Sync {
    /// Class probabilities as `[p_stay, p_churn]`
    ///
    /// A well-behaved implementation returns values in [0, 1] summing
    /// to 1; the predictor re-checks before trusting them.
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], PredictionError>;

    /// Binary label for the vector
    ///
    /// Default: argmax of [`predict_proba`], going through scoring once so
    /// label and probabilities can never disagree.
    ///
    /// [`predict_proba`]: Classifier::predict_proba
    fn predict(&self, features: &FeatureVector) -> Result<ChurnLabel, PredictionError> {
        let [_, p_churn] = self.predict_proba(features)?;
        Ok(ChurnLabel::from_churn_probability(p_churn))
    }

    /// Per-feature importance weights aligned to [`FEATURE_NAMES`]
    ///
    /// [`FEATURE_NAMES`]: crate::encoder::FEATURE_NAMES
    fn feature_importances(&self) -> &[f64];

    /// Human-readable model identifier for logs and UI footers
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_codes() {
        assert_eq!(u8::from(ChurnLabel::Stay), 0);
        assert_eq!(u8::from(ChurnLabel::Churn), 1);
        assert_eq!(ChurnLabel::try_from(1).unwrap(), ChurnLabel::Churn);
        assert!(ChurnLabel::try_from(2).is_err());
    }

    #[test]
    fn test_label_from_probability() {
        assert_eq!(
            ChurnLabel::from_churn_probability(0.82),
            ChurnLabel::Churn
        );
        assert_eq!(ChurnLabel::from_churn_probability(0.18), ChurnLabel::Stay);
        // Exact tie goes to Stay (first maximum).
        assert_eq!(ChurnLabel::from_churn_probability(0.5), ChurnLabel::Stay);
    }

    #[test]
    fn test_label_wire_format_is_integer() {
        let json = serde_json::to_string(&ChurnLabel::Churn).unwrap();
        assert_eq!(json, "1");
        let back: ChurnLabel = serde_json::from_str("0").unwrap();
        assert_eq!(back, ChurnLabel::Stay);
    }
}
