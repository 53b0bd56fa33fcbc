//! Request/response churn scoring
//!
//! A stateless transform repeated on demand: encode the record, make one
//! scoring call, apply the decision rule. The classifier handle is
//! constructed once at startup and passed in explicitly; the predictor
//! never loads anything itself.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::classifier::{ChurnLabel, Classifier};
use crate::encoder::{encode, FeatureVector, FEATURE_NAMES};
use crate::error::{CoreResult, PredictionError};
use crate::record::CustomerRecord;

/// Outcome of one prediction request
///
/// `stay_probability` and `churn_probability` always sum to 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: ChurnLabel,
    pub churn_probability: f64,
    pub stay_probability: f64,
}

impl PredictionResult {
    fn from_churn_probability(p_churn: f64) -> Self {
        Self {
            label: ChurnLabel::from_churn_probability(p_churn),
            churn_probability: p_churn,
            stay_probability: 1.0 - p_churn,
        }
    }

    /// Probability of the predicted label
    pub fn confidence(&self) -> f64 {
        match self.label {
            ChurnLabel::Churn => self.churn_probability,
            ChurnLabel::Stay => self.stay_probability,
        }
    }

    /// One-line verdict for display
    pub fn summary(&self) -> String {
        match self.label {
            ChurnLabel::Churn => format!(
                "customer is likely to CHURN (probability {:.2})",
                self.churn_probability
            ),
            ChurnLabel::Stay => format!(
                "customer is likely to STAY (probability {:.2})",
                self.stay_probability
            ),
        }
    }
}

/// An importance weight joined with its feature name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Scores customer records against a loaded classifier
///
/// Holds the process-wide read-only model handle; cloning shares it.
#[derive(Clone)]
pub struct ChurnPredictor {
    classifier: Arc<dyn Classifier>,
}

impl ChurnPredictor {
    /// Wrap a classifier handle loaded at startup
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// Encode and score one record
    pub fn predict(&self, record: &CustomerRecord) -> CoreResult<PredictionResult> {
        let features = encode(record)?;
        Ok(self.predict_vector(&features)?)
    }

    /// Score an already-encoded vector
    ///
    /// Applies the decision rule: label Churn keeps the returned churn
    /// probability, label Stay displays one minus it. A classifier
    /// failure leaves the predictor fully usable for the next request.
    pub fn predict_vector(
        &self,
        features: &FeatureVector,
    ) -> Result<PredictionResult, PredictionError> {
        let [_, p_churn] = self.classifier.predict_proba(features)?;

        if !p_churn.is_finite() || !(0.0..=1.0).contains(&p_churn) {
            return Err(PredictionError::InvalidProbability { value: p_churn });
        }

        Ok(PredictionResult::from_churn_probability(p_churn))
    }

    /// Importances joined with feature names, highest first
    pub fn feature_importance_ranking(&self) -> Vec<FeatureImportance> {
        let mut ranking: Vec<FeatureImportance> = FEATURE_NAMES
            .iter()
            .zip(self.classifier.feature_importances())
            .map(|(name, &importance)| FeatureImportance {
                feature: (*name).to_string(),
                importance,
            })
            .collect();

        ranking.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranking
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, InvalidInput};

    /// Stub that always returns the same churn probability
    struct FixedClassifier {
        p_churn: f64,
        importances: Vec<f64>,
    }

    impl FixedClassifier {
        fn new(p_churn: f64) -> Self {
            Self {
                p_churn,
                importances: vec![0.1; FEATURE_NAMES.len()],
            }
        }
    }

    impl Classifier for FixedClassifier {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<[f64; 2], PredictionError> {
            Ok([1.0 - self.p_churn, self.p_churn])
        }

        fn feature_importances(&self) -> &[f64] {
            &self.importances
        }

        fn name(&self) -> &str {
            "fixed-stub"
        }
    }

    /// Stub that fails on every invocation
    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<[f64; 2], PredictionError> {
            Err(PredictionError::ClassifierFailure {
                message: "scoring backend exploded".to_string(),
            })
        }

        fn feature_importances(&self) -> &[f64] {
            &[]
        }

        fn name(&self) -> &str {
            "failing-stub"
        }
    }

    #[test]
    fn test_churn_verdict_keeps_returned_probability() {
        let predictor = ChurnPredictor::new(Arc::new(FixedClassifier::new(0.82)));
        let result = predictor.predict(&CustomerRecord::default()).unwrap();

        assert_eq!(result.label, ChurnLabel::Churn);
        assert!((result.churn_probability - 0.82).abs() < 1e-9);
        assert!((result.stay_probability - 0.18).abs() < 1e-9);
        assert!(result.summary().contains("CHURN"));
        assert!((result.confidence() - 0.82).abs() < 1e-9);
    }

    #[test]
    fn test_stay_verdict_complements_probability() {
        let predictor = ChurnPredictor::new(Arc::new(FixedClassifier::new(0.3)));
        let result = predictor.predict(&CustomerRecord::default()).unwrap();

        assert_eq!(result.label, ChurnLabel::Stay);
        assert!((result.stay_probability - 0.7).abs() < 1e-9);
        assert!(result.summary().contains("STAY"));
    }

    #[test]
    fn test_predict_vector_skips_encoding() {
        let predictor = ChurnPredictor::new(Arc::new(FixedClassifier::new(0.51)));
        let features = FeatureVector::from_array([
            30.0, 1.0, 1.0, 2.0, 15.0, 2000.0, 2.0, 1.0, 1.0, 12.0,
        ]);

        let result = predictor.predict_vector(&features).unwrap();
        assert_eq!(result.label, ChurnLabel::Churn);
        assert!((result.churn_probability - 0.51).abs() < 1e-9);
    }

    #[test]
    fn test_probabilities_always_sum_to_one() {
        for p in [0.0, 0.1, 0.25, 0.5, 0.500_000_1, 0.82, 0.999, 1.0] {
            let predictor = ChurnPredictor::new(Arc::new(FixedClassifier::new(p)));
            let result = predictor.predict(&CustomerRecord::default()).unwrap();
            let total = result.stay_probability + result.churn_probability;
            assert!(
                (total - 1.0).abs() < 1e-9,
                "p_churn {p}: probabilities sum to {total}"
            );
        }
    }

    #[test]
    fn test_failing_classifier_surfaces_and_recovers() {
        let predictor = ChurnPredictor::new(Arc::new(FailingClassifier));
        let record = CustomerRecord::default();

        let err = predictor.predict(&record).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Prediction(PredictionError::ClassifierFailure { .. })
        ));

        // The interaction loop stays usable: the same predictor accepts the
        // next request and fails the same controlled way, no poisoning.
        let err = predictor.predict(&record).unwrap_err();
        assert!(matches!(err, CoreError::Prediction(_)));
    }

    #[test]
    fn test_invalid_record_rejected_before_scoring() {
        let predictor = ChurnPredictor::new(Arc::new(FailingClassifier));
        let mut record = CustomerRecord::default();
        record.age = 17;

        // Encoding rejects first; the failing classifier is never reached.
        let err = predictor.predict(&record).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidInput(InvalidInput::OutOfRange { field: "age", .. })
        ));
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        struct Broken;
        impl Classifier for Broken {
            fn predict_proba(
                &self,
                _features: &FeatureVector,
            ) -> Result<[f64; 2], PredictionError> {
                Ok([-0.3, 1.3])
            }
            fn feature_importances(&self) -> &[f64] {
                &[]
            }
            fn name(&self) -> &str {
                "broken-stub"
            }
        }

        let predictor = ChurnPredictor::new(Arc::new(Broken));
        let err = predictor.predict(&CustomerRecord::default()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Prediction(PredictionError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn test_importance_ranking_sorted_descending() {
        struct Weighted {
            importances: Vec<f64>,
        }
        impl Classifier for Weighted {
            fn predict_proba(
                &self,
                _features: &FeatureVector,
            ) -> Result<[f64; 2], PredictionError> {
                Ok([0.5, 0.5])
            }
            fn feature_importances(&self) -> &[f64] {
                &self.importances
            }
            fn name(&self) -> &str {
                "weighted-stub"
            }
        }

        let mut importances = vec![0.01; FEATURE_NAMES.len()];
        importances[3] = 0.4; // account_type
        importances[6] = 0.25; // failed_transactions

        let predictor = ChurnPredictor::new(Arc::new(Weighted { importances }));
        let ranking = predictor.feature_importance_ranking();

        assert_eq!(ranking.len(), FEATURE_NAMES.len());
        assert_eq!(ranking[0].feature, "account_type");
        assert_eq!(ranking[1].feature, "failed_transactions");
        for pair in ranking.windows(2) {
            assert!(pair[0].importance >= pair[1].importance);
        }
    }
}
