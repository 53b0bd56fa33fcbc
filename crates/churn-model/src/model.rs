//! Random-forest scoring over validated artifacts

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use churn_core::{Classifier, FeatureVector, ModelUnavailable, PredictionError, NUM_FEATURES};

use crate::artifact::{ModelArtifact, TreeArtifact, TreeNode};

/// One flattened decision tree ready for scoring
#[derive(Clone, Debug)]
struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk from the root to a leaf and return the class distribution
    fn score(&self, x: &[f64]) -> Result<[f64; 2], PredictionError> {
        let mut idx = 0;
        // Validated trees only reference forward, so the walk is bounded
        // by the node count.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value =
                        x.get(*feature)
                            .copied()
                            .ok_or(PredictionError::ArityMismatch {
                                expected: NUM_FEATURES,
                                found: x.len(),
                            })?;
                    idx = if value <= *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { class_counts }) => {
                    let total = class_counts[0] + class_counts[1];
                    return Ok([class_counts[0] / total, class_counts[1] / total]);
                }
                None => break,
            }
        }
        Err(PredictionError::ClassifierFailure {
            message: "tree walk did not reach a leaf".to_string(),
        })
    }
}

/// A loaded random-forest churn model
///
/// Built once at startup from a JSON artifact and shared read-only for
/// the life of the process. Scoring averages the per-tree leaf class
/// distributions, the same probability a bagged forest reports.
#[derive(Debug)]
pub struct RandomForestModel {
    name: String,
    trained_at: DateTime<Utc>,
    feature_importances: Vec<f64>,
    trees: Vec<DecisionTree>,
}

impl RandomForestModel {
    /// Read and validate an artifact file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelUnavailable> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ModelUnavailable::NotFound {
                path: path.to_path_buf(),
            },
            _ => ModelUnavailable::Unreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        let artifact = ModelArtifact::from_json(&raw)?;
        let model = Self::from_artifact(artifact)?;
        tracing::info!(
            model = %model.name,
            trees = model.n_trees(),
            path = %path.display(),
            "loaded churn model"
        );
        Ok(model)
    }

    /// Validate a parsed artifact and prepare it for scoring
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelUnavailable> {
        artifact.validate()?;

        let trees = artifact
            .trees
            .into_iter()
            .map(|TreeArtifact { nodes }| DecisionTree { nodes })
            .collect();

        Ok(Self {
            name: artifact.model_name,
            trained_at: artifact.trained_at,
            feature_importances: artifact.feature_importances,
            trees,
        })
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for RandomForestModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], PredictionError> {
        let x = features.as_slice();
        let mut acc = [0.0_f64; 2];
        for tree in &self.trees {
            let dist = tree.score(x)?;
            acc[0] += dist[0];
            acc[1] += dist[1];
        }
        // validate() rejects empty forests
        let n = self.trees.len() as f64;
        Ok([acc[0] / n, acc[1] / n])
    }

    fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use churn_core::{encode, ChurnLabel, CustomerRecord, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};

    fn leaf(stay: f64, churn: f64) -> TreeNode {
        TreeNode::Leaf {
            class_counts: [stay, churn],
        }
    }

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    fn two_tree_artifact() -> ModelArtifact {
        ModelArtifact {
            schema_version: FEATURE_SCHEMA_VERSION,
            model_name: "test-forest".to_string(),
            trained_at: Utc::now(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            feature_importances: vec![0.1; NUM_FEATURES],
            n_classes: 2,
            trees: vec![
                // failed_transactions <= 2.5 leans stay, else churn
                TreeArtifact {
                    nodes: vec![split(6, 2.5, 1, 2), leaf(8.0, 2.0), leaf(1.0, 9.0)],
                },
                // short tenure leans churn
                TreeArtifact {
                    nodes: vec![split(9, 6.5, 1, 2), leaf(2.0, 8.0), leaf(9.0, 1.0)],
                },
            ],
        }
    }

    #[test]
    fn test_single_tree_walks_both_branches() {
        let tree = DecisionTree {
            nodes: vec![split(6, 2.5, 1, 2), leaf(8.0, 2.0), leaf(1.0, 9.0)],
        };

        let mut x = [0.0; NUM_FEATURES];
        x[6] = 2.0;
        assert_eq!(tree.score(&x).unwrap(), [0.8, 0.2]);

        x[6] = 5.0;
        assert_eq!(tree.score(&x).unwrap(), [0.1, 0.9]);

        // A value equal to the threshold goes left
        x[6] = 2.5;
        assert_eq!(tree.score(&x).unwrap(), [0.8, 0.2]);
    }

    #[test]
    fn test_short_vector_is_arity_mismatch() {
        let tree = DecisionTree {
            nodes: vec![split(6, 2.5, 1, 2), leaf(8.0, 2.0), leaf(1.0, 9.0)],
        };

        let err = tree.score(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::ArityMismatch {
                expected: 10,
                found: 2,
            }
        ));
    }

    #[test]
    fn test_cyclic_tree_does_not_hang() {
        // Bypasses artifact validation on purpose; the walk must still
        // terminate with an error.
        let tree = DecisionTree {
            nodes: vec![split(0, 1.0, 0, 0)],
        };
        let err = tree.score(&[0.0; NUM_FEATURES]).unwrap_err();
        assert!(matches!(err, PredictionError::ClassifierFailure { .. }));
    }

    #[test]
    fn test_forest_averages_tree_distributions() {
        let model = RandomForestModel::from_artifact(two_tree_artifact()).unwrap();

        // Loyal profile: few failed transactions, long tenure
        let record = CustomerRecord::default();
        let features = encode(&record).unwrap();
        let [p_stay, p_churn] = model.predict_proba(&features).unwrap();

        // Tree 1 gives [0.8, 0.2], tree 2 gives [0.9, 0.1]
        assert!((p_stay - 0.85).abs() < 1e-9);
        assert!((p_churn - 0.15).abs() < 1e-9);
        assert_eq!(model.predict(&features).unwrap(), ChurnLabel::Stay);
    }

    #[test]
    fn test_risky_profile_scores_churn() {
        let model = RandomForestModel::from_artifact(two_tree_artifact()).unwrap();

        let record = CustomerRecord {
            failed_transactions: 5,
            customer_tenure_months: 3,
            ..CustomerRecord::default()
        };
        let features = encode(&record).unwrap();
        let [p_stay, p_churn] = model.predict_proba(&features).unwrap();

        // Tree 1 gives [0.1, 0.9], tree 2 gives [0.2, 0.8]
        assert!((p_churn - 0.85).abs() < 1e-9);
        assert!((p_stay - 0.15).abs() < 1e-9);
        assert_eq!(model.predict(&features).unwrap(), ChurnLabel::Churn);
    }

    #[test]
    fn test_invalid_artifact_never_becomes_a_model() {
        let mut artifact = two_tree_artifact();
        artifact.schema_version += 1;
        assert!(matches!(
            RandomForestModel::from_artifact(artifact),
            Err(ModelUnavailable::SchemaVersionMismatch { .. })
        ));
    }
}
