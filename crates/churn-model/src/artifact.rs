//! On-disk model artifact format
//!
//! The trained random forest ships as a single JSON document. Every tree
//! is flattened into a node array: split nodes hold child indices that
//! always point forward in the array, leaves hold the training class
//! counts. The artifact also records the feature schema it was trained
//! against, so a stale or reordered encoder is caught at load time
//! instead of silently mis-scoring.

use chrono::{DateTime, Utc};
use churn_core::{ModelUnavailable, FEATURE_NAMES, FEATURE_SCHEMA_VERSION, NUM_FEATURES};
use serde::{Deserialize, Serialize};

/// One node of a flattened decision tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal decision: `x[feature] <= threshold` goes left, else right
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal node holding training counts per class `[stay, churn]`
    Leaf { class_counts: [f64; 2] },
}

/// A single decision tree, nodes flattened with the root at index 0
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeArtifact {
    pub nodes: Vec<TreeNode>,
}

/// The full serialized model document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Feature schema the forest was trained against
    pub schema_version: u32,
    pub model_name: String,
    pub trained_at: DateTime<Utc>,
    /// Training feature order; must match the encoder exactly
    pub feature_names: Vec<String>,
    pub feature_importances: Vec<f64>,
    pub n_classes: usize,
    pub trees: Vec<TreeArtifact>,
}

impl ModelArtifact {
    /// Parse an artifact document without validating it
    pub fn from_json(raw: &str) -> Result<Self, ModelUnavailable> {
        serde_json::from_str(raw).map_err(|e| ModelUnavailable::Corrupt {
            message: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String, ModelUnavailable> {
        serde_json::to_string_pretty(self).map_err(|e| ModelUnavailable::Corrupt {
            message: e.to_string(),
        })
    }

    /// Check the artifact against the encoder contract and its own
    /// structural invariants
    ///
    /// Runs once at load; scoring relies on these checks so it can walk
    /// trees without revalidating.
    pub fn validate(&self) -> Result<(), ModelUnavailable> {
        if self.schema_version != FEATURE_SCHEMA_VERSION {
            return Err(ModelUnavailable::SchemaVersionMismatch {
                expected: FEATURE_SCHEMA_VERSION,
                found: self.schema_version,
            });
        }

        for (position, (expected, found)) in
            FEATURE_NAMES.iter().zip(&self.feature_names).enumerate()
        {
            if found.as_str() != *expected {
                return Err(ModelUnavailable::FeatureOrderMismatch {
                    position,
                    expected: (*expected).to_string(),
                    found: found.clone(),
                });
            }
        }
        if self.feature_names.len() != NUM_FEATURES {
            return Err(ModelUnavailable::Corrupt {
                message: format!(
                    "expected {NUM_FEATURES} feature names, found {}",
                    self.feature_names.len()
                ),
            });
        }

        if self.feature_importances.len() != NUM_FEATURES {
            return Err(ModelUnavailable::MalformedImportances {
                expected: NUM_FEATURES,
                found: self.feature_importances.len(),
            });
        }
        if self.feature_importances.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ModelUnavailable::Corrupt {
                message: "feature importances must be finite and non-negative".to_string(),
            });
        }

        if self.n_classes != 2 {
            return Err(ModelUnavailable::Corrupt {
                message: format!("expected a binary classifier, found {} classes", self.n_classes),
            });
        }

        if self.trees.is_empty() {
            return Err(ModelUnavailable::Corrupt {
                message: "artifact contains no trees".to_string(),
            });
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            validate_tree(tree_idx, tree)?;
        }

        Ok(())
    }
}

fn validate_tree(tree_idx: usize, tree: &TreeArtifact) -> Result<(), ModelUnavailable> {
    let corrupt = |message: String| ModelUnavailable::Corrupt { message };

    if tree.nodes.is_empty() {
        return Err(corrupt(format!("tree {tree_idx} has no nodes")));
    }

    for (node_idx, node) in tree.nodes.iter().enumerate() {
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= NUM_FEATURES {
                    return Err(corrupt(format!(
                        "tree {tree_idx} node {node_idx} splits on feature {feature}, \
                         model has {NUM_FEATURES}"
                    )));
                }
                if !threshold.is_finite() {
                    return Err(corrupt(format!(
                        "tree {tree_idx} node {node_idx} has non-finite threshold"
                    )));
                }
                // Children must point forward in the array; this rules out
                // cycles and lets scoring walk without a visited set.
                for child in [*left, *right] {
                    if child <= node_idx || child >= tree.nodes.len() {
                        return Err(corrupt(format!(
                            "tree {tree_idx} node {node_idx} has invalid child index {child}"
                        )));
                    }
                }
            }
            TreeNode::Leaf { class_counts } => {
                let total: f64 = class_counts.iter().sum();
                if !total.is_finite() || total <= 0.0 || class_counts.iter().any(|c| *c < 0.0) {
                    return Err(corrupt(format!(
                        "tree {tree_idx} node {node_idx} has invalid class counts \
                         {class_counts:?}"
                    )));
                }
            }
        }
    }

    Ok(())
}
