//! churn-model - Random-forest artifact loading and scoring
//!
//! Loads the trained churn classifier from its JSON artifact, checks it
//! against the feature schema churn-core encodes, and serves predictions
//! through the [`churn_core::Classifier`] trait.
//!
//! # Key Components
//!
//! - **ModelArtifact**: The serialized document, with load-time validation
//! - **RandomForestModel**: Validated forest implementing `Classifier`
//!
//! A model that fails any load-time check is reported as unavailable and
//! never scores a single request; there is no degraded mode.

pub mod artifact;
pub mod model;

pub use artifact::{ModelArtifact, TreeArtifact, TreeNode};
pub use model::RandomForestModel;
