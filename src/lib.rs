//! Fraud detector: rule-based classification of card transactions.
//!
//! Modular structure:
//! - [`features`] — Transaction records, feature generation, time formatting, presets
//! - [`model`] — Prediction types and the fixed decision-tree classifier
//! - [`risk`] — Weighted risk-score classifier
//! - [`history`] — Owned prediction history
//! - [`export`] — CSV export and re-import
//! - [`logging`] — Structured logging

pub mod config;
pub mod error;
pub mod export;
pub mod features;
pub mod history;
pub mod logging;
pub mod model;
pub mod risk;

pub use config::DetectorConfig;
pub use error::{Error, Result};
pub use features::{format_time, generate_feature_vector, FeatureGenerator, TransactionRecord};
pub use history::{HistoryEntry, PredictionHistory};
pub use logging::StructuredLogger;
pub use model::{Classifier, DecisionTreeClassifier, ModelKind, Prediction, PredictionResult, Risk};
pub use risk::RiskScoreClassifier;

use std::sync::Arc;

/// Build the decision-tree classifier a config describes, loading a custom
/// tree when one is named.
pub fn decision_tree_from_config(config: &DetectorConfig) -> Result<DecisionTreeClassifier> {
    let tree = match &config.tree_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let tree = model::DecisionTree::from_json(&json)?;
            tracing::info!(path = %path.display(), nodes = tree.n_nodes(), "loaded decision tree");
            Arc::new(tree)
        }
        None => model::fraud_tree(),
    };
    Ok(DecisionTreeClassifier::with_tree(tree, config.confidence))
}
