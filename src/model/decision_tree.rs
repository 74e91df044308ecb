//! Decision-tree classifier: traverse the tree, then nudge the leaf's base
//! confidence by how far the record sits from the tree's key thresholds.

use super::tree::{fraud_tree, DecisionTree};
use super::{round_to, Classifier, ModelKind, Prediction, PredictionResult, Risk};
use crate::config::ConfidencePolicy;
use crate::features::{Feature, TransactionRecord};
use std::sync::Arc;
use tracing::debug;

/// End of the suspicious night window (3 AM).
const NIGHT_END: f64 = 10800.0;
const SMALL_AMOUNT: f64 = 5.0;
const LARGE_AMOUNT: f64 = 10000.0;
const LARGE_AMOUNT_SPAN: f64 = 5000.0;
const V17_LIMIT: f64 = 2.0;
const V14_LIMIT: f64 = 1.5;
const MIN_CONFIDENCE: f64 = 0.5;
const MAX_CONFIDENCE: f64 = 0.99;

/// Adjust a leaf's base confidence (0..1) for the record; result is clamped
/// to [0.5, 0.99].
pub fn adjust_confidence(prediction: Prediction, base: f64, record: &TransactionRecord) -> f64 {
    let time = record.time();
    let amount = record.amount();
    let v14 = record.value(Feature::V(14)).abs();
    let v17 = record.value(Feature::V(17)).abs();
    let pattern_abnormal = v17 > V17_LIMIT || v14 > V14_LIMIT;

    let mut confidence = base;
    match prediction {
        Prediction::Fraud => {
            if time < NIGHT_END {
                confidence += 0.05 * (1.0 - time / NIGHT_END);
            }
            if amount < SMALL_AMOUNT {
                confidence += 0.07 * (1.0 - amount / SMALL_AMOUNT);
            }
            if amount > LARGE_AMOUNT {
                confidence += 0.05 * ((amount - LARGE_AMOUNT) / LARGE_AMOUNT_SPAN).min(1.0);
            }
            if pattern_abnormal {
                confidence += 0.03;
            }
        }
        Prediction::NotFraud => {
            if time >= NIGHT_END {
                confidence += 0.02;
            }
            if (SMALL_AMOUNT..=LARGE_AMOUNT).contains(&amount) {
                confidence += 0.03;
            }
            if !pattern_abnormal {
                confidence += 0.04;
            }
        }
    }
    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

pub struct DecisionTreeClassifier {
    tree: Arc<DecisionTree>,
    policy: ConfidencePolicy,
}

impl DecisionTreeClassifier {
    /// Built-in tree with adjusted confidence.
    pub fn new() -> Self {
        Self::with_tree(fraud_tree(), ConfidencePolicy::default())
    }

    pub fn with_tree(tree: Arc<DecisionTree>, policy: ConfidencePolicy) -> Self {
        Self { tree, policy }
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    pub fn policy(&self) -> ConfidencePolicy {
        self.policy
    }
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for DecisionTreeClassifier {
    fn kind(&self) -> ModelKind {
        ModelKind::DecisionTree
    }

    fn classify(&self, record: &TransactionRecord) -> PredictionResult {
        let traversal = self.tree.traverse(record);
        let confidence = match self.policy {
            ConfidencePolicy::Static => traversal.base_confidence,
            ConfidencePolicy::Adjusted => {
                adjust_confidence(traversal.prediction, traversal.base_confidence, record)
            }
        };
        // Risk follows the prediction alone; confidence does not move it.
        let risk = if traversal.prediction.is_fraud() {
            Risk::High
        } else {
            Risk::Low
        };

        debug!(
            leaf = traversal.leaf,
            prediction = %traversal.prediction,
            base = traversal.base_confidence,
            confidence,
            "decision tree classified transaction"
        );

        PredictionResult {
            prediction: traversal.prediction,
            confidence: round_to(confidence * 100.0, 2),
            risk,
            features: record.snapshot(),
            details: traversal.details,
        }
    }
}
