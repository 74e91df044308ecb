//! Prediction types shared by both classifiers, the fixed decision tree and
//! its classifier.

mod decision_tree;
mod tree;

pub use decision_tree::{adjust_confidence, DecisionTreeClassifier};
pub use tree::{fraud_tree, DecisionTree, NodeId, TreeBuilder, TreeNode, Traversal};

use crate::error::Error;
use crate::features::{FeatureSnapshot, TransactionRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prediction {
    Fraud,
    #[serde(rename = "Not Fraud")]
    NotFraud,
}

impl Prediction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Fraud => "Fraud",
            Prediction::NotFraud => "Not Fraud",
        }
    }

    pub fn is_fraud(&self) -> bool {
        matches!(self, Prediction::Fraud)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Prediction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "Fraud" => Ok(Prediction::Fraud),
            "Not Fraud" => Ok(Prediction::NotFraud),
            other => Err(Error::MalformedRow(format!("unknown prediction {:?}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Risk {
    Low,
    High,
}

impl Risk {
    pub fn as_str(&self) -> &'static str {
        match self {
            Risk::Low => "low",
            Risk::High => "high",
        }
    }
}

/// Which classifier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    /// Weighted risk score.
    Standard,
    #[default]
    DecisionTree,
}

impl ModelKind {
    /// Same name the config file uses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Standard => "standard",
            ModelKind::DecisionTree => "decision-tree",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one classification. Confidence is a percentage in 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: Prediction,
    pub confidence: f64,
    pub risk: Risk,
    pub features: FeatureSnapshot,
    pub details: Vec<String>,
}

/// A pure mapping from a transaction to a prediction.
pub trait Classifier {
    fn kind(&self) -> ModelKind;

    fn classify(&self, record: &TransactionRecord) -> PredictionResult;
}

/// Integers without a trailing `.0`, everything else in shortest form.
pub(crate) fn plain_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
