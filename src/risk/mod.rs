//! Weighted risk-score classifier.

mod engine;

pub use engine::{RiskBreakdown, RiskScoreClassifier};
