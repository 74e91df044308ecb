//! Additive risk score over time of day, amount and extreme features;
//! thresholded into a prediction.

use crate::config::RiskConfig;
use crate::features::TransactionRecord;
use crate::model::{round_to, Classifier, ModelKind, Prediction, PredictionResult, Risk};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Contributions that make up a total risk score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub time: f64,
    pub amount: f64,
    pub features: f64,
    /// Count of features above the extreme magnitude
    pub extreme_count: usize,
    pub critical: bool,
}

impl RiskBreakdown {
    pub fn total(&self) -> f64 {
        self.time + self.amount + self.features
    }
}

pub struct RiskScoreClassifier {
    config: RiskConfig,
}

impl RiskScoreClassifier {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn breakdown(&self, record: &TransactionRecord) -> RiskBreakdown {
        let c = &self.config;
        let time = record.time();
        let amount = record.amount();
        let values = record.v_values();

        let time_risk = if c
            .suspicious_times
            .iter()
            .any(|t| (time - t).abs() < c.time_window_secs)
        {
            c.time_weight
        } else {
            0.0
        };

        let amount_risk = if amount < c.small_amount {
            c.small_amount_weight
        } else if amount > c.large_amount {
            c.large_amount_weight
        } else {
            0.0
        };

        let extreme_count = values
            .iter()
            .filter(|v| v.abs() > c.extreme_magnitude)
            .count();
        let mut feature_risk = if values.is_empty() {
            0.0
        } else {
            extreme_count as f64 / values.len() as f64 * c.extreme_weight
        };
        let critical = c
            .critical_positions
            .iter()
            .any(|&i| record.feature_at(i).abs() > c.extreme_magnitude);
        if critical {
            feature_risk += c.critical_bonus;
        }

        RiskBreakdown {
            time: time_risk,
            amount: amount_risk,
            features: feature_risk,
            extreme_count,
            critical,
        }
    }

    fn details(&self, record: &TransactionRecord, b: &RiskBreakdown) -> Vec<String> {
        let mut details = Vec::new();
        if b.time > 0.0 {
            details.push("Transaction time is during high-risk hours".to_string());
        }
        if b.amount > 0.0 {
            details.push(if record.amount() < self.config.small_amount {
                "Very small transaction amount is suspicious".to_string()
            } else {
                "Very large transaction amount is suspicious".to_string()
            });
        }
        if b.extreme_count > 0 {
            details.push(format!("{} features have extreme values", b.extreme_count));
        }
        if b.critical {
            details.push("Critical fraud indicators present in high-risk features".to_string());
        }
        details
    }
}

impl Default for RiskScoreClassifier {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}

impl Classifier for RiskScoreClassifier {
    fn kind(&self) -> ModelKind {
        ModelKind::Standard
    }

    fn classify(&self, record: &TransactionRecord) -> PredictionResult {
        let breakdown = self.breakdown(record);
        let total = breakdown.total();
        let threshold = self.config.fraud_threshold;

        let prediction = if total > threshold {
            Prediction::Fraud
        } else {
            Prediction::NotFraud
        };
        let confidence = match prediction {
            Prediction::Fraud => 50.0 + total * 50.0,
            Prediction::NotFraud => (1.0 - total) * 100.0,
        };
        let risk = if total < threshold { Risk::Low } else { Risk::High };

        debug!(
            total,
            time = breakdown.time,
            amount = breakdown.amount,
            features = breakdown.features,
            prediction = %prediction,
            "risk score computed"
        );

        PredictionResult {
            prediction,
            confidence: round_to(confidence.clamp(0.0, 100.0), 0),
            risk,
            features: record.snapshot(),
            details: self.details(record, &breakdown),
        }
    }
}
