//! Canned inputs for manual testing.

use super::TransactionRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Suggestion {
    pub value: f64,
    pub label: &'static str,
}

impl Suggestion {
    const fn new(value: f64, label: &'static str) -> Self {
        Self { value, label }
    }
}

static TIME_SUGGESTIONS: [Suggestion; 7] = [
    Suggestion::new(0.0, "12:00 AM (Midnight)"),
    Suggestion::new(3600.0, "1:00 AM"),
    Suggestion::new(9000.0, "2:30 AM"),
    Suggestion::new(21600.0, "6:00 AM"),
    Suggestion::new(43200.0, "12:00 PM (Noon)"),
    Suggestion::new(64800.0, "6:00 PM"),
    Suggestion::new(86340.0, "11:59 PM"),
];

static AMOUNT_SUGGESTIONS: [Suggestion; 5] = [
    Suggestion::new(0.99, "$0.99 - Test Transaction"),
    Suggestion::new(1.99, "$1.99 - Small Test"),
    Suggestion::new(149.62, "$149.62 - Medium Purchase"),
    Suggestion::new(15000.0, "$15,000 - Very Large"),
    Suggestion::new(900000.0, "$900,000 - Extremely Large"),
];

/// Times worth trying, several of them inside the high-risk window.
pub fn time_suggestions() -> &'static [Suggestion] {
    &TIME_SUGGESTIONS
}

pub fn amount_suggestions() -> &'static [Suggestion] {
    &AMOUNT_SUGGESTIONS
}

const EXAMPLE_FEATURES: [f64; 28] = [
    -1.359807, -0.072781, 2.536347, 1.378155, -0.338321, 0.462388, 0.239599, 0.098698,
    0.363787, 0.090794, -0.551600, -0.617801, -0.991390, -0.311169, 1.468177, -0.470400,
    0.207971, 0.025791, 0.403993, 0.251412, -0.018307, 0.277838, -0.110474, 0.066928,
    0.128539, -0.189115, 0.133558, -0.021053,
];

/// First row of the public credit-card dataset: a legitimate purchase.
pub fn example_record() -> TransactionRecord {
    TransactionRecord {
        time: 0.0,
        amount: 149.62,
        v_values: EXAMPLE_FEATURES.to_vec(),
    }
}
