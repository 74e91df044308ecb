//! Transaction records and the anonymized feature vector they carry.

mod generator;
mod presets;
mod time;

pub use generator::{generate_feature_vector, FeatureGenerator};
pub use presets::{amount_suggestions, example_record, time_suggestions, Suggestion};
pub use time::format_time;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of anonymized features (V1..V28).
pub const FEATURE_COUNT: usize = 28;

/// Seconds in a day; the upper bound for `time`.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// A named input a rule can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Time,
    Amount,
    /// 1-based anonymized feature, `V(14)` is V14.
    V(u8),
}

impl Feature {
    /// Serialized name: `time`, `amount`, `V14`.
    pub fn name(&self) -> String {
        match self {
            Feature::Time => "time".to_string(),
            Feature::Amount => "amount".to_string(),
            Feature::V(k) => format!("V{}", k),
        }
    }

    /// False for `V(k)` outside V1..V28.
    pub fn in_range(&self) -> bool {
        match self {
            Feature::V(k) => (1..=FEATURE_COUNT).contains(&(*k as usize)),
            _ => true,
        }
    }

    /// Label used in decision narration.
    pub fn label(&self) -> String {
        match self {
            Feature::Time => "Time".to_string(),
            other => other.name(),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "time" => Ok(Feature::Time),
            "amount" => Ok(Feature::Amount),
            _ => {
                let k = s
                    .strip_prefix('V')
                    .and_then(|n| n.parse::<u8>().ok())
                    .ok_or_else(|| Error::InvalidTree(format!("unknown feature {:?}", s)))?;
                let feature = Feature::V(k);
                if !feature.in_range() {
                    return Err(Error::InvalidTree(format!("feature {} out of range V1..V28", s)));
                }
                Ok(feature)
            }
        }
    }
}

impl Serialize for Feature {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for Feature {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Transaction submitted for classification: seconds since midnight, amount,
/// and up to 28 anonymized features (index 0 is V1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct TransactionRecord {
    time: f64,
    amount: f64,
    #[serde(rename = "vValues")]
    v_values: Vec<f64>,
}

#[derive(Deserialize)]
struct RecordFields {
    time: f64,
    amount: f64,
    #[serde(rename = "vValues", default)]
    v_values: Vec<f64>,
}

impl TryFrom<RecordFields> for TransactionRecord {
    type Error = Error;

    fn try_from(f: RecordFields) -> Result<Self> {
        TransactionRecord::new(f.time, f.amount, f.v_values)
    }
}

impl TransactionRecord {
    /// Validate and build a record. Fewer than 28 features is allowed; the
    /// missing ones read as 0.
    pub fn new(time: f64, amount: f64, v_values: Vec<f64>) -> Result<Self> {
        if !time.is_finite() || !(0.0..=SECONDS_PER_DAY).contains(&time) {
            return Err(Error::TimeOutOfRange(time));
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount(amount));
        }
        if v_values.len() > FEATURE_COUNT {
            return Err(Error::TooManyFeatures(v_values.len()));
        }
        if let Some(index) = v_values.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteFeature { index });
        }
        Ok(Self {
            time,
            amount,
            v_values,
        })
    }

    /// Record with all 28 features set to zero.
    pub fn with_zero_features(time: f64, amount: f64) -> Result<Self> {
        Self::new(time, amount, vec![0.0; FEATURE_COUNT])
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn v_values(&self) -> &[f64] {
        &self.v_values
    }

    /// 0-based feature access; out-of-range reads 0.
    pub fn feature_at(&self, index: usize) -> f64 {
        self.v_values.get(index).copied().unwrap_or(0.0)
    }

    /// Value of a named feature.
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Time => self.time,
            Feature::Amount => self.amount,
            Feature::V(0) => 0.0,
            Feature::V(k) => self.feature_at(k as usize - 1),
        }
    }

    /// Time, amount and the three high-signal features.
    pub fn snapshot(&self) -> FeatureSnapshot {
        FeatureSnapshot {
            time: self.time,
            amount: self.amount,
            v12: self.value(Feature::V(12)),
            v14: self.value(Feature::V(14)),
            v17: self.value(Feature::V(17)),
        }
    }
}

/// Features echoed back with every prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub time: f64,
    pub amount: f64,
    #[serde(rename = "V12")]
    pub v12: f64,
    #[serde(rename = "V14")]
    pub v14: f64,
    #[serde(rename = "V17")]
    pub v17: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_names_roundtrip() {
        for name in ["time", "amount", "V1", "V14", "V28"] {
            let f: Feature = name.parse().unwrap();
            assert_eq!(f.name(), name);
        }
        assert!("V0".parse::<Feature>().is_err());
        assert!("V29".parse::<Feature>().is_err());
        assert!("velocity".parse::<Feature>().is_err());
        assert_eq!(Feature::Time.label(), "Time");
        assert_eq!(Feature::Amount.label(), "amount");
    }

    #[test]
    fn short_vectors_read_zero() {
        let r = TransactionRecord::new(100.0, 5.0, vec![1.5, -2.0]).unwrap();
        assert_eq!(r.value(Feature::V(1)), 1.5);
        assert_eq!(r.value(Feature::V(2)), -2.0);
        assert_eq!(r.value(Feature::V(17)), 0.0);
        assert_eq!(r.feature_at(99), 0.0);
        assert_eq!(r.value(Feature::V(0)), 0.0);
        assert!(!Feature::V(0).in_range());
        assert!(!Feature::V(29).in_range());
        assert!(Feature::V(28).in_range());
        let s = r.snapshot();
        assert_eq!((s.v12, s.v14, s.v17), (0.0, 0.0, 0.0));
    }

    #[test]
    fn rejects_malformed_records() {
        assert!(matches!(
            TransactionRecord::new(-1.0, 5.0, vec![]),
            Err(Error::TimeOutOfRange(_))
        ));
        assert!(matches!(
            TransactionRecord::new(86_401.0, 5.0, vec![]),
            Err(Error::TimeOutOfRange(_))
        ));
        assert!(matches!(
            TransactionRecord::new(0.0, -0.01, vec![]),
            Err(Error::InvalidAmount(_))
        ));
        assert!(matches!(
            TransactionRecord::new(0.0, 1.0, vec![0.0; 29]),
            Err(Error::TooManyFeatures(29))
        ));
        assert!(matches!(
            TransactionRecord::new(0.0, 1.0, vec![0.0, f64::NAN]),
            Err(Error::NonFiniteFeature { index: 1 })
        ));
        assert!(TransactionRecord::new(86_400.0, 0.0, vec![]).is_ok());
    }

    #[test]
    fn deserialize_validates() {
        let ok: TransactionRecord =
            serde_json::from_str(r#"{"time":3600,"amount":1.5,"vValues":[0.1]}"#).unwrap();
        assert_eq!(ok.time(), 3600.0);
        assert_eq!(ok.v_values(), &[0.1]);
        assert!(serde_json::from_str::<TransactionRecord>(r#"{"time":-5,"amount":1}"#).is_err());
    }
}
