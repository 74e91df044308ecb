//! Detector configuration, loaded from a JSON file with defaults for anything
//! left out.

use crate::error::{Error, Result};
use crate::export::ExportLayout;
use crate::model::ModelKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Classifier the binary reports first
    pub model: ModelKind,
    /// How the decision tree turns a leaf into a confidence
    pub confidence: ConfidencePolicy,
    /// Risk-score weights and thresholds
    pub risk: RiskConfig,
    pub history: HistoryConfig,
    pub export: ExportConfig,
    pub log: LogConfig,
    /// JSON tree replacing the built-in one
    pub tree_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidencePolicy {
    /// Leaf confidence nudged by distance from key thresholds, clamped to [0.5, 0.99]
    #[default]
    Adjusted,
    /// Leaf confidence as written in the tree
    Static,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Times of day (seconds) around which activity is suspicious
    pub suspicious_times: Vec<f64>,
    /// Half-width of the window around each suspicious time
    pub time_window_secs: f64,
    pub time_weight: f64,
    /// Amounts below this are suspicious
    pub small_amount: f64,
    pub small_amount_weight: f64,
    /// Amounts above this are suspicious
    pub large_amount: f64,
    pub large_amount_weight: f64,
    /// A feature is extreme when its magnitude exceeds this
    pub extreme_magnitude: f64,
    /// Scales the fraction of extreme features
    pub extreme_weight: f64,
    /// 0-based positions whose extreme value adds `critical_bonus`
    pub critical_positions: Vec<usize>,
    pub critical_bonus: f64,
    /// Total risk above this is fraud
    pub fraud_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Entries kept before the oldest are dropped; 0 keeps everything
    pub capacity: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub layout: ExportLayout,
    /// Where the binary writes its CSV, if anywhere
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::default(),
            confidence: ConfidencePolicy::default(),
            risk: RiskConfig::default(),
            history: HistoryConfig::default(),
            export: ExportConfig::default(),
            log: LogConfig::default(),
            tree_path: None,
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            suspicious_times: vec![0.0, 3600.0, 9000.0, 21600.0],
            time_window_secs: 3600.0,
            time_weight: 0.3,
            small_amount: 2.0,
            small_amount_weight: 0.25,
            large_amount: 10000.0,
            large_amount_weight: 0.35,
            extreme_magnitude: 5.0,
            extreme_weight: 0.4,
            critical_positions: vec![12, 17, 14],
            critical_bonus: 0.2,
            fraud_threshold: 0.5,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Why a config file was not used.
#[derive(Debug)]
pub enum ConfigFallback {
    Missing,
    Invalid(Error),
}

impl ConfigFallback {
    /// Log the fallback. Needs a subscriber to be installed first.
    pub fn report(&self, path: &Path) {
        match self {
            ConfigFallback::Missing => {
                info!(path = %path.display(), "no config file; using defaults");
            }
            ConfigFallback::Invalid(e) => {
                warn!(path = %path.display(), error = %e, "config unreadable; using defaults");
            }
        }
    }
}

impl DetectorConfig {
    /// Load from JSON file if present and valid; otherwise defaults together
    /// with the reason, so the caller can report it once logging is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<ConfigFallback>) {
        if !path.exists() {
            return (Self::default(), Some(ConfigFallback::Missing));
        }
        match Self::try_load(path) {
            Ok(c) => (c, None),
            Err(e) => (Self::default(), Some(ConfigFallback::Invalid(e))),
        }
    }

    /// Like [`load_or_default`](Self::load_or_default), logging the fallback
    /// right away.
    pub fn load(path: &Path) -> Self {
        let (config, fallback) = Self::load_or_default(path);
        if let Some(fallback) = fallback {
            fallback.report(path);
        }
        config
    }

    pub fn try_load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
