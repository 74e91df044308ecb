//! Tracing setup and prediction audit lines (one JSON object per line).

use crate::config::LogConfig;
use crate::history::HistoryEntry;
use serde::Serialize;
use std::io::{self, Write};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// One classification as an audit line.
#[derive(Serialize)]
pub struct PredictionLog<'a> {
    pub ts: String,
    pub id: String,
    pub model: &'static str,
    pub prediction: &'static str,
    pub confidence: f64,
    pub risk: &'static str,
    pub time: f64,
    pub amount: f64,
    pub details: &'a [String],
}

impl<'a> PredictionLog<'a> {
    pub fn from_entry(entry: &'a HistoryEntry) -> Self {
        Self {
            ts: entry.timestamp.to_rfc3339(),
            id: entry.id.to_string(),
            model: entry.model.as_str(),
            prediction: entry.result.prediction.as_str(),
            confidence: entry.result.confidence,
            risk: entry.result.risk.as_str(),
            time: entry.record.time(),
            amount: entry.record.amount(),
            details: &entry.result.details,
        }
    }
}

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install the global subscriber on stderr so stdout stays free for
    /// results. `RUST_LOG` overrides `config.level`.
    pub fn init(config: &LogConfig) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.level));
        let layer = fmt::layer().with_writer(io::stderr).with_target(false);
        let registry = tracing_subscriber::registry().with(filter);
        if config.json {
            registry.with(layer.json().flatten_event(true)).init();
        } else {
            registry.with(layer).init();
        }
    }

    /// Write `event` as a single JSON line.
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) -> io::Result<()> {
        serde_json::to_writer(&mut *w, event)?;
        writeln!(w)
    }
}
