//! Owned, newest-first list of past predictions.

use crate::config::HistoryConfig;
use crate::features::{format_time, TransactionRecord};
use crate::model::{ModelKind, PredictionResult};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::vec_deque::{self, VecDeque};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Local>,
    pub model: ModelKind,
    pub record: TransactionRecord,
    pub result: PredictionResult,
}

impl HistoryEntry {
    pub fn new(model: ModelKind, record: TransactionRecord, result: PredictionResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Local::now(),
            model,
            record,
            result,
        }
    }

    /// Timestamp as shown to users, e.g. `3/14/2026, 9:26:53 PM`.
    pub fn display_timestamp(&self) -> String {
        self.timestamp.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
    }

    /// One-line summary: `Fraud (87.5%) · $1.99 at 12:00 AM`.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}%) · ${:.2} at {}",
            self.result.prediction,
            self.result.confidence,
            self.result.features.amount,
            format_time(self.result.features.time as u32)
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct PredictionHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl PredictionHistory {
    /// `capacity` of 0 keeps every entry.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Store a new result at the front and return its id.
    pub fn record(
        &mut self,
        model: ModelKind,
        record: TransactionRecord,
        result: PredictionResult,
    ) -> Uuid {
        self.push(HistoryEntry::new(model, record, result))
    }

    pub fn push(&mut self, entry: HistoryEntry) -> Uuid {
        let id = entry.id;
        self.entries.push_front(entry);
        if self.capacity > 0 {
            while self.entries.len() > self.capacity {
                if let Some(old) = self.entries.pop_back() {
                    debug!(id = %old.id, "history full; dropped oldest entry");
                }
            }
        }
        id
    }

    pub fn remove(&mut self, id: Uuid) -> Option<HistoryEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        self.entries.remove(pos)
    }

    pub fn get(&self, id: Uuid) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Newest first.
    pub fn iter(&self) -> vec_deque::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
