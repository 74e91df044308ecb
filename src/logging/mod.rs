//! Structured logging.

mod format;

pub use format::{PredictionLog, StructuredLogger};
