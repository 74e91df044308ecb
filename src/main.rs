//! Fraud detector entrypoint: classify one transaction with both classifiers.
//!
//! `fraud-detector [TIME AMOUNT]` classifies the given time (seconds since
//! midnight) and amount with generated features; with no arguments the
//! example dataset transaction is used.

use fraud_detector::{
    config::DetectorConfig,
    decision_tree_from_config, export,
    features::{example_record, format_time, generate_feature_vector},
    history::PredictionHistory,
    logging::{PredictionLog, StructuredLogger},
    model::{Classifier, ModelKind},
    risk::RiskScoreClassifier,
    TransactionRecord,
};
use std::path::PathBuf;
use tracing::info;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn record_from_args(args: &[String]) -> Result<TransactionRecord, BoxError> {
    match args {
        [] => Ok(example_record()),
        [time, amount] => {
            let time: f64 = time.parse()?;
            let amount: f64 = amount.parse()?;
            Ok(TransactionRecord::new(time, amount, generate_feature_vector())?)
        }
        _ => Err("usage: fraud-detector [TIME AMOUNT]".into()),
    }
}

fn main() -> Result<(), BoxError> {
    let config_path = std::env::var("FRAUD_DETECTOR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let (config, fallback) = DetectorConfig::load_or_default(&config_path);

    StructuredLogger::init(&config.log);
    if let Some(fallback) = &fallback {
        fallback.report(&config_path);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let record = record_from_args(&args)?;
    info!(
        time = record.time(),
        clock = %format_time(record.time() as u32),
        amount = record.amount(),
        "classifying transaction"
    );

    let tree = decision_tree_from_config(&config)?;
    let standard = RiskScoreClassifier::new(config.risk.clone());
    let classifiers: [&dyn Classifier; 2] = match config.model {
        ModelKind::DecisionTree => [&tree as &dyn Classifier, &standard],
        ModelKind::Standard => [&standard as &dyn Classifier, &tree],
    };

    let mut history = PredictionHistory::from_config(&config.history);
    for classifier in classifiers {
        let result = classifier.classify(&record);
        let id = history.record(classifier.kind(), record.clone(), result);
        if let Some(entry) = history.get(id) {
            if config.log.json {
                let line = PredictionLog::from_entry(entry);
                StructuredLogger::emit_json(&line, &mut std::io::stdout().lock())?;
            } else {
                println!("[{}] {}", entry.model, entry.summary());
                for line in &entry.result.details {
                    println!("    {}", line);
                }
            }
        }
    }

    if let Some(path) = &config.export.path {
        export::write_file(path, config.export.layout, history.iter().rev())?;
    }

    info!(predictions = history.len(), "done");
    Ok(())
}
