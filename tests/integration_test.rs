//! Integration test: config load, record validation, both classifiers,
//! history, CSV export round trip, custom tree loading.

use fraud_detector::{
    config::{ConfidencePolicy, DetectorConfig},
    decision_tree_from_config,
    export::{self, ExportLayout},
    features::{example_record, format_time, generate_feature_vector, FeatureGenerator},
    history::PredictionHistory,
    model::{fraud_tree, Classifier, DecisionTreeClassifier, ModelKind, Prediction, Risk},
    risk::RiskScoreClassifier,
    TransactionRecord,
};
use std::path::Path;

#[test]
fn config_load_default() {
    let c = DetectorConfig::load(Path::new("nonexistent.json"));
    assert_eq!(c.model, ModelKind::DecisionTree);
    assert_eq!(c.confidence, ConfidencePolicy::Adjusted);
    assert_eq!(c.risk.suspicious_times, vec![0.0, 3600.0, 9000.0, 21600.0]);
}

#[test]
fn time_format_examples() {
    assert_eq!(format_time(0), "12:00 AM");
    assert_eq!(format_time(43200), "12:00 PM");
}

#[test]
fn generated_vectors_classify() {
    let tree = DecisionTreeClassifier::new();
    let standard = RiskScoreClassifier::default();
    for _ in 0..20 {
        let v = generate_feature_vector();
        assert_eq!(v.len(), 28);
        let r = TransactionRecord::new(21600.0, 75.0, v).unwrap();
        let a = tree.classify(&r);
        let b = standard.classify(&r);
        assert!((50.0..=99.0).contains(&a.confidence));
        assert!((0.0..=100.0).contains(&b.confidence));
    }
}

#[test]
fn daytime_scenario() {
    let r = TransactionRecord::with_zero_features(50000.0, 150.0).unwrap();
    let res = DecisionTreeClassifier::new().classify(&r);
    assert_eq!(res.prediction, Prediction::NotFraud);
    assert_eq!(res.risk, Risk::Low);
    assert_eq!(res.details.last().unwrap(), "Normal transaction amount during regular hours");
}

#[test]
fn risk_score_scenario() {
    let mut v = vec![0.0; 28];
    v[0] = 6.0;
    let r = TransactionRecord::new(3600.0, 1.0, v).unwrap();
    let c = RiskScoreClassifier::default();
    assert!(c.breakdown(&r).total() >= 0.5);
    assert_eq!(c.classify(&r).prediction, Prediction::Fraud);
}

#[test]
fn example_record_is_legitimate_for_both() {
    let r = example_record();
    let tree = DecisionTreeClassifier::new().classify(&r);
    // midnight, medium amount: night branch, normal amount leaf
    assert_eq!(tree.prediction, Prediction::NotFraud);
    let standard = RiskScoreClassifier::default().classify(&r);
    assert_eq!(standard.prediction, Prediction::NotFraud);
    assert_eq!(standard.details, vec!["Transaction time is during high-risk hours"]);
}

#[test]
fn history_to_csv_and_back() {
    let mut generator = FeatureGenerator::seeded(2024);
    let tree = DecisionTreeClassifier::new();
    let mut history = PredictionHistory::new(10);
    for (time, amount) in [(0.0, 0.99), (9000.0, 15000.0), (64800.0, 149.62)] {
        let r = TransactionRecord::new(time, amount, generator.generate()).unwrap();
        let res = tree.classify(&r);
        history.record(ModelKind::DecisionTree, r, res);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    assert_eq!(export::write_file(&path, ExportLayout::Full, history.iter()).unwrap(), 3);

    let rows = export::read_rows(std::fs::File::open(&path).unwrap()).unwrap();
    for (row, entry) in rows.iter().zip(history.iter()) {
        assert_eq!(row.time, entry.record.time());
        assert_eq!(row.amount, entry.record.amount());
        assert_eq!(row.prediction, entry.result.prediction);
        assert!((row.confidence - entry.result.confidence).abs() < 0.005);
    }
}

#[test]
fn custom_tree_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let tree_path = dir.path().join("tree.json");
    let json = r#"{"root":2,"nodes":[
        {"kind":"leaf","prediction":"Fraud","confidence":0.6,"details":["big"]},
        {"kind":"leaf","prediction":"Not Fraud","confidence":0.9},
        {"kind":"split","feature":"amount","threshold":100,"left":1,"right":0}]}"#;
    std::fs::write(&tree_path, json).unwrap();

    let config = DetectorConfig {
        tree_path: Some(tree_path),
        confidence: ConfidencePolicy::Static,
        ..DetectorConfig::default()
    };
    let classifier = decision_tree_from_config(&config).unwrap();
    assert_eq!(classifier.tree().n_nodes(), 3);

    let r = TransactionRecord::with_zero_features(50000.0, 500.0).unwrap();
    let res = classifier.classify(&r);
    assert_eq!(res.prediction, Prediction::Fraud);
    assert_eq!(res.confidence, 60.0);
    assert_eq!(res.details, vec!["Decision point: amount = 500.00 ≥ 100", "big"]);

    // default config uses the built-in tree
    let builtin = decision_tree_from_config(&DetectorConfig::default()).unwrap();
    assert_eq!(builtin.tree(), fraud_tree().as_ref());
}

#[test]
fn invalid_custom_tree_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let tree_path = dir.path().join("tree.json");
    let json = r#"{"root":0,"nodes":[{"kind":"leaf","prediction":"Fraud","confidence":0.6}]}"#;
    std::fs::write(&tree_path, json).unwrap();
    let config = DetectorConfig {
        tree_path: Some(tree_path),
        ..DetectorConfig::default()
    };
    assert!(decision_tree_from_config(&config).is_err());
}
