//! Classification benchmark: one transaction through each classifier.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fraud_detector::features::{example_record, FeatureGenerator};
use fraud_detector::model::{Classifier, DecisionTreeClassifier};
use fraud_detector::risk::RiskScoreClassifier;
use fraud_detector::TransactionRecord;

fn bench_classifiers(c: &mut Criterion) {
    let record = example_record();
    let tree = DecisionTreeClassifier::new();
    let standard = RiskScoreClassifier::default();

    c.bench_function("decision_tree_classify", |b| {
        b.iter(|| tree.classify(black_box(&record)))
    });
    c.bench_function("risk_score_classify", |b| {
        b.iter(|| standard.classify(black_box(&record)))
    });
}

fn bench_by_time(c: &mut Criterion) {
    let mut generator = FeatureGenerator::seeded(7);
    let tree = DecisionTreeClassifier::new();

    let mut g = c.benchmark_group("decision_tree_by_time");
    for time in [0.0, 9000.0, 21600.0, 64800.0] {
        let record = TransactionRecord::new(time, 1.99, generator.generate()).unwrap();
        g.bench_function(format!("t_{}", time).as_str(), |b| {
            b.iter(|| tree.classify(black_box(&record)))
        });
    }
    g.finish();
}

fn bench_generator(c: &mut Criterion) {
    let mut generator = FeatureGenerator::seeded(42);
    c.bench_function("generate_28_features", |b| b.iter(|| generator.generate()));
}

criterion_group!(benches, bench_classifiers, bench_by_time, bench_generator);
criterion_main!(benches);
