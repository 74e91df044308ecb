//! CSV export of predictions, and reading exported rows back.
//!
//! Two layouts exist: `full` carries every feature (8 decimals), while
//! `tree-subset` carries only V12/V14/V17 (6 decimals) plus the decision
//! path. Confidence is written as a bare number with 2 decimals; the `%`
//! only appears in [`summary_line`].

use crate::error::{Error, Result};
use crate::features::{Feature, FEATURE_COUNT};
use crate::history::HistoryEntry;
use crate::model::{plain_number, Prediction, PredictionResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

const SUBSET: [Feature; 3] = [Feature::V(12), Feature::V(14), Feature::V(17)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportLayout {
    #[default]
    Full,
    TreeSubset,
}

impl ExportLayout {
    pub fn headers(&self) -> Vec<String> {
        let mut h = vec!["Time".to_string(), "Amount".to_string()];
        match self {
            ExportLayout::Full => {
                h.extend((1..=FEATURE_COUNT).map(|k| format!("V{}", k)));
                h.extend(["Prediction", "Confidence", "Timestamp"].map(String::from));
            }
            ExportLayout::TreeSubset => {
                h.extend(SUBSET.iter().map(|f| f.name()));
                h.extend(
                    ["Prediction", "Confidence", "Decision Path", "Timestamp"].map(String::from),
                );
            }
        }
        h
    }

    pub fn row(&self, entry: &HistoryEntry) -> Vec<String> {
        let record = &entry.record;
        let result = &entry.result;
        let mut row = vec![plain_number(record.time()), plain_number(record.amount())];
        match self {
            ExportLayout::Full => {
                row.extend((0..FEATURE_COUNT).map(|i| format!("{:.8}", record.feature_at(i))));
                row.push(result.prediction.to_string());
                row.push(format!("{:.2}", result.confidence));
            }
            ExportLayout::TreeSubset => {
                row.extend(SUBSET.iter().map(|f| format!("{:.6}", record.value(*f))));
                row.push(result.prediction.to_string());
                row.push(format!("{:.2}", result.confidence));
                row.push(result.details.join("; "));
            }
        }
        row.push(entry.display_timestamp());
        row
    }
}

/// Write a header line followed by one row per entry.
pub fn write_entries<'a, W: Write>(
    writer: W,
    layout: ExportLayout,
    entries: impl IntoIterator<Item = &'a HistoryEntry>,
) -> Result<usize> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(layout.headers())?;
    let mut rows = 0;
    for entry in entries {
        w.write_record(layout.row(entry))?;
        rows += 1;
    }
    w.flush()?;
    Ok(rows)
}

pub fn write_file<'a>(
    path: &Path,
    layout: ExportLayout,
    entries: impl IntoIterator<Item = &'a HistoryEntry>,
) -> Result<usize> {
    let rows = write_entries(File::create(path)?, layout, entries)?;
    info!(path = %path.display(), rows, layout = ?layout, "exported predictions");
    Ok(rows)
}

/// An exported row parsed back into numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub time: f64,
    pub amount: f64,
    /// Feature columns in file order.
    pub features: Vec<(Feature, f64)>,
    pub prediction: Prediction,
    pub confidence: f64,
    pub decision_path: Option<String>,
    pub timestamp: String,
}

impl ExportRow {
    pub fn feature(&self, feature: Feature) -> Option<f64> {
        self.features
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|(_, v)| *v)
    }
}

/// Parse rows written by [`write_entries`] in either layout. A trailing `%`
/// on confidence is tolerated.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<ExportRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::MalformedRow(format!("missing column {:?}", name)))
    };
    let time_col = column("Time")?;
    let amount_col = column("Amount")?;
    let prediction_col = column("Prediction")?;
    let confidence_col = column("Confidence")?;
    let timestamp_col = column("Timestamp")?;
    let path_col = headers.iter().position(|h| h == "Decision Path");
    let feature_cols: Vec<(usize, Feature)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.starts_with('V'))
        .map(|(i, h)| {
            h.parse::<Feature>()
                .map(|f| (i, f))
                .map_err(|_| Error::MalformedRow(format!("unknown column {:?}", h)))
        })
        .collect::<Result<_>>()?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let text = |i: usize| record.get(i).unwrap_or_default();
        let number = |i: usize| -> Result<f64> {
            let raw = text(i).trim().trim_end_matches('%');
            raw.parse::<f64>()
                .map_err(|_| Error::MalformedRow(format!("{:?} is not a number", raw)))
        };
        rows.push(ExportRow {
            time: number(time_col)?,
            amount: number(amount_col)?,
            features: feature_cols
                .iter()
                .map(|&(i, f)| number(i).map(|v| (f, v)))
                .collect::<Result<_>>()?,
            prediction: text(prediction_col).parse()?,
            confidence: number(confidence_col)?,
            decision_path: path_col.map(|i| text(i).to_string()),
            timestamp: text(timestamp_col).to_string(),
        });
    }
    Ok(rows)
}

/// `Fraud (87.50%)`
pub fn summary_line(result: &PredictionResult) -> String {
    format!("{} ({:.2}%)", result.prediction, result.confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureGenerator, TransactionRecord};
    use crate::model::{Classifier, DecisionTreeClassifier, ModelKind};
    use crate::risk::RiskScoreClassifier;

    fn entries() -> Vec<HistoryEntry> {
        let mut generator = FeatureGenerator::seeded(99);
        let tree = DecisionTreeClassifier::new();
        let risk = RiskScoreClassifier::default();
        let a = TransactionRecord::new(9000.0, 12000.5, generator.generate()).unwrap();
        let b = TransactionRecord::new(50000.0, 149.62, generator.generate()).unwrap();
        vec![
            HistoryEntry::new(ModelKind::DecisionTree, a.clone(), tree.classify(&a)),
            HistoryEntry::new(ModelKind::Standard, b.clone(), risk.classify(&b)),
        ]
    }

    #[test]
    fn headers_in_order() {
        let full = ExportLayout::Full.headers();
        assert_eq!(full.len(), 2 + 28 + 3);
        assert_eq!(&full[..3], &["Time", "Amount", "V1"]);
        assert_eq!(full[29], "V28");
        assert_eq!(&full[30..], &["Prediction", "Confidence", "Timestamp"]);

        assert_eq!(
            ExportLayout::TreeSubset.headers(),
            vec![
                "Time",
                "Amount",
                "V12",
                "V14",
                "V17",
                "Prediction",
                "Confidence",
                "Decision Path",
                "Timestamp"
            ]
        );
    }

    #[test]
    fn full_layout_roundtrip() {
        let entries = entries();
        let mut buf = Vec::new();
        assert_eq!(write_entries(&mut buf, ExportLayout::Full, &entries).unwrap(), 2);

        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("Time,Amount,V1,V2,"));
        assert!(!text.contains('%'));

        let rows = read_rows(buf.as_slice()).unwrap();
        assert_eq!(rows.len(), 2);
        for (row, entry) in rows.iter().zip(&entries) {
            assert_eq!(row.time, entry.record.time());
            assert_eq!(row.amount, entry.record.amount());
            assert_eq!(row.prediction, entry.result.prediction);
            assert!((row.confidence - entry.result.confidence).abs() < 0.005);
            assert_eq!(row.features.len(), 28);
            for (i, v) in entry.record.v_values().iter().enumerate() {
                assert!((row.features[i].1 - v).abs() < 5e-9);
            }
            assert_eq!(row.decision_path, None);
            assert_eq!(row.timestamp, entry.display_timestamp());
        }
    }

    #[test]
    fn subset_layout_roundtrip() {
        let entries = entries();
        let mut buf = Vec::new();
        write_entries(&mut buf, ExportLayout::TreeSubset, &entries[..1]).unwrap();
        let rows = read_rows(buf.as_slice()).unwrap();
        let row = &rows[0];
        let entry = &entries[0];
        assert_eq!(row.features.len(), 3);
        assert!((row.feature(Feature::V(14)).unwrap() - entry.result.features.v14).abs() < 1e-6);
        assert_eq!(row.decision_path.as_deref(), Some(entry.result.details.join("; ").as_str()));
    }

    #[test]
    fn tolerates_percent_suffix() {
        let csv = concat!(
            "Time,Amount,V12,V14,V17,Prediction,Confidence,Decision Path,Timestamp\n",
            "0,1.99,0.000000,-0.500000,0.000000,",
            "\"Fraud\",99%,\"a; b\",\"1/1/2026, 12:00:00 AM\"\n",
        );
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].confidence, 99.0);
        assert_eq!(rows[0].prediction, Prediction::Fraud);
        assert_eq!(rows[0].feature(Feature::V(14)), Some(-0.5));
        assert_eq!(rows[0].timestamp, "1/1/2026, 12:00:00 AM");
    }

    #[test]
    fn rejects_bad_rows() {
        let csv = "Time,Amount,Prediction,Confidence,Timestamp\nnoon,1,Fraud,50,x\n";
        assert!(matches!(read_rows(csv.as_bytes()), Err(Error::MalformedRow(_))));
        let csv = "Time,Amount,Prediction,Confidence\n1,1,Fraud,50\n";
        assert!(read_rows(csv.as_bytes()).is_err());
    }

    #[test]
    fn summary_has_percent() {
        let e = &entries()[0];
        let line = summary_line(&e.result);
        assert!(line.ends_with("%)"));
        assert!(line.starts_with(e.result.prediction.as_str()));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let entries = entries();
        write_file(&path, ExportLayout::TreeSubset, &entries).unwrap();
        let rows = read_rows(File::open(&path).unwrap()).unwrap();
        assert_eq!(rows.len(), 2);
    }
}
