//! CSV and JSON table exports.
//!
//! Column names are a contract with downstream readers and must not change.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::metrics::InstrumentMetrics;
use crate::pipeline::BuildOutput;
use crate::Result;

pub const LEADERBOARD_STEM: &str = "top_combined";
pub const WATCHLIST_STEM: &str = "watchlist";
pub const SNAPSHOT_FILE: &str = "returns_snapshot.csv";
pub const PUBLICATION_FILE: &str = "published.json";

/// CSV header shared by every table, written even when there are no rows.
pub const COLUMNS: [&str; 8] = ["Ticker", "Name", "Price", "Chg", "ChgPct", "Day", "Month", "YTD"];

/// One row of the leaderboard or watchlist table. Returns are fractions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableRecord {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Price")]
    pub price: Option<f64>,
    #[serde(rename = "Chg")]
    pub chg: Option<f64>,
    #[serde(rename = "ChgPct")]
    pub chg_pct: Option<f64>,
    #[serde(rename = "Day")]
    pub day: Option<f64>,
    #[serde(rename = "Month")]
    pub month: Option<f64>,
    #[serde(rename = "YTD")]
    pub ytd: Option<f64>,
}

impl From<&InstrumentMetrics> for TableRecord {
    fn from(m: &InstrumentMetrics) -> Self {
        Self {
            ticker: m.symbol.clone(),
            name: m.name.clone(),
            price: Some(m.price),
            chg: m.change,
            chg_pct: m.change_fraction,
            day: m.day,
            month: m.month,
            ytd: m.ytd,
        }
    }
}

/// Debug snapshot row. Returns are percentages rounded to 3 decimals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotRecord {
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Price")]
    pub price: Option<f64>,
    #[serde(rename = "Chg")]
    pub chg: Option<f64>,
    #[serde(rename = "ChgPct")]
    pub chg_pct: Option<f64>,
    #[serde(rename = "Day")]
    pub day: Option<f64>,
    #[serde(rename = "Month")]
    pub month: Option<f64>,
    #[serde(rename = "YTD")]
    pub ytd: Option<f64>,
}

fn percent(fraction: Option<f64>) -> Option<f64> {
    fraction.map(|f| (f * 100.0 * 1000.0).round() / 1000.0)
}

impl From<&InstrumentMetrics> for SnapshotRecord {
    fn from(m: &InstrumentMetrics) -> Self {
        Self {
            ticker: m.symbol.clone(),
            name: m.name.clone(),
            price: Some(m.price),
            chg: m.change,
            chg_pct: percent(m.change_fraction),
            day: percent(m.day),
            month: percent(m.month),
            ytd: percent(m.ytd),
        }
    }
}

/// Write `<stem>.csv` and `<stem>.json` into `dir`.
pub fn write_table(dir: &Path, stem: &str, records: &[TableRecord]) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir)?;
    let csv_path = dir.join(format!("{}.csv", stem));
    let json_path = dir.join(format!("{}.json", stem));

    write_csv(&csv_path, records)?;
    fs::write(&json_path, serde_json::to_string_pretty(records)?)?;
    Ok((csv_path, json_path))
}

/// Write the percent snapshot of every instrument.
pub fn write_snapshot(path: &Path, metrics: &[InstrumentMetrics]) -> Result<()> {
    let records: Vec<SnapshotRecord> = metrics.iter().map(SnapshotRecord::from).collect();
    write_csv(path, &records)
}

fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Paths written by [`export_build`].
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub leaderboard_csv: PathBuf,
    pub leaderboard_json: PathBuf,
    pub watchlist_csv: PathBuf,
    pub watchlist_json: PathBuf,
    pub snapshot: PathBuf,
    pub publication: PathBuf,
}

/// Write every build artifact into `out_dir`.
pub fn export_build(out_dir: &Path, output: &BuildOutput) -> Result<ExportPaths> {
    let leaderboard: Vec<TableRecord> = output
        .leaderboard
        .iter()
        .map(|e| TableRecord::from(&e.metrics))
        .collect();
    let watchlist: Vec<TableRecord> = output.watchlist.iter().map(TableRecord::from).collect();

    let (leaderboard_csv, leaderboard_json) = write_table(out_dir, LEADERBOARD_STEM, &leaderboard)?;
    let (watchlist_csv, watchlist_json) = write_table(out_dir, WATCHLIST_STEM, &watchlist)?;

    let snapshot = out_dir.join(SNAPSHOT_FILE);
    write_snapshot(&snapshot, &output.metrics)?;

    let publication = out_dir.join(PUBLICATION_FILE);
    output.publication.save(&publication)?;

    tracing::info!(
        "Exported {} leaderboard rows and {} watchlist rows to {}",
        leaderboard.len(),
        watchlist.len(),
        out_dir.display()
    );

    Ok(ExportPaths {
        leaderboard_csv,
        leaderboard_json,
        watchlist_csv,
        watchlist_json,
        snapshot,
        publication,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Baselines;
    use tempfile::tempdir;

    fn metrics(symbol: &str, month: Option<f64>) -> InstrumentMetrics {
        InstrumentMetrics {
            symbol: symbol.to_string(),
            name: format!("{} Fund", symbol),
            price: 101.5,
            change: Some(1.5),
            change_fraction: Some(0.015),
            day: Some(0.015),
            month,
            ytd: Some(0.123456),
            baselines: Baselines::default(),
        }
    }

    #[test]
    fn test_table_schema() {
        let dir = tempdir().unwrap();
        let records = vec![
            TableRecord::from(&metrics("SPY", Some(0.02))),
            TableRecord::from(&metrics("QQQ", None)),
        ];

        let (csv_path, json_path) = write_table(dir.path(), "top_combined", &records).unwrap();

        let csv_text = fs::read_to_string(csv_path).unwrap();
        let mut lines = csv_text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Ticker,Name,Price,Chg,ChgPct,Day,Month,YTD"
        );
        assert!(lines.next().unwrap().starts_with("SPY,SPY Fund,101.5,1.5,0.015,0.015,0.02,"));
        assert_eq!(lines.next().unwrap(), "QQQ,QQQ Fund,101.5,1.5,0.015,0.015,,0.123456");

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(json[0]["Ticker"], "SPY");
        assert!(json[1]["Month"].is_null());
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let dir = tempdir().unwrap();

        let (csv_path, json_path) = write_table(dir.path(), LEADERBOARD_STEM, &[]).unwrap();

        let csv_text = fs::read_to_string(csv_path).unwrap();
        assert_eq!(csv_text.lines().collect::<Vec<_>>(), vec![COLUMNS.join(",")]);
        assert_eq!(fs::read_to_string(json_path).unwrap(), "[]");

        let mut reader = csv::Reader::from_path(dir.path().join("top_combined.csv")).unwrap();
        assert_eq!(reader.headers().unwrap().iter().collect::<Vec<_>>(), COLUMNS.to_vec());
        assert_eq!(reader.deserialize::<TableRecord>().count(), 0);
    }

    #[test]
    fn test_snapshot_in_percent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);

        write_snapshot(&path, &[metrics("DIA", None)]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let record: SnapshotRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(record.ticker, "DIA");
        assert_eq!(record.ytd, Some(12.346));
        assert_eq!(record.chg_pct, Some(1.5));
        assert_eq!(record.month, None);
    }
}
