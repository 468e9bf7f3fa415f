//! Published rows and the publication file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::format::{RowText, RowValues};
use crate::metrics::{Baselines, InstrumentMetrics};
use crate::types::{normalize_symbol, Horizon};
use crate::Result;

impl From<&InstrumentMetrics> for RowValues {
    fn from(m: &InstrumentMetrics) -> Self {
        Self {
            price: Some(m.price),
            change: m.change,
            change_fraction: m.change_fraction,
            day: m.day,
            month: m.month,
            ytd: m.ytd,
        }
    }
}

/// A row frozen at build time, with the baselines needed to refresh it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishedRow {
    /// Leaderboard rank, absent for watchlist rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    /// Ticker symbol
    pub symbol: String,
    /// Display name
    pub name: String,
    /// Values at build time
    pub values: RowValues,
    /// Formatted values at build time
    pub text: RowText,
    /// Previous-close, month and year-to-date baselines
    pub baselines: Baselines,
}

impl PublishedRow {
    /// Freeze a row from build-time metrics.
    pub fn from_metrics(metrics: &InstrumentMetrics, rank: Option<usize>) -> Self {
        let values = RowValues::from(metrics);
        Self {
            rank,
            symbol: metrics.symbol.clone(),
            name: metrics.name.clone(),
            text: RowText::from_values(&values),
            values,
            baselines: metrics.baselines,
        }
    }
}

/// Everything one build hands to the live view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Publication {
    /// When the build ran
    pub generated_at: DateTime<Utc>,
    /// Horizon the leaderboard is ranked by
    pub rank_horizon: Horizon,
    /// Requested leaderboard size
    pub top_n: usize,
    /// Instruments with history in this build
    pub universe_count: usize,
    /// Ranked rows, best first
    pub leaderboard: Vec<PublishedRow>,
    /// Watchlist rows in listed order
    pub watchlist: Vec<PublishedRow>,
}

impl Publication {
    /// Load a publication from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the publication as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Materialize the read-only symbol to baselines mapping.
    pub fn baseline_book(&self) -> BaselineBook {
        let entries = self
            .leaderboard
            .iter()
            .chain(self.watchlist.iter())
            .map(|row| (row.symbol.clone(), row.baselines))
            .collect();
        BaselineBook { entries }
    }
}

/// Read-only baselines keyed by symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaselineBook {
    entries: BTreeMap<String, Baselines>,
}

impl BaselineBook {
    /// Baselines for a symbol.
    pub fn get(&self, symbol: &str) -> Option<&Baselines> {
        self.entries.get(&normalize_symbol(symbol))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn metrics(symbol: &str, price: f64, prev: f64) -> InstrumentMetrics {
        InstrumentMetrics {
            symbol: symbol.to_string(),
            name: format!("{} Inc.", symbol),
            price,
            change: Some(price - prev),
            change_fraction: Some(price / prev - 1.0),
            day: Some(price / prev - 1.0),
            month: None,
            ytd: Some(0.1),
            baselines: Baselines {
                previous_close: Some(prev),
                month: None,
                ytd: Some(price / 1.1),
            },
        }
    }

    fn publication() -> Publication {
        Publication {
            generated_at: Utc::now(),
            rank_horizon: Horizon::Day,
            top_n: 2,
            universe_count: 3,
            leaderboard: vec![
                PublishedRow::from_metrics(&metrics("NVDA", 120.0, 100.0), Some(1)),
                PublishedRow::from_metrics(&metrics("SPY", 500.0, 495.0), Some(2)),
            ],
            watchlist: vec![
                PublishedRow::from_metrics(&metrics("SPY", 500.0, 495.0), None),
                PublishedRow::from_metrics(&metrics("TLT", 90.0, 91.0), None),
            ],
        }
    }

    #[test]
    fn test_row_from_metrics() {
        let row = PublishedRow::from_metrics(&metrics("NVDA", 120.0, 100.0), Some(1));
        assert_eq!(row.text.price, "120.00");
        assert_eq!(row.text.change.text, "+20.00");
        assert_eq!(row.text.change_pct.text, "+20.00%");
        assert_eq!(row.text.month.text, crate::format::PLACEHOLDER);
        assert_eq!(row.baselines.previous_close, Some(100.0));
    }

    #[test]
    fn test_baseline_book() {
        let book = publication().baseline_book();
        assert_eq!(book.len(), 3);
        assert_eq!(book.get("tlt").unwrap().previous_close, Some(91.0));
        assert!(book.get("AAPL").is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs").join("published.json");

        let original = publication();
        original.save(&path).unwrap();

        let loaded = Publication::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = Publication::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
