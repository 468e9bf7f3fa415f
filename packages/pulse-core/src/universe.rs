//! Ticker lists.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::types::normalize_symbol;
use crate::Result;

/// Stocks scanned when no stock list is present.
pub const DEFAULT_STOCKS: &[&str] = &["AAPL", "MSFT", "NVDA", "AMZN", "GOOGL", "META"];
/// ETFs scanned when no ETF list is present.
pub const DEFAULT_ETFS: &[&str] = &["SPY", "QQQ", "DIA", "IWM", "TLT", "SMH", "ARKK"];
/// Watchlist shown when no watchlist file is present.
pub const DEFAULT_WATCHLIST: &[&str] = &["SPY", "QQQ", "DIA", "IWM"];

/// Read a ticker file: one symbol per line, blank lines and `#` comments
/// ignored. A missing file yields `default`.
pub fn read_tickers(path: &Path, default: &[&str]) -> Result<Vec<String>> {
    if !path.exists() {
        tracing::debug!("Ticker file {} not found, using defaults", path.display());
        return Ok(default.iter().map(|s| s.to_string()).collect());
    }

    let content = fs::read_to_string(path)?;
    Ok(parse_tickers(&content))
}

/// Parse ticker file content.
pub fn parse_tickers(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(normalize_symbol)
        .collect()
}

/// Symbols scanned for the leaderboard plus the fixed watchlist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Universe {
    /// Scanned symbols, deduplicated, first occurrence kept
    pub symbols: Vec<String>,
    /// Watchlist in display order
    pub watchlist: Vec<String>,
}

impl Universe {
    /// Combine stock and ETF lists, keeping the first occurrence of each.
    pub fn new(stocks: Vec<String>, etfs: Vec<String>, watchlist: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        let symbols = stocks
            .into_iter()
            .chain(etfs)
            .map(|s| normalize_symbol(&s))
            .filter(|s| seen.insert(s.clone()))
            .collect();

        Self {
            symbols,
            watchlist: watchlist.iter().map(|s| normalize_symbol(s)).collect(),
        }
    }

    /// Every symbol that needs history: scanned symbols, then watchlist-only.
    pub fn history_symbols(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = self.symbols.iter().map(String::as_str).collect();
        let mut all = self.symbols.clone();
        for symbol in &self.watchlist {
            if seen.insert(symbol.as_str()) {
                all.push(symbol.clone());
            }
        }
        all
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && self.watchlist.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_tickers() {
        let content = "# stocks\nAAPL\n\n  msft  \n#NVDA\nGOOGL\n";
        assert_eq!(parse_tickers(content), list(&["AAPL", "MSFT", "GOOGL"]));
    }

    #[test]
    fn test_read_tickers_missing_file() {
        let dir = tempdir().unwrap();
        let tickers = read_tickers(&dir.path().join("none.txt"), DEFAULT_ETFS).unwrap();
        assert_eq!(tickers.len(), DEFAULT_ETFS.len());
        assert_eq!(tickers[0], "SPY");
    }

    #[test]
    fn test_read_tickers_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tickers_stocks.txt");
        std::fs::write(&path, "AMD\n# comment\nINTC\n").unwrap();

        assert_eq!(read_tickers(&path, DEFAULT_STOCKS).unwrap(), list(&["AMD", "INTC"]));
    }

    #[test]
    fn test_universe_dedupes_keeping_order() {
        let universe = Universe::new(
            list(&["AAPL", "SPY", "msft"]),
            list(&["SPY", "QQQ", "MSFT"]),
            list(&["qqq", "BRK-B"]),
        );

        assert_eq!(universe.symbols, list(&["AAPL", "SPY", "MSFT", "QQQ"]));
        assert_eq!(universe.watchlist, list(&["QQQ", "BRK-B"]));
        assert_eq!(
            universe.history_symbols(),
            list(&["AAPL", "SPY", "MSFT", "QQQ", "BRK-B"])
        );
    }
}
