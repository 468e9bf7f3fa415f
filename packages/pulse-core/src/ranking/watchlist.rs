//! Fixed-order watchlist.

use std::collections::{HashMap, HashSet};

use crate::metrics::InstrumentMetrics;
use crate::types::normalize_symbol;

/// Join a fixed symbol list against computed metrics.
///
/// Output follows `symbols` exactly. Symbols without metrics are dropped and
/// a symbol listed more than once is kept at its first position. Values never
/// affect the order.
pub fn project_watchlist(symbols: &[String], metrics: &[InstrumentMetrics]) -> Vec<InstrumentMetrics> {
    let by_symbol: HashMap<&str, &InstrumentMetrics> =
        metrics.iter().map(|m| (m.symbol.as_str(), m)).collect();
    let mut seen = HashSet::new();

    symbols
        .iter()
        .map(|s| normalize_symbol(s))
        .filter(|s| seen.insert(s.clone()))
        .filter_map(|s| {
            let found = by_symbol.get(s.as_str()).map(|m| (*m).clone());
            if found.is_none() {
                tracing::debug!("Watchlist symbol {} has no history, dropping", s);
            }
            found
        })
        .collect()
}
