//! Build pipeline.
//!
//! history → baselines → returns → {leaderboard, watchlist} → publication.
//! Runs once per build, sequentially. Failures of a single instrument are
//! logged and skipped; only a provider that returns nothing aborts.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::config::TrackerConfig;
use crate::metrics::{compute_metrics, InstrumentMetrics};
use crate::provider::{HistoryProvider, NameResolver};
use crate::publish::{Publication, PublishedRow};
use crate::ranking::{project_watchlist, rank_leaderboard, LeaderboardEntry};
use crate::types::{normalize_symbol, Instrument};
use crate::universe::Universe;
use crate::{Error, Result};

/// Result of one build.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Frozen rows for the live view
    pub publication: Publication,
    /// Metrics of every instrument that had history
    pub metrics: Vec<InstrumentMetrics>,
    /// Ranked entries
    pub leaderboard: Vec<LeaderboardEntry>,
    /// Watchlist metrics in listed order
    pub watchlist: Vec<InstrumentMetrics>,
}

/// Run the build: fetch history, compute metrics, rank, project, publish.
pub async fn build_publication<H, N>(
    config: &TrackerConfig,
    universe: &Universe,
    history: &H,
    names: &N,
    generated_at: DateTime<Utc>,
) -> Result<BuildOutput>
where
    H: HistoryProvider + ?Sized,
    N: NameResolver + ?Sized,
{
    config.validate()?;
    if universe.is_empty() {
        return Err(Error::InvalidConfig("universe has no symbols".to_string()));
    }

    let symbols = universe.history_symbols();
    tracing::info!(
        "Fetching {} days of history for {} symbols",
        config.history_days,
        symbols.len()
    );

    let histories: HashMap<String, _> = history
        .fetch_histories(&symbols, config.history_days)
        .await
        .map_err(|e| match e {
            Error::ProviderOutage(_) => e,
            other => Error::ProviderOutage(other.to_string()),
        })?
        .into_iter()
        .map(|(symbol, observations)| (normalize_symbol(&symbol), observations))
        .collect();

    if histories.is_empty() {
        return Err(Error::ProviderOutage(format!(
            "no history returned for any of {} symbols",
            symbols.len()
        )));
    }

    let with_history: Vec<String> = symbols
        .iter()
        .filter(|s| histories.contains_key(s.as_str()))
        .cloned()
        .collect();
    let names = names.resolve_names(&with_history).await;

    let mut metrics = Vec::with_capacity(with_history.len());
    for symbol in &symbols {
        let Some(observations) = histories.get(symbol) else {
            tracing::warn!("No history for {}, skipping", symbol);
            continue;
        };

        let name = names.get(symbol).map(String::as_str).unwrap_or_default();
        let instrument = Instrument::new(symbol, observations.clone()).with_name(name);

        match compute_metrics(&instrument, config) {
            Some(m) => metrics.push(m),
            None => tracing::warn!("History for {} is empty after cleaning, skipping", symbol),
        }
    }

    let scanned: HashSet<&str> = universe.symbols.iter().map(String::as_str).collect();
    let pool: Vec<InstrumentMetrics> = metrics
        .iter()
        .filter(|m| scanned.contains(m.symbol.as_str()))
        .cloned()
        .collect();

    let leaderboard = rank_leaderboard(&pool, config.rank_horizon, config.top_n);
    let watchlist = project_watchlist(&universe.watchlist, &metrics);

    tracing::info!(
        "Ranked {} of {} instruments by {}, {} watchlist rows",
        leaderboard.len(),
        pool.len(),
        config.rank_horizon,
        watchlist.len()
    );

    let publication = Publication {
        generated_at,
        rank_horizon: config.rank_horizon,
        top_n: config.top_n,
        universe_count: pool.len(),
        leaderboard: leaderboard
            .iter()
            .map(|e| PublishedRow::from_metrics(&e.metrics, Some(e.rank)))
            .collect(),
        watchlist: watchlist
            .iter()
            .map(|m| PublishedRow::from_metrics(m, None))
            .collect(),
    };

    Ok(BuildOutput {
        publication,
        metrics,
        leaderboard,
        watchlist,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Horizon, Observation};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct FakeHistory {
        data: HashMap<String, Vec<Observation>>,
        fail: bool,
    }

    #[async_trait]
    impl HistoryProvider for FakeHistory {
        async fn fetch_histories(
            &self,
            symbols: &[String],
            _days: u32,
        ) -> Result<HashMap<String, Vec<Observation>>> {
            if self.fail {
                return Err(Error::Provider("connection refused".to_string()));
            }
            Ok(symbols
                .iter()
                .filter_map(|s| self.data.get(s).map(|h| (s.to_lowercase(), h.clone())))
                .collect())
        }
    }

    struct FakeNames;

    #[async_trait]
    impl NameResolver for FakeNames {
        async fn resolve_names(&self, symbols: &[String]) -> HashMap<String, String> {
            symbols
                .iter()
                .filter(|s| s.as_str() != "QQQ")
                .map(|s| (s.clone(), format!("{} Name", s)))
                .collect()
        }
    }

    fn closes(values: &[f64]) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &c)| Observation::new(start + chrono::Days::new(i as u64), c))
            .collect()
    }

    fn provider() -> FakeHistory {
        let mut data = HashMap::new();
        data.insert("AAPL".to_string(), closes(&[100.0, 101.0, 102.0, 110.0]));
        data.insert("MSFT".to_string(), closes(&[100.0, 100.0, 100.0, 95.0]));
        data.insert("SPY".to_string(), closes(&[100.0, 102.0, 99.0, 105.0]));
        data.insert("QQQ".to_string(), closes(&[100.0, 103.0]));
        data.insert("TLT".to_string(), closes(&[f64::NAN]));
        data.insert("GLD".to_string(), closes(&[180.0, 181.0, 182.0, 183.0]));
        FakeHistory { data, fail: false }
    }

    fn config() -> TrackerConfig {
        TrackerConfig {
            month_lookback: 3,
            top_n: 2,
            ..Default::default()
        }
    }

    fn universe() -> Universe {
        let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Universe::new(
            list(&["AAPL", "MSFT", "DELISTED"]),
            list(&["SPY", "QQQ", "TLT"]),
            list(&["GLD", "QQQ", "NOPE", "MSFT"]),
        )
    }

    #[tokio::test]
    async fn test_build_publication() {
        let output = build_publication(&config(), &universe(), &provider(), &FakeNames, Utc::now())
            .await
            .unwrap();

        // AAPL +10%, SPY +5%, MSFT -5%, QQQ has no month value
        let ranked: Vec<&str> = output
            .publication
            .leaderboard
            .iter()
            .map(|r| r.symbol.as_str())
            .collect();
        assert_eq!(ranked, vec!["AAPL", "SPY"]);
        assert_eq!(output.publication.leaderboard[1].rank, Some(2));
        assert_eq!(output.publication.leaderboard[1].text.month.text, "+5.00%");

        let watch: Vec<&str> = output
            .publication
            .watchlist
            .iter()
            .map(|r| r.symbol.as_str())
            .collect();
        assert_eq!(watch, vec!["GLD", "QQQ", "MSFT"]);

        // QQQ is listed but has no month value: kept with a placeholder
        assert_eq!(output.publication.watchlist[1].text.month.text, crate::format::PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_names_fall_back_to_symbol() {
        let output = build_publication(&config(), &universe(), &provider(), &FakeNames, Utc::now())
            .await
            .unwrap();

        let by_symbol: HashMap<&str, &InstrumentMetrics> =
            output.metrics.iter().map(|m| (m.symbol.as_str(), m)).collect();
        assert_eq!(by_symbol["AAPL"].name, "AAPL Name");
        assert_eq!(by_symbol["QQQ"].name, "QQQ");
        assert!(!by_symbol.contains_key("TLT"));
        assert!(!by_symbol.contains_key("DELISTED"));
    }

    #[tokio::test]
    async fn test_watchlist_only_symbols_not_ranked() {
        let cfg = TrackerConfig {
            top_n: 10,
            ..config()
        };
        let output = build_publication(&cfg, &universe(), &provider(), &FakeNames, Utc::now())
            .await
            .unwrap();

        assert!(output.leaderboard.iter().all(|e| e.metrics.symbol != "GLD"));
        assert_eq!(output.publication.universe_count, 4);
        assert!(output
            .leaderboard
            .iter()
            .all(|e| e.value(Horizon::Month).is_some()));
    }

    #[tokio::test]
    async fn test_provider_failure_is_outage() {
        let failing = FakeHistory {
            data: HashMap::new(),
            fail: true,
        };
        let result = build_publication(&config(), &universe(), &failing, &FakeNames, Utc::now()).await;
        assert!(matches!(result, Err(Error::ProviderOutage(_))));

        let empty = FakeHistory {
            data: HashMap::new(),
            fail: false,
        };
        let result = build_publication(&config(), &universe(), &empty, &FakeNames, Utc::now()).await;
        assert!(matches!(result, Err(Error::ProviderOutage(_))));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let cfg = TrackerConfig {
            top_n: 0,
            ..Default::default()
        };
        let result = build_publication(&cfg, &universe(), &provider(), &FakeNames, Utc::now()).await;
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
