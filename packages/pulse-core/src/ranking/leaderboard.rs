//! Top-N leaderboard.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::metrics::InstrumentMetrics;
use crate::types::Horizon;

/// A ranked leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    /// 1-based rank
    pub rank: usize,
    /// Metrics of the ranked instrument
    pub metrics: InstrumentMetrics,
}

impl LeaderboardEntry {
    /// Value of the ranking horizon for this entry.
    pub fn value(&self, horizon: Horizon) -> Option<f64> {
        self.metrics.horizon(horizon)
    }
}

/// Rank instruments by `horizon`, best first, keeping at most `top_n`.
///
/// Instruments whose horizon value is undefined are not eligible. Equal
/// values are ordered by symbol so the output does not depend on the order
/// the provider returned instruments in.
pub fn rank_leaderboard(
    metrics: &[InstrumentMetrics],
    horizon: Horizon,
    top_n: usize,
) -> Vec<LeaderboardEntry> {
    let mut eligible: Vec<(f64, &InstrumentMetrics)> = metrics
        .iter()
        .filter_map(|m| m.horizon(horizon).map(|value| (value, m)))
        .filter(|(value, _)| value.is_finite())
        .collect();

    eligible.sort_by(|(a, ma), (b, mb)| {
        b.partial_cmp(a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| ma.symbol.cmp(&mb.symbol))
    });

    eligible
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(idx, (_, m))| LeaderboardEntry {
            rank: idx + 1,
            metrics: m.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Baselines;

    fn metrics(symbol: &str, month: Option<f64>) -> InstrumentMetrics {
        InstrumentMetrics {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            price: 100.0,
            change: None,
            change_fraction: None,
            day: Some(0.0),
            month,
            ytd: None,
            baselines: Baselines::default(),
        }
    }

    #[test]
    fn test_rank_orders_descending() {
        let input = vec![
            metrics("AAA", Some(0.01)),
            metrics("BBB", Some(0.07)),
            metrics("CCC", Some(-0.03)),
            metrics("DDD", Some(0.04)),
        ];

        let board = rank_leaderboard(&input, Horizon::Month, 10);
        let symbols: Vec<&str> = board.iter().map(|e| e.metrics.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BBB", "DDD", "AAA", "CCC"]);

        let ranks: Vec<usize> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_undefined_values_excluded() {
        let input = vec![
            metrics("AAA", None),
            metrics("BBB", Some(0.02)),
            metrics("CCC", Some(f64::NAN)),
        ];

        let board = rank_leaderboard(&input, Horizon::Month, 10);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].metrics.symbol, "BBB");
        assert!(board.iter().all(|e| e.value(Horizon::Month).is_some()));
    }

    #[test]
    fn test_truncates_to_top_n() {
        let input: Vec<InstrumentMetrics> = (0..25)
            .map(|i| metrics(&format!("S{:02}", i), Some(i as f64 / 100.0)))
            .collect();

        let board = rank_leaderboard(&input, Horizon::Month, 10);
        assert_eq!(board.len(), 10);
        assert_eq!(board[0].metrics.symbol, "S24");
        assert_eq!(board[9].rank, 10);

        for pair in board.windows(2) {
            assert!(pair[0].value(Horizon::Month) >= pair[1].value(Horizon::Month));
        }
    }

    #[test]
    fn test_ties_broken_by_symbol() {
        let input = vec![
            metrics("ZETA", Some(0.05)),
            metrics("BETA", Some(0.02)),
            metrics("ALFA", Some(0.05)),
        ];

        let board = rank_leaderboard(&input, Horizon::Month, 1);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].metrics.symbol, "ALFA");

        let reversed: Vec<InstrumentMetrics> = input.into_iter().rev().collect();
        let board = rank_leaderboard(&reversed, Horizon::Month, 2);
        assert_eq!(board[0].metrics.symbol, "ALFA");
        assert_eq!(board[1].metrics.symbol, "ZETA");
    }

    #[test]
    fn test_rank_by_other_horizon() {
        let mut a = metrics("AAA", Some(0.10));
        a.day = Some(-0.01);
        let mut b = metrics("BBB", Some(0.01));
        b.day = Some(0.02);

        let board = rank_leaderboard(&[a, b], Horizon::Day, 10);
        assert_eq!(board[0].metrics.symbol, "BBB");
    }
}
