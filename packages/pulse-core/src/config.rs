//! Tracker configuration.
//!
//! A single immutable value handed to every component instead of module-level
//! constants. Every field has a default so partial TOML tables deserialize.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::Horizon;
use crate::{Error, Result};

/// Default month lookback in trading days.
pub const DEFAULT_MONTH_LOOKBACK: usize = 21;
/// Default leaderboard size.
pub const DEFAULT_TOP_N: usize = 10;
/// Default live refresh interval in seconds.
pub const DEFAULT_REFRESH_SECS: u64 = 60;
/// Upstream limit on symbols per quote request.
pub const DEFAULT_QUOTE_BATCH_SIZE: usize = 40;
/// Calendar days of history to request (enough for year-to-date).
pub const DEFAULT_HISTORY_DAYS: u32 = 366;

/// Configuration for the build pipeline and the live engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Trading days between the month baseline and the last close
    pub month_lookback: usize,
    /// Horizon used to rank the leaderboard
    pub rank_horizon: Horizon,
    /// Leaderboard size
    pub top_n: usize,
    /// Calendar days of history requested from the provider
    pub history_days: u32,
    /// Seconds between live refresh ticks
    pub refresh_interval_secs: u64,
    /// Maximum symbols per quote request
    pub quote_batch_size: usize,
    /// Index symbols shown in the market banner
    pub index_symbols: Vec<String>,
    /// Exchange offset from UTC in minutes, used by the session heuristic
    pub exchange_utc_offset_minutes: i32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            month_lookback: DEFAULT_MONTH_LOOKBACK,
            rank_horizon: Horizon::Month,
            top_n: DEFAULT_TOP_N,
            history_days: DEFAULT_HISTORY_DAYS,
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            quote_batch_size: DEFAULT_QUOTE_BATCH_SIZE,
            index_symbols: vec!["^GSPC".to_string(), "^IXIC".to_string()],
            exchange_utc_offset_minutes: -5 * 60,
        }
    }
}

impl TrackerConfig {
    /// Check that the configuration can drive the pipeline and the live loop.
    pub fn validate(&self) -> Result<()> {
        if self.month_lookback == 0 {
            return Err(Error::InvalidConfig(
                "month_lookback must be at least 1".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(Error::InvalidConfig("top_n must be at least 1".to_string()));
        }
        if self.quote_batch_size == 0 {
            return Err(Error::InvalidConfig(
                "quote_batch_size must be at least 1".to_string(),
            ));
        }
        if self.refresh_interval_secs == 0 {
            return Err(Error::InvalidConfig(
                "refresh_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.exchange_utc_offset_minutes.abs() >= 24 * 60 {
            return Err(Error::InvalidConfig(format!(
                "exchange_utc_offset_minutes out of range: {}",
                self.exchange_utc_offset_minutes
            )));
        }
        Ok(())
    }

    /// Refresh interval as a duration.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Lookback count for horizons that use a fixed number of observations.
    ///
    /// Year-to-date is anchored on the calendar, not a count.
    pub fn lookback(&self, horizon: Horizon) -> Option<usize> {
        match horizon {
            Horizon::Day => Some(1),
            Horizon::Month => Some(self.month_lookback),
            Horizon::Ytd => None,
        }
    }
}
