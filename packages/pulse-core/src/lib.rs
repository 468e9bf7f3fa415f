//! Pulse Core - Return metrics, rankings and live recompute.
//!
//! This crate provides the computational core behind the Pulse leaderboard:
//!
//! - **Metrics**: Baseline selection and day / month / year-to-date returns
//! - **Ranking**: Top-N leaderboard and fixed-order watchlist projection
//! - **Publishing**: Frozen rows carrying the baselines the live view needs
//! - **Live**: Quote-driven recompute of published rows without history
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pulse_core::{compute_metrics, Instrument, Observation, TrackerConfig};
//!
//! let config = TrackerConfig {
//!     month_lookback: 3,
//!     ..Default::default()
//! };
//! let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
//! let instrument = Instrument::new(
//!     "aapl",
//!     vec![
//!         Observation::new(day(1), 100.0),
//!         Observation::new(day(4), 102.0),
//!         Observation::new(day(5), 99.0),
//!         Observation::new(day(6), 105.0),
//!     ],
//! );
//!
//! let metrics = compute_metrics(&instrument, &config).unwrap();
//! assert!((metrics.month.unwrap() - 0.05).abs() < 1e-12);
//! ```

pub mod config;
pub mod format;
pub mod live;
pub mod metrics;
pub mod pipeline;
pub mod provider;
pub mod publish;
pub mod ranking;
pub mod types;
pub mod universe;

// Re-export commonly used types
pub use config::TrackerConfig;
pub use types::{Horizon, Instrument, MarketSession, Observation, QuoteSnapshot};

// Re-export main functionality
pub use live::{Generation, LiveBoard, MarketBanner};
pub use metrics::{compute_metrics, period_return, select_baseline, Baselines, InstrumentMetrics};
pub use pipeline::{build_publication, BuildOutput};
pub use provider::{HistoryProvider, NameResolver, QuoteProvider};
pub use publish::{BaselineBook, Publication, PublishedRow};
pub use ranking::{project_watchlist, rank_leaderboard, LeaderboardEntry};
pub use universe::Universe;

/// Error types for pulse-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider outage: {0}")]
    ProviderOutage(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown horizon: {0}")]
    UnknownHorizon(String),
}

/// Result type for pulse-core operations.
pub type Result<T> = std::result::Result<T, Error>;
