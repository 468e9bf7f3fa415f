//! Live view state
//!
//! Single owner of the board and banner. Only the event loop mutates it.

use chrono::{DateTime, Utc};
use pulse_core::live::ApplyReport;
use pulse_core::{Generation, Horizon, LiveBoard, MarketBanner, Publication, QuoteSnapshot, TrackerConfig};

// ============================================================================
// Application State
// ============================================================================

/// State of the watch command
#[derive(Debug, Clone)]
pub struct AppState {
    // Publication metadata
    pub generated_at: DateTime<Utc>,
    pub rank_horizon: Horizon,
    pub universe_count: usize,

    // Live data
    pub board: LiveBoard,
    pub banner: MarketBanner,

    // Loop bookkeeping
    pub ticks: u64,
    /// Whether the last quote response succeeded
    pub connected: bool,
}

impl AppState {
    /// Build state from a publication.
    pub fn new(publication: &Publication, config: &TrackerConfig, now: DateTime<Utc>) -> Self {
        Self {
            generated_at: publication.generated_at,
            rank_horizon: publication.rank_horizon,
            universe_count: publication.universe_count,
            board: LiveBoard::from_publication(publication),
            banner: MarketBanner::new(config, now),
            ticks: 0,
            connected: false,
        }
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Start a tick and return its generation.
    pub fn begin_tick(&mut self) -> Generation {
        self.ticks += 1;
        self.board.begin_tick()
    }

    pub fn apply_quotes(
        &mut self,
        generation: Generation,
        quotes: &[QuoteSnapshot],
        now: DateTime<Utc>,
    ) -> ApplyReport {
        self.connected = true;
        self.board.apply_quotes(generation, quotes, now)
    }

    pub fn quotes_failed(&mut self, generation: Generation, symbols: &[String], error: &str) {
        self.connected = false;
        self.board.mark_failed(generation, symbols, error);
    }

    pub fn apply_banner(&mut self, generation: Generation, quotes: &[QuoteSnapshot], now: DateTime<Utc>) -> bool {
        self.banner.apply(generation, quotes, now)
    }

    pub fn banner_failed(&mut self, generation: Generation, now: DateTime<Utc>) {
        self.banner.mark_failed(generation, now);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// One-line feed status, e.g. `Live, updated 14:31:05 UTC`.
    pub fn status_line(&self) -> String {
        let status = self.board.status();
        let updated = match status.last_success {
            Some(t) => format!("updated {}", t.format("%H:%M:%S UTC")),
            None if self.connected => "no quotes returned".to_string(),
            None => "waiting for quotes".to_string(),
        };

        if self.board.is_stale() || self.banner.is_stale() {
            let error = status.last_error.as_deref().unwrap_or("fetch failed");
            format!("Stale ({}), {}, retrying", error, updated)
        } else {
            format!("Live, {}", updated)
        }
    }
}
