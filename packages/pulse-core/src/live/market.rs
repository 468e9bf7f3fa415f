//! Market status banner.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::Generation;
use crate::config::TrackerConfig;
use crate::format::{fmt_pct, fmt_price, Tone};
use crate::metrics::day_change;
use crate::types::{normalize_symbol, MarketSession, QuoteSnapshot};

const PRE_OPEN_MINUTE: u32 = 4 * 60;
const OPEN_MINUTE: u32 = 9 * 60 + 30;
const CLOSE_MINUTE: u32 = 16 * 60;
const POST_CLOSE_MINUTE: u32 = 20 * 60;

/// Guess the trading session from the clock.
///
/// Exchange time is UTC shifted by a fixed offset. Weekends are closed;
/// weekdays run pre-market 04:00, regular 09:30 to 16:00, after hours to 20:00.
pub fn session_heuristic(now: DateTime<Utc>, utc_offset_minutes: i32) -> MarketSession {
    let local = now.naive_utc() + Duration::minutes(utc_offset_minutes as i64);
    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return MarketSession::Closed;
    }

    let minute = local.hour() * 60 + local.minute();
    match minute {
        m if m < PRE_OPEN_MINUTE => MarketSession::Closed,
        m if m < OPEN_MINUTE => MarketSession::Pre,
        m if m < CLOSE_MINUTE => MarketSession::Regular,
        m if m < POST_CLOSE_MINUTE => MarketSession::Post,
        _ => MarketSession::Closed,
    }
}

/// Where the banner's session came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionSource {
    Provider,
    Heuristic,
}

/// One index in the banner.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexTicker {
    pub symbol: String,
    pub price: f64,
    pub change_fraction: Option<f64>,
}

impl IndexTicker {
    fn from_quote(quote: &QuoteSnapshot) -> Self {
        let change_fraction = day_change(quote.price, quote.previous_close)
            .map(|c| c.fraction)
            .or(quote.change_fraction);
        Self {
            symbol: normalize_symbol(&quote.symbol),
            price: quote.price,
            change_fraction,
        }
    }

    /// Banner text, e.g. `^GSPC 5,321.41 +0.42%`.
    pub fn label(&self) -> String {
        format!(
            "{} {} {}",
            self.symbol,
            fmt_price(Some(self.price)),
            fmt_pct(self.change_fraction)
        )
    }

    pub fn tone(&self) -> Tone {
        Tone::of(self.change_fraction)
    }
}

/// Market session and index levels, refreshed beside the tables.
#[derive(Debug, Clone)]
pub struct MarketBanner {
    index_symbols: Vec<String>,
    utc_offset_minutes: i32,
    indices: Vec<IndexTicker>,
    session: MarketSession,
    source: SessionSource,
    committed: Option<Generation>,
    failed: Option<Generation>,
}

impl MarketBanner {
    /// Create a banner showing the heuristic session until quotes arrive.
    pub fn new(config: &TrackerConfig, now: DateTime<Utc>) -> Self {
        Self {
            index_symbols: config.index_symbols.iter().map(|s| normalize_symbol(s)).collect(),
            utc_offset_minutes: config.exchange_utc_offset_minutes,
            indices: Vec::new(),
            session: session_heuristic(now, config.exchange_utc_offset_minutes),
            source: SessionSource::Heuristic,
            committed: None,
            failed: None,
        }
    }

    /// Index symbols to fetch.
    pub fn symbols(&self) -> &[String] {
        &self.index_symbols
    }

    pub fn indices(&self) -> &[IndexTicker] {
        &self.indices
    }

    pub fn session(&self) -> MarketSession {
        self.session
    }

    pub fn source(&self) -> SessionSource {
        self.source
    }

    /// Whether the latest banner fetch failed after the last update.
    pub fn is_stale(&self) -> bool {
        match (self.failed, self.committed) {
            (Some(failed), Some(committed)) => failed > committed,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Apply index quotes from `generation`. Returns false when superseded.
    pub fn apply(&mut self, generation: Generation, quotes: &[QuoteSnapshot], now: DateTime<Utc>) -> bool {
        if self.committed.is_some_and(|c| c > generation) {
            tracing::debug!("Dropping banner response {}, newer data committed", generation);
            return false;
        }

        let indices: Vec<IndexTicker> = self
            .index_symbols
            .iter()
            .filter_map(|symbol| {
                quotes
                    .iter()
                    .find(|q| normalize_symbol(&q.symbol) == *symbol)
                    .filter(|q| q.price.is_finite() && q.price > 0.0)
                    .map(IndexTicker::from_quote)
            })
            .collect();
        if !indices.is_empty() {
            self.indices = indices;
        }

        match quotes.iter().find_map(|q| q.market_session) {
            Some(session) => {
                self.session = session;
                self.source = SessionSource::Provider;
            }
            None => {
                self.session = session_heuristic(now, self.utc_offset_minutes);
                self.source = SessionSource::Heuristic;
            }
        }

        self.committed = Some(generation);
        true
    }

    /// Record a failed banner fetch. Index levels are kept; the session falls
    /// back to the clock.
    pub fn mark_failed(&mut self, generation: Generation, now: DateTime<Utc>) {
        if self.committed.is_some_and(|c| c > generation) {
            return;
        }
        if self.failed.is_none_or(|f| f < generation) {
            self.failed = Some(generation);
        }
        self.session = session_heuristic(now, self.utc_offset_minutes);
        self.source = SessionSource::Heuristic;
    }
}
