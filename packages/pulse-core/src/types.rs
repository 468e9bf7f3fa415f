//! Core data types for the Pulse tracker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A single daily close.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    /// Trading date
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
}

impl Observation {
    /// Create a new observation.
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// An instrument with its cleaned close history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    /// Ticker symbol (uppercase)
    pub symbol: String,
    /// Display name, falls back to the symbol
    pub name: String,
    /// Observations ordered by date, oldest first
    pub history: Vec<Observation>,
}

impl Instrument {
    /// Create an instrument, cleaning the supplied history.
    ///
    /// Non-finite closes are dropped, observations are sorted by date and a
    /// repeated date keeps the value that came last.
    pub fn new(symbol: &str, history: Vec<Observation>) -> Self {
        let symbol = normalize_symbol(symbol);
        Self {
            name: symbol.clone(),
            symbol,
            history: clean_history(history),
        }
    }

    /// Set the display name. Blank names keep the symbol.
    pub fn with_name(mut self, name: &str) -> Self {
        let name = name.trim();
        if !name.is_empty() {
            self.name = name.to_string();
        }
        self
    }

    /// Most recent observation, if any.
    pub fn last(&self) -> Option<&Observation> {
        self.history.last()
    }

    /// Whether the instrument has no usable history.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Uppercase and trim a ticker symbol.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

fn clean_history(mut history: Vec<Observation>) -> Vec<Observation> {
    history.retain(|o| o.close.is_finite());
    // stable sort keeps provider order within a date
    history.sort_by_key(|o| o.date);

    let mut cleaned: Vec<Observation> = Vec::with_capacity(history.len());
    for obs in history {
        match cleaned.last_mut() {
            Some(prev) if prev.date == obs.date => *prev = obs,
            _ => cleaned.push(obs),
        }
    }
    cleaned
}

/// Return horizon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Day,
    #[default]
    Month,
    Ytd,
}

impl Horizon {
    /// All horizons in display order.
    pub const ALL: [Horizon; 3] = [Horizon::Day, Horizon::Month, Horizon::Ytd];

    /// Column label used in tables.
    pub fn label(&self) -> &'static str {
        match self {
            Horizon::Day => "Day",
            Horizon::Month => "Month",
            Horizon::Ytd => "YTD",
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Horizon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Horizon::Day),
            "month" => Ok(Horizon::Month),
            "ytd" | "year-to-date" => Ok(Horizon::Ytd),
            other => Err(Error::UnknownHorizon(other.to_string())),
        }
    }
}

/// Trading session of the exchange.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarketSession {
    Pre,
    Regular,
    Post,
    Closed,
}

impl MarketSession {
    /// Parse a provider market-state field such as `REGULAR` or `POSTPOST`.
    pub fn from_provider(state: &str) -> Option<Self> {
        match state.trim().to_uppercase().as_str() {
            "REGULAR" => Some(MarketSession::Regular),
            "PRE" | "PREPRE" => Some(MarketSession::Pre),
            "POST" | "POSTPOST" => Some(MarketSession::Post),
            "CLOSED" => Some(MarketSession::Closed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarketSession::Pre => "Pre-market",
            MarketSession::Regular => "Market open",
            MarketSession::Post => "After hours",
            MarketSession::Closed => "Market closed",
        }
    }
}

/// Point-in-time quote used by the live view. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSnapshot {
    /// Ticker symbol (uppercase)
    pub symbol: String,
    /// Current price
    pub price: f64,
    /// Provider previous close
    pub previous_close: Option<f64>,
    /// Provider absolute change vs previous close
    pub change: Option<f64>,
    /// Provider change as a fraction (0.01 = 1%)
    pub change_fraction: Option<f64>,
    /// Provider market state
    pub market_session: Option<MarketSession>,
}

impl QuoteSnapshot {
    /// Create a quote with only a price.
    pub fn new(symbol: &str, price: f64) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            price,
            previous_close: None,
            change: None,
            change_fraction: None,
            market_session: None,
        }
    }
}
