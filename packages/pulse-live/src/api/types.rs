//! Market data API response types

use chrono::{DateTime, NaiveDate};
use pulse_core::{MarketSession, Observation, QuoteSnapshot};
use serde::Deserialize;

// ============================================================================
// Chart (daily history)
// ============================================================================

/// Chart endpoint envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChartMeta {
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResult {
    /// Daily closes keyed by exchange-local date. Null closes are skipped.
    pub fn observations(&self) -> Vec<Observation> {
        let Some(quote) = self.indicators.quote.first() else {
            return Vec::new();
        };

        self.timestamp
            .iter()
            .zip(quote.close.iter())
            .filter_map(|(ts, close)| {
                let close = (*close)?;
                let date = local_date(*ts, self.meta.gmtoffset)?;
                Some(Observation::new(date, close))
            })
            .collect()
    }
}

fn local_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmtoffset, 0).map(|dt| dt.date_naive())
}

// ============================================================================
// Quote
// ============================================================================

/// Quote endpoint envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quote_response: QuoteBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteBody {
    #[serde(default)]
    pub result: Vec<QuoteResult>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// A single quote
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub symbol: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
    #[serde(default)]
    pub regular_market_previous_close: Option<f64>,
    #[serde(default)]
    pub regular_market_change: Option<f64>,
    /// Percent units, 1.5 means 1.5%
    #[serde(default)]
    pub regular_market_change_percent: Option<f64>,
    #[serde(default)]
    pub market_state: Option<String>,
}

impl QuoteResult {
    /// Display name, short name preferred.
    pub fn display_name(&self) -> Option<&str> {
        self.short_name
            .as_deref()
            .or(self.long_name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Convert to a snapshot. Quotes without a price are dropped.
    pub fn to_snapshot(&self) -> Option<QuoteSnapshot> {
        let price = self.regular_market_price?;
        let mut snapshot = QuoteSnapshot::new(&self.symbol, price);
        snapshot.previous_close = self.regular_market_previous_close;
        snapshot.change = self.regular_market_change;
        snapshot.change_fraction = self.regular_market_change_percent.map(|p| p / 100.0);
        snapshot.market_session = self
            .market_state
            .as_deref()
            .and_then(MarketSession::from_provider);
        Some(snapshot)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error object embedded in API envelopes
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.code.as_deref().unwrap_or("error"),
            self.description.as_deref().unwrap_or("no description")
        )
    }
}
