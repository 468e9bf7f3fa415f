//! Return calculation.

use serde::{Deserialize, Serialize};

use super::baseline::Baselines;
use crate::config::TrackerConfig;
use crate::types::{Horizon, Instrument};

/// Fractional return `last / baseline - 1`.
///
/// Undefined when the baseline is missing or zero, or when either input is
/// not finite. Never panics.
///
/// # Example
///
/// ```rust
/// use pulse_core::period_return;
///
/// assert!((period_return(105.0, Some(100.0)).unwrap() - 0.05).abs() < 1e-12);
/// assert_eq!(period_return(105.0, Some(0.0)), None);
/// assert_eq!(period_return(105.0, None), None);
/// ```
pub fn period_return(last: f64, baseline: Option<f64>) -> Option<f64> {
    let baseline = baseline?;
    if baseline == 0.0 || !baseline.is_finite() || !last.is_finite() {
        return None;
    }
    Some(last / baseline - 1.0)
}

/// Change against the previous close.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DayChange {
    /// `last - previous_close`
    pub absolute: f64,
    /// Same value as the day horizon return
    pub fraction: f64,
}

/// Absolute and fractional change against the previous close.
///
/// The fraction goes through [`period_return`] so it always equals the day
/// horizon return for the same inputs.
pub fn day_change(last: f64, previous_close: Option<f64>) -> Option<DayChange> {
    let fraction = period_return(last, previous_close)?;
    let previous_close = previous_close?;
    Some(DayChange {
        absolute: last - previous_close,
        fraction,
    })
}

/// Metrics for one instrument at build time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstrumentMetrics {
    /// Ticker symbol
    pub symbol: String,
    /// Display name
    pub name: String,
    /// Last close
    pub price: f64,
    /// Absolute change vs previous close
    pub change: Option<f64>,
    /// Fractional change vs previous close
    pub change_fraction: Option<f64>,
    /// Day return
    pub day: Option<f64>,
    /// Month return
    pub month: Option<f64>,
    /// Year-to-date return
    pub ytd: Option<f64>,
    /// Baselines the returns were computed from
    pub baselines: Baselines,
}

impl InstrumentMetrics {
    /// Return for a horizon.
    pub fn horizon(&self, horizon: Horizon) -> Option<f64> {
        match horizon {
            Horizon::Day => self.day,
            Horizon::Month => self.month,
            Horizon::Ytd => self.ytd,
        }
    }
}

/// Compute every metric for an instrument.
///
/// Returns `None` when the instrument has no history; individual horizons
/// without enough data are `None` inside the result.
pub fn compute_metrics(instrument: &Instrument, config: &TrackerConfig) -> Option<InstrumentMetrics> {
    let last = instrument.last()?.close;
    let baselines = Baselines::from_history(&instrument.history, config);
    let change = day_change(last, baselines.previous_close);

    Some(InstrumentMetrics {
        symbol: instrument.symbol.clone(),
        name: instrument.name.clone(),
        price: last,
        change: change.map(|c| c.absolute),
        change_fraction: change.map(|c| c.fraction),
        day: period_return(last, baselines.previous_close),
        month: period_return(last, baselines.month),
        ytd: period_return(last, baselines.ytd),
        baselines,
    })
}
