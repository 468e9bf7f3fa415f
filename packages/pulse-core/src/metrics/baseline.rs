//! Baseline selection.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::types::{Horizon, Observation};

/// Anchor observation for a horizon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Baseline {
    /// Date of the anchor close
    pub date: NaiveDate,
    /// Anchor price, always finite and nonzero
    pub price: f64,
}

/// Select the baseline for `horizon` from a cleaned, date-ordered history.
///
/// Returns `None` when the history is too short, when no same-year
/// observation exists, or when the anchor price is zero or not finite.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use pulse_core::{select_baseline, Horizon, Observation, TrackerConfig};
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
/// let history = vec![
///     Observation::new(day(1), 100.0),
///     Observation::new(day(2), 102.0),
/// ];
///
/// let baseline = select_baseline(&history, Horizon::Day, &TrackerConfig::default()).unwrap();
/// assert_eq!(baseline.price, 100.0);
/// assert!(select_baseline(&history, Horizon::Month, &TrackerConfig::default()).is_none());
/// ```
pub fn select_baseline(
    history: &[Observation],
    horizon: Horizon,
    config: &TrackerConfig,
) -> Option<Baseline> {
    let anchor = match config.lookback(horizon) {
        Some(lookback) => lookback_anchor(history, lookback),
        None => year_start_anchor(history),
    }?;

    if anchor.close == 0.0 || !anchor.close.is_finite() {
        return None;
    }

    Some(Baseline {
        date: anchor.date,
        price: anchor.close,
    })
}

/// Observation exactly `lookback` positions before the last.
fn lookback_anchor(history: &[Observation], lookback: usize) -> Option<&Observation> {
    if history.len() <= lookback {
        return None;
    }
    history.get(history.len() - 1 - lookback)
}

/// Earliest observation in the calendar year of the last observation.
fn year_start_anchor(history: &[Observation]) -> Option<&Observation> {
    let year = history.last()?.date.year();
    history.iter().find(|o| o.date.year() == year)
}

/// The three baselines a published row carries into the live view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Baselines {
    /// Previous close (day horizon)
    pub previous_close: Option<f64>,
    /// Month baseline
    pub month: Option<f64>,
    /// Year-to-date baseline
    pub ytd: Option<f64>,
}

impl Baselines {
    /// Select all three baselines from a history.
    pub fn from_history(history: &[Observation], config: &TrackerConfig) -> Self {
        let price = |horizon| select_baseline(history, horizon, config).map(|b| b.price);
        Self {
            previous_close: price(Horizon::Day),
            month: price(Horizon::Month),
            ytd: price(Horizon::Ytd),
        }
    }

    /// Baseline for a horizon.
    pub fn get(&self, horizon: Horizon) -> Option<f64> {
        match horizon {
            Horizon::Day => self.previous_close,
            Horizon::Month => self.month,
            Horizon::Ytd => self.ytd,
        }
    }
}
