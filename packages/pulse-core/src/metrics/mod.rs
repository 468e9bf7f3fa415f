//! Return metrics.
//!
//! Baseline selection per horizon and the return arithmetic built on it.

mod baseline;
mod returns;

pub use baseline::{select_baseline, Baseline, Baselines};
pub use returns::{compute_metrics, day_change, period_return, DayChange, InstrumentMetrics};
