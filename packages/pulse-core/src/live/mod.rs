//! Live recompute of published rows.
//!
//! Rows and their order are frozen by the build. Each refresh tick takes a
//! [`Generation`]; quote responses are applied per symbol and dropped when a
//! newer generation has already been committed for that symbol.

mod board;
mod market;
mod recompute;

pub use board::{ApplyReport, FeedStatus, LiveBoard, LiveRow};
pub use market::{session_heuristic, IndexTicker, MarketBanner, SessionSource};
pub use recompute::recompute_values;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic token identifying a refresh tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
