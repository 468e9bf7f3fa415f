//! Quote-to-row recompute.

use crate::format::RowValues;
use crate::metrics::{day_change, period_return, Baselines};
use crate::types::QuoteSnapshot;

/// Recompute a row's values from a fresh quote and its frozen baselines.
///
/// The day delta uses the stored previous close and the same formula as the
/// build. Without a stored previous close, the absolute and percent change
/// each take the quote's own field, else derive from the quote's previous
/// close. Month and year-to-date always come from the stored baselines.
pub fn recompute_values(baselines: &Baselines, quote: &QuoteSnapshot) -> RowValues {
    let price = quote.price;
    let (change, change_fraction) = match day_change(price, baselines.previous_close) {
        Some(c) => (Some(c.absolute), Some(c.fraction)),
        None => quote_day_change(quote),
    };

    RowValues {
        price: Some(price),
        change,
        change_fraction,
        day: change_fraction,
        month: period_return(price, baselines.month),
        ytd: period_return(price, baselines.ytd),
    }
}

/// Each field falls back on its own to the quote's previous close.
fn quote_day_change(quote: &QuoteSnapshot) -> (Option<f64>, Option<f64>) {
    let derived = day_change(quote.price, quote.previous_close);
    (
        quote.change.or(derived.map(|c| c.absolute)),
        quote.change_fraction.or(derived.map(|c| c.fraction)),
    )
}
