//! Market data collaborators.
//!
//! These traits are the seams between the computation and whatever serves
//! prices. The HTTP client in `pulse-live` implements all three; tests use
//! in-memory fakes.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::types::{Observation, QuoteSnapshot};
use crate::Result;

/// Source of daily close histories.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetch up to `days` calendar days of closes for each symbol.
    ///
    /// Unknown or delisted symbols are omitted from the map; they do not fail
    /// the call. An `Err` means the provider could not be reached at all.
    async fn fetch_histories(
        &self,
        symbols: &[String],
        days: u32,
    ) -> Result<HashMap<String, Vec<Observation>>>;
}

/// Best-effort display names.
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Names for whichever symbols could be resolved. Never fails; callers
    /// fall back to the symbol for anything missing.
    async fn resolve_names(&self, symbols: &[String]) -> HashMap<String, String>;
}

/// Source of live quotes.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Quotes for one bounded batch. Symbols without a quote are absent.
    async fn fetch_quotes(&self, symbols: &[String]) -> Result<Vec<QuoteSnapshot>>;
}

/// Split symbols into request batches of at most `size`.
pub fn quote_batches(symbols: &[String], size: usize) -> Vec<Vec<String>> {
    symbols.chunks(size.max(1)).map(|chunk| chunk.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_batches() {
        let symbols: Vec<String> = (0..95).map(|i| format!("S{}", i)).collect();
        let batches = quote_batches(&symbols, 40);

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 40);
        assert_eq!(batches[2].len(), 15);
        assert_eq!(batches[2][0], "S80");
    }

    #[test]
    fn test_quote_batches_empty() {
        assert!(quote_batches(&[], 40).is_empty());
    }
}
