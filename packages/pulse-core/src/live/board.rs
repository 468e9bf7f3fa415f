//! Live board state.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use super::recompute::recompute_values;
use super::Generation;
use crate::format::{RowText, RowValues};
use crate::publish::{BaselineBook, Publication, PublishedRow};
use crate::types::{normalize_symbol, QuoteSnapshot};

/// A displayed row and the generations that last touched it.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveRow {
    /// Leaderboard rank, absent for watchlist rows
    pub rank: Option<usize>,
    pub symbol: String,
    pub name: String,
    /// Current values
    pub values: RowValues,
    /// Current formatted values
    pub text: RowText,
    /// Generation of the last applied quote
    pub committed: Option<Generation>,
    /// Generation of the last failed fetch covering this row
    pub failed: Option<Generation>,
    /// When the last quote was applied
    pub updated_at: Option<DateTime<Utc>>,
}

impl LiveRow {
    fn from_published(row: &PublishedRow) -> Self {
        Self {
            rank: row.rank,
            symbol: row.symbol.clone(),
            name: row.name.clone(),
            values: row.values,
            text: row.text.clone(),
            committed: None,
            failed: None,
            updated_at: None,
        }
    }

    /// Whether the latest fetch for this row failed after its last update.
    pub fn is_stale(&self) -> bool {
        match (self.failed, self.committed) {
            (Some(failed), Some(committed)) => failed > committed,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// Feed health shown next to the tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedStatus {
    /// Last time any quote was applied
    pub last_success: Option<DateTime<Utc>>,
    /// Most recent fetch error, cleared once no row is stale
    pub last_error: Option<String>,
}

/// Outcome of applying one quote batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Symbols whose rows were updated
    pub updated: usize,
    /// Quotes dropped because a newer generation was already committed
    pub superseded: usize,
    /// Quotes for symbols not on the board, or with unusable prices
    pub ignored: usize,
}

/// Leaderboard and watchlist rows kept fresh from quotes.
///
/// Membership and order come from the publication and never change.
#[derive(Debug, Clone)]
pub struct LiveBoard {
    book: BaselineBook,
    leaderboard: Vec<LiveRow>,
    watchlist: Vec<LiveRow>,
    next_generation: u64,
    status: FeedStatus,
}

impl LiveBoard {
    /// Create a board from a build publication.
    pub fn from_publication(publication: &Publication) -> Self {
        Self {
            book: publication.baseline_book(),
            leaderboard: publication.leaderboard.iter().map(LiveRow::from_published).collect(),
            watchlist: publication.watchlist.iter().map(LiveRow::from_published).collect(),
            next_generation: 0,
            status: FeedStatus::default(),
        }
    }

    /// Start a refresh tick.
    pub fn begin_tick(&mut self) -> Generation {
        self.next_generation += 1;
        Generation(self.next_generation)
    }

    /// Displayed symbols, each once, leaderboard first.
    pub fn symbols(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows()
            .filter(|row| seen.insert(row.symbol.as_str()))
            .map(|row| row.symbol.clone())
            .collect()
    }

    pub fn leaderboard(&self) -> &[LiveRow] {
        &self.leaderboard
    }

    pub fn watchlist(&self) -> &[LiveRow] {
        &self.watchlist
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    /// First displayed row for a symbol.
    pub fn row(&self, symbol: &str) -> Option<&LiveRow> {
        let symbol = normalize_symbol(symbol);
        self.rows().find(|row| row.symbol == symbol)
    }

    /// Whether any displayed row is stale.
    pub fn is_stale(&self) -> bool {
        self.rows().any(LiveRow::is_stale)
    }

    fn rows(&self) -> impl Iterator<Item = &LiveRow> {
        self.leaderboard.iter().chain(self.watchlist.iter())
    }

    fn rows_mut(&mut self) -> impl Iterator<Item = &mut LiveRow> {
        self.leaderboard.iter_mut().chain(self.watchlist.iter_mut())
    }

    /// Apply a successful quote batch from `generation`.
    pub fn apply_quotes(
        &mut self,
        generation: Generation,
        quotes: &[QuoteSnapshot],
        at: DateTime<Utc>,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();

        for quote in quotes {
            let symbol = normalize_symbol(&quote.symbol);
            if !quote.price.is_finite() || quote.price <= 0.0 {
                tracing::trace!("Ignoring unusable price for {}", symbol);
                report.ignored += 1;
                continue;
            }
            let Some(baselines) = self.book.get(&symbol).copied() else {
                report.ignored += 1;
                continue;
            };

            let values = recompute_values(&baselines, quote);
            let text = RowText::from_values(&values);
            let mut touched = false;
            let mut superseded = false;

            for row in self.rows_mut().filter(|row| row.symbol == symbol) {
                if row.committed.is_some_and(|c| c > generation) {
                    superseded = true;
                    continue;
                }
                row.values = values;
                row.text = text.clone();
                row.committed = Some(generation);
                row.updated_at = Some(at);
                touched = true;
            }

            if touched {
                tracing::trace!("{} {} -> {}", generation, symbol, text.price);
                report.updated += 1;
            } else if superseded {
                tracing::debug!("Dropping {} quote for {}, newer data committed", generation, symbol);
                report.superseded += 1;
            }
        }

        if report.updated > 0 {
            self.status.last_success = Some(at);
            if !self.is_stale() {
                self.status.last_error = None;
            }
        }
        report
    }

    /// Record a failed fetch covering `symbols`. Values are kept.
    pub fn mark_failed(&mut self, generation: Generation, symbols: &[String], error: &str) {
        let symbols: HashSet<String> = symbols.iter().map(|s| normalize_symbol(s)).collect();
        let mut marked = 0;

        for row in self.rows_mut().filter(|row| symbols.contains(&row.symbol)) {
            if row.failed.is_none_or(|f| f < generation) {
                row.failed = Some(generation);
            }
            marked += 1;
        }

        if marked > 0 && self.is_stale() {
            self.status.last_error = Some(error.to_string());
        }
    }
}
