//! Refresh loop and event handling
//!
//! Each tick fans out one quote request per batch plus one for the banner.
//! Responses come back over a channel in any order and are applied by
//! `handle_event`, which is the only place state changes.

use anyhow::Result;
use chrono::Utc;
use pulse_core::provider::{quote_batches, QuoteProvider};
use pulse_core::{Generation, QuoteSnapshot, TrackerConfig};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::state::AppState;

/// A fetch result delivered to the loop
#[derive(Debug)]
pub enum LiveEvent {
    /// One quote batch for the tables
    Quotes {
        generation: Generation,
        symbols: Vec<String>,
        result: Result<Vec<QuoteSnapshot>, String>,
    },
    /// Index quotes for the banner
    Banner {
        generation: Generation,
        result: Result<Vec<QuoteSnapshot>, String>,
    },
}

/// Run the refresh loop until interrupted, or after the first tick when
/// `once` is set. `on_commit` is called after every applied event.
/// Fails only on an invalid config.
pub async fn run_live_loop<F>(
    provider: Arc<dyn QuoteProvider>,
    mut state: AppState,
    config: &TrackerConfig,
    once: bool,
    mut on_commit: F,
) -> Result<AppState>
where
    F: FnMut(&AppState),
{
    config.validate()?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ticker = interval(config.refresh_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut pending = 0usize;
    tracing::info!(
        "Refreshing {} symbols every {:?}",
        state.board.symbols().len(),
        config.refresh_interval()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if once && state.ticks > 0 {
                    continue;
                }
                pending += dispatch_tick(&provider, &mut state, config.quote_batch_size, &tx);
                if once && pending == 0 {
                    break;
                }
            }
            Some(event) = rx.recv() => {
                pending = pending.saturating_sub(1);
                handle_event(event, &mut state);
                on_commit(&state);
                if once && pending == 0 {
                    break;
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Interrupted, stopping refresh loop");
                break;
            }
        }
    }

    Ok(state)
}

/// Start a tick: take a generation and spawn one fetch per batch.
/// Returns the number of responses to expect.
fn dispatch_tick(
    provider: &Arc<dyn QuoteProvider>,
    state: &mut AppState,
    batch_size: usize,
    tx: &mpsc::UnboundedSender<LiveEvent>,
) -> usize {
    let generation = state.begin_tick();
    let batches = quote_batches(&state.board.symbols(), batch_size);
    tracing::debug!("Tick {}: {} quote batches", generation, batches.len());

    let mut spawned = 0;
    for symbols in batches {
        let provider = Arc::clone(provider);
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = provider.fetch_quotes(&symbols).await.map_err(|e| e.to_string());
            let _ = tx.send(LiveEvent::Quotes {
                generation,
                symbols,
                result,
            });
        });
        spawned += 1;
    }

    let index_symbols = state.banner.symbols().to_vec();
    if !index_symbols.is_empty() {
        let provider = Arc::clone(provider);
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = provider
                .fetch_quotes(&index_symbols)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(LiveEvent::Banner { generation, result });
        });
        spawned += 1;
    }

    spawned
}

/// Apply a single fetch result
pub fn handle_event(event: LiveEvent, state: &mut AppState) {
    let now = Utc::now();

    match event {
        LiveEvent::Quotes {
            generation,
            symbols,
            result: Ok(quotes),
        } => {
            let report = state.apply_quotes(generation, &quotes, now);
            tracing::debug!(
                "Batch {} ({} symbols): {} updated, {} superseded, {} ignored",
                generation,
                symbols.len(),
                report.updated,
                report.superseded,
                report.ignored
            );
        }

        LiveEvent::Quotes {
            generation,
            symbols,
            result: Err(error),
        } => {
            tracing::warn!("Quote batch {} failed: {}", generation, error);
            state.quotes_failed(generation, &symbols, &error);
        }

        LiveEvent::Banner {
            generation,
            result: Ok(quotes),
        } => {
            if !state.apply_banner(generation, &quotes, now) {
                tracing::debug!("Banner {} superseded", generation);
            }
        }

        LiveEvent::Banner {
            generation,
            result: Err(error),
        } => {
            tracing::warn!("Banner fetch {} failed: {}", generation, error);
            state.banner_failed(generation, now);
        }
    }
}
