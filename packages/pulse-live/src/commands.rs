//! Command handlers

use anyhow::{Context, Result};
use chrono::Utc;
use pulse_core::publish::export_build;
use pulse_core::universe::{read_tickers, DEFAULT_ETFS, DEFAULT_STOCKS, DEFAULT_WATCHLIST};
use pulse_core::{build_publication, Horizon, Publication, Universe};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::MarketClient;
use crate::config::AppConfig;
use crate::events::run_live_loop;
use crate::state::AppState;
use crate::view;

/// Read the ticker files named by the config.
pub fn load_universe(config: &AppConfig) -> Result<Universe> {
    let files = &config.files;
    let stocks = read_tickers(&files.stocks_file, DEFAULT_STOCKS)
        .with_context(|| format!("Failed to read {}", files.stocks_file.display()))?;
    let etfs = read_tickers(&files.etfs_file, DEFAULT_ETFS)
        .with_context(|| format!("Failed to read {}", files.etfs_file.display()))?;
    let watchlist = read_tickers(&files.watchlist_file, DEFAULT_WATCHLIST)
        .with_context(|| format!("Failed to read {}", files.watchlist_file.display()))?;

    Ok(Universe::new(stocks, etfs, watchlist))
}

/// `pulse-live build`: fetch history, compute, write every artifact.
pub async fn run_build(
    config: &AppConfig,
    out_dir: Option<PathBuf>,
    horizon: Option<Horizon>,
) -> Result<()> {
    let out_dir = out_dir.unwrap_or_else(|| config.files.out_dir.clone());
    let mut tracker = config.tracker.clone();
    if let Some(horizon) = horizon {
        tracker.rank_horizon = horizon;
    }
    let universe = load_universe(config)?;
    tracing::info!(
        "Building {} scanned symbols, {} watchlist symbols",
        universe.symbols.len(),
        universe.watchlist.len()
    );

    let client = MarketClient::new(&config.provider, config.tracker.quote_batch_size)?;
    tracing::debug!("History from {}, names from {}", client.chart_url(), client.quote_url());

    tracing::info!("Ranking by {}", tracker.rank_horizon);
    let output = build_publication(&tracker, &universe, &client, &client, Utc::now())
        .await
        .context("Build failed")?;
    let paths = export_build(&out_dir, &output)
        .with_context(|| format!("Failed to write artifacts to {}", out_dir.display()))?;

    tracing::info!("Wrote {}", paths.publication.display());
    tracing::info!("Wrote {} and {}", paths.leaderboard_csv.display(), paths.watchlist_csv.display());
    tracing::info!("Wrote {}", paths.snapshot.display());
    Ok(())
}

/// `pulse-live watch`: load the publication and keep it fresh.
pub async fn run_watch(config: &AppConfig, published: Option<PathBuf>, once: bool) -> Result<()> {
    let path = published.unwrap_or_else(|| config.files.publication_path());
    let publication = Publication::load(&path)
        .with_context(|| format!("Failed to load publication {}", path.display()))?;
    tracing::info!(
        "Loaded {} leaderboard and {} watchlist rows built {}",
        publication.leaderboard.len(),
        publication.watchlist.len(),
        publication.generated_at
    );

    let client = MarketClient::new(&config.provider, config.tracker.quote_batch_size)?;
    tracing::debug!("Quotes from {}", client.quote_url());

    let state = AppState::new(&publication, &config.tracker, Utc::now());
    println!("{}", view::render(&state));

    let state = run_live_loop(Arc::new(client), state, &config.tracker, once, |state| {
        println!("{}", view::render(state));
    })
    .await?;

    tracing::info!("Stopped after {} ticks", state.ticks);
    Ok(())
}
