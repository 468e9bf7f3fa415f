//! Pulse - return leaderboard and live watchlist
//!
//! `build` computes day, month and year-to-date returns for a ticker
//! universe and writes the leaderboard, watchlist and publication files.
//! `watch` loads the publication and keeps its rows fresh from live quotes.

mod api;
mod commands;
mod config;
mod events;
mod state;
mod view;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pulse_core::Horizon;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "pulse-live")]
#[command(about = "Return leaderboard, watchlist and live quotes")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $PULSE_CONFIG, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch history, rank and write all artifacts
    Build {
        /// Output directory (overrides [files].out_dir)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Ranking horizon: day, month or ytd (overrides [tracker].rank_horizon)
        #[arg(long)]
        horizon: Option<Horizon>,
    },

    /// Refresh the published rows from live quotes
    Watch {
        /// Publication to load (defaults to <out_dir>/published.json)
        #[arg(short, long)]
        published: Option<PathBuf>,

        /// Stop after the first refresh
        #[arg(long)]
        once: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Pulse");

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Build { out_dir, horizon } => commands::run_build(&config, out_dir, horizon).await,
        Commands::Watch { published, once } => commands::run_watch(&config, published, once).await,
    };

    if let Err(ref e) = result {
        tracing::error!("{:#}", e);
    }
    result
}
