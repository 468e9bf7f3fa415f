//! Application configuration
//!
//! Loaded from TOML. Every section and field is optional; anything missing
//! takes its default.

use anyhow::{Context, Result};
use pulse_core::TrackerConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "PULSE_CONFIG";

/// Full application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Computation settings
    pub tracker: TrackerConfig,
    /// Input and output locations
    pub files: FilesConfig,
    /// Market data endpoints
    pub provider: ProviderConfig,
}

/// Ticker files and output directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub stocks_file: PathBuf,
    pub etfs_file: PathBuf,
    pub watchlist_file: PathBuf,
    /// Where build artifacts are written
    pub out_dir: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            stocks_file: PathBuf::from("data/tickers_stocks.txt"),
            etfs_file: PathBuf::from("data/tickers_etfs.txt"),
            watchlist_file: PathBuf::from("data/watchlist.txt"),
            out_dir: PathBuf::from("docs"),
        }
    }
}

impl FilesConfig {
    /// Path of the publication the watcher reads.
    pub fn publication_path(&self) -> PathBuf {
        self.out_dir.join(pulse_core::publish::PUBLICATION_FILE)
    }
}

/// Market data provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the daily chart endpoint
    pub chart_url: String,
    /// Base URL of the quote endpoint
    pub quote_url: String,
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Concurrent history requests during a build
    pub history_concurrency: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            chart_url: "https://query1.finance.yahoo.com".to_string(),
            quote_url: "https://query2.finance.yahoo.com".to_string(),
            user_agent: format!("Mozilla/5.0 (compatible; pulse/{})", env!("CARGO_PKG_VERSION")),
            timeout_secs: 15,
            history_concurrency: 8,
        }
    }
}

impl AppConfig {
    /// Default config location: `$PULSE_CONFIG`, then the user config dir.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }

        directories::ProjectDirs::from("", "", "pulse")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("pulse.toml"))
    }

    /// Load from `path`, or the default location when none is given.
    /// A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        let config = Self::load_from_path(&path)?;
        config.tracker.validate()?;
        Ok(config)
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::Horizon;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();

        assert_eq!(config.tracker.top_n, 10);
        assert_eq!(config.files.out_dir, PathBuf::from("docs"));
        assert_eq!(config.provider.history_concurrency, 8);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[tracker]
rank_horizon = "ytd"
top_n = 5
index_symbols = ["^GSPC"]

[files]
out_dir = "site"
"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.tracker.rank_horizon, Horizon::Ytd);
        assert_eq!(config.tracker.top_n, 5);
        assert_eq!(config.tracker.month_lookback, 21);
        assert_eq!(config.tracker.index_symbols, vec!["^GSPC".to_string()]);
        assert_eq!(config.files.publication_path(), PathBuf::from("site/published.json"));
        assert_eq!(config.files.stocks_file, PathBuf::from("data/tickers_stocks.txt"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[tracker]\ntop_n = 0\n").unwrap();

        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[tracker\n").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config"));
    }
}
