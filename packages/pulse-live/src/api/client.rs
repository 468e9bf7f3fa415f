//! Yahoo-style market data client

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use futures::{stream, StreamExt};
use pulse_core::provider::{quote_batches, HistoryProvider, NameResolver, QuoteProvider};
use pulse_core::types::normalize_symbol;
use pulse_core::{Observation, QuoteSnapshot};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use super::types::*;
use crate::config::ProviderConfig;

/// HTTP client for the chart and quote endpoints
#[derive(Debug, Clone)]
pub struct MarketClient {
    chart_url: String,
    quote_url: String,
    client: Client,
    concurrency: usize,
    batch_size: usize,
}

impl MarketClient {
    /// Create a client from provider settings
    pub fn new(config: &ProviderConfig, batch_size: usize) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            chart_url: config.chart_url.trim_end_matches('/').to_string(),
            quote_url: config.quote_url.trim_end_matches('/').to_string(),
            client,
            concurrency: config.history_concurrency.max(1),
            batch_size: batch_size.max(1),
        })
    }

    /// Get the chart endpoint base URL
    pub fn chart_url(&self) -> &str {
        &self.chart_url
    }

    /// Get the quote endpoint base URL
    pub fn quote_url(&self) -> &str {
        &self.quote_url
    }

    // ========================================================================
    // Internal HTTP Methods
    // ========================================================================

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, url: String, query: &[(&str, String)]) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Request failed: {} {}",
                response.status(),
                response.text().await.unwrap_or_default()
            ));
        }

        Ok(response.json().await?)
    }

    // ========================================================================
    // Endpoints
    // ========================================================================

    /// Daily closes for one symbol over the last `days` calendar days
    pub async fn chart(&self, symbol: &str, days: u32) -> Result<Vec<Observation>> {
        let period2 = Utc::now().timestamp();
        let period1 = period2 - i64::from(days) * 86_400;

        let response: ChartResponse = self
            .get(
                format!("{}/v8/finance/chart/{}", self.chart_url, symbol),
                &[
                    ("period1", period1.to_string()),
                    ("period2", period2.to_string()),
                    ("interval", "1d".to_string()),
                    ("events", "history".to_string()),
                ],
            )
            .await?;

        if let Some(error) = response.chart.error {
            return Err(anyhow!("Chart error for {}: {}", symbol, error));
        }

        let result = response
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| anyhow!("Empty chart for {}", symbol))?;

        Ok(result.observations())
    }

    /// Quotes for one batch of symbols
    pub async fn quote(&self, symbols: &[String]) -> Result<Vec<QuoteResult>> {
        let response: QuoteResponse = self
            .get(
                format!("{}/v7/finance/quote", self.quote_url),
                &[("symbols", symbols.join(","))],
            )
            .await?;

        if let Some(error) = response.quote_response.error {
            return Err(anyhow!("Quote error: {}", error));
        }

        Ok(response.quote_response.result)
    }
}

fn provider_error(e: anyhow::Error) -> pulse_core::Error {
    pulse_core::Error::Provider(format!("{:#}", e))
}

#[async_trait]
impl HistoryProvider for MarketClient {
    async fn fetch_histories(
        &self,
        symbols: &[String],
        days: u32,
    ) -> pulse_core::Result<HashMap<String, Vec<Observation>>> {
        let results: Vec<(String, Result<Vec<Observation>>)> = stream::iter(symbols.iter().cloned())
            .map(|symbol| async move {
                let result = self.chart(&symbol, days).await;
                (symbol, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut histories = HashMap::new();
        let mut last_error = None;
        for (symbol, result) in results {
            match result {
                Ok(observations) if !observations.is_empty() => {
                    histories.insert(normalize_symbol(&symbol), observations);
                }
                Ok(_) => tracing::warn!("No closes returned for {}", symbol),
                Err(e) => {
                    tracing::warn!("History fetch failed for {}: {:#}", symbol, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if histories.is_empty() => Err(provider_error(e)),
            _ => Ok(histories),
        }
    }
}

#[async_trait]
impl NameResolver for MarketClient {
    async fn resolve_names(&self, symbols: &[String]) -> HashMap<String, String> {
        let mut names = HashMap::new();
        for batch in quote_batches(symbols, self.batch_size) {
            match self.quote(&batch).await {
                Ok(results) => {
                    for result in &results {
                        if let Some(name) = result.display_name() {
                            names.insert(normalize_symbol(&result.symbol), name.to_string());
                        }
                    }
                }
                Err(e) => tracing::warn!("Name lookup failed for {} symbols: {:#}", batch.len(), e),
            }
        }
        names
    }
}

#[async_trait]
impl QuoteProvider for MarketClient {
    async fn fetch_quotes(&self, symbols: &[String]) -> pulse_core::Result<Vec<QuoteSnapshot>> {
        let results = self.quote(symbols).await.map_err(provider_error)?;
        Ok(results.iter().filter_map(QuoteResult::to_snapshot).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_urls_trimmed() {
        let config = ProviderConfig {
            chart_url: "https://chart.example.test/".to_string(),
            quote_url: "https://quote.example.test".to_string(),
            ..Default::default()
        };
        let client = MarketClient::new(&config, 0).unwrap();
        assert_eq!(client.chart_url(), "https://chart.example.test");
        assert_eq!(client.quote_url(), "https://quote.example.test");
        assert_eq!(client.batch_size, 1);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_provider_error() {
        let config = ProviderConfig {
            chart_url: "http://127.0.0.1:1".to_string(),
            quote_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
            ..Default::default()
        };
        let client = MarketClient::new(&config, 10).unwrap();

        let history = client.fetch_histories(&["SPY".to_string()], 30).await;
        assert!(matches!(history, Err(pulse_core::Error::Provider(_))));

        let quotes = client.fetch_quotes(&["SPY".to_string()]).await;
        assert!(matches!(quotes, Err(pulse_core::Error::Provider(_))));

        let names = client.resolve_names(&["SPY".to_string()]).await;
        assert!(names.is_empty());
    }
}
