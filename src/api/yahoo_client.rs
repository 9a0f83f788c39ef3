use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::MarketDataProvider;
use crate::error::{PipelineError, Result};
use crate::models::{Config, PriceBar, Series};

/// Range tokens accepted by the chart endpoint
pub const VALID_PERIODS: [&str; 11] = [
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// Yahoo Finance v8 chart response
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Market-data client for the Yahoo Finance chart API
pub struct YahooClient {
    client: Client,
    base_url: Url,
}

impl YahooClient {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent("Mozilla/5.0 (compatible; tick-stocks/0.1)")
            .build()
            .map_err(|e| PipelineError::Config(format!("failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.market_data_base_url).map_err(|e| {
            PipelineError::Config(format!(
                "invalid MARKET_DATA_BASE_URL '{}': {}",
                config.market_data_base_url, e
            ))
        })?;

        Ok(Self { client, base_url })
    }

    /// Build the chart URL for a ticker and range; the ticker is one
    /// percent-encoded path segment
    fn chart_url(&self, ticker: &str, period: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PipelineError::Config(format!("MARKET_DATA_BASE_URL '{}' cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart"])
            .push(ticker);
        url.set_fragment(None);
        url.query_pairs_mut()
            .append_pair("range", period)
            .append_pair("interval", "1d");
        Ok(url)
    }

    /// Convert the column-oriented payload into date-ordered bars
    fn parse_chart(ticker: &str, response: ChartResponse) -> Result<Series> {
        if let Some(error) = response.chart.error {
            if error.code == "Not Found" {
                return Ok(Vec::new());
            }
            let description = error.description.unwrap_or_default();
            return Err(PipelineError::source_unavailable(
                ticker,
                format!("provider error {}: {}", error.code, description),
            ));
        }

        let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(Vec::new());
        };
        let timestamps = data.timestamp.unwrap_or_default();
        let gmtoffset = data.meta.gmtoffset;
        let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let column = |values: &Vec<Option<f64>>| values.get(i).copied().flatten();
            let (Some(open), Some(high), Some(low), Some(close)) = (
                column(&quote.open),
                column(&quote.high),
                column(&quote.low),
                column(&quote.close),
            ) else {
                // Non-trading rows come back as all-null columns
                debug!("Skipping incomplete bar at index {} for {}", i, ticker);
                continue;
            };

            // Bars are dated in the exchange's local calendar
            let date = DateTime::from_timestamp(ts + gmtoffset, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    PipelineError::source_unavailable(ticker, format!("invalid timestamp {}", ts))
                })?;

            bars.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            });
        }

        bars.sort_by_key(|b| b.date);
        let before = bars.len();
        bars.dedup_by_key(|b| b.date);
        if bars.len() != before {
            warn!("Dropped {} duplicate dates in {} response", before - bars.len(), ticker);
        }

        Ok(bars)
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn fetch(&self, ticker: &str, period: &str) -> Result<Series> {
        if !VALID_PERIODS.contains(&period) {
            return Err(PipelineError::InvalidInput(format!(
                "unsupported period '{}', expected one of {}",
                period,
                VALID_PERIODS.join(", ")
            )));
        }

        let url = self.chart_url(ticker, period)?;
        debug!("Making request to: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::source_unavailable(ticker, e))?;

        let status = response.status();
        // Unknown symbols answer 404 with a "Not Found" chart error body
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::source_unavailable(
                ticker,
                format!("API request failed with status {}: {}", status, body),
            ));
        }

        let chart: ChartResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::source_unavailable(ticker, e))?;

        let bars = Self::parse_chart(ticker, chart)?;
        debug!("Retrieved {} price bars for {} ({})", bars.len(), ticker, period);
        Ok(bars)
    }
}
