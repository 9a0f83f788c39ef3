use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::error::{PipelineError, Result};

/// Column names of an indicator row, in export order
pub const INDICATOR_COLUMNS: [&str; 8] = [
    "date", "open", "high", "low", "close", "volume", "sma20", "rsi14",
];

/// One daily OHLCV bar as reported by the market-data provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Bars for a single ticker, ascending by date
pub type Series = Vec<PriceBar>;

/// A price bar with its derived indicator values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    #[serde(flatten)]
    pub bar: PriceBar,
    pub sma20: Option<f64>,
    pub rsi14: Option<f64>,
}

impl IndicatorRow {
    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }
}

/// Persisted shape of an indicator row, keyed by (ticker, date).
///
/// Price columns are nullable in the table, so they stay optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Option<i64>,
    pub ticker: String,
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
    pub sma20: Option<f64>,
    pub rsi14: Option<f64>,
}

impl StoredRecord {
    /// Build the record that an upsert of `row` for `ticker` should leave behind
    pub fn from_row(ticker: &str, row: &IndicatorRow) -> Self {
        let volume = i64::try_from(row.bar.volume).unwrap_or_else(|_| {
            warn!(
                "Volume {} for {} on {} exceeds the INTEGER column, storing {}",
                row.bar.volume,
                ticker,
                row.bar.date,
                i64::MAX
            );
            i64::MAX
        });

        Self {
            id: None,
            ticker: ticker.to_string(),
            date: row.bar.date,
            open: Some(row.bar.open),
            high: Some(row.bar.high),
            low: Some(row.bar.low),
            close: Some(row.bar.close),
            volume: Some(volume),
            sma20: row.sma20,
            rsi14: row.rsi14,
        }
    }
}

/// Normalized fetch request produced by the ticker resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub ticker: String,
    pub period: String,
}

/// Metadata about a fetched series, shown by the console sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub ticker: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub data_points: usize,
    pub columns: Vec<String>,
}

impl SeriesSummary {
    pub fn from_rows(ticker: &str, rows: &[IndicatorRow]) -> Self {
        Self {
            ticker: ticker.to_string(),
            start_date: rows.iter().map(IndicatorRow::date).min(),
            end_date: rows.iter().map(IndicatorRow::date).max(),
            data_points: rows.len(),
            columns: INDICATOR_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let date_or_dash = |d: Option<NaiveDate>| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string())
        };

        writeln!(f, "Ticker: {}", self.ticker)?;
        writeln!(f, "Start Date: {}", date_or_dash(self.start_date))?;
        writeln!(f, "End Date: {}", date_or_dash(self.end_date))?;
        writeln!(f, "Data Points: {}", self.data_points)?;
        write!(f, "Columns: {}", self.columns.join(", "))
    }
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub market_data_base_url: String,
    pub http_timeout_secs: u64,
    pub export_dir: PathBuf,
    pub default_period: String,
    pub default_tickers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "stocks.db".to_string(),
            market_data_base_url: "https://query1.finance.yahoo.com".to_string(),
            http_timeout_secs: 30,
            export_dir: PathBuf::from("data/raw"),
            default_period: "1mo".to_string(),
            default_tickers: vec!["AAPL".to_string(), "MSFT".to_string(), "GOOGL".to_string()],
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let http_timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                PipelineError::Config(format!("HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw))
            })?,
            None => defaults.http_timeout_secs,
        };

        let default_tickers = match lookup("DEFAULT_TICKERS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.default_tickers,
        };

        Ok(Config {
            database_path: lookup("DATABASE_PATH").unwrap_or(defaults.database_path),
            market_data_base_url: lookup("MARKET_DATA_BASE_URL")
                .unwrap_or(defaults.market_data_base_url),
            http_timeout_secs,
            export_dir: lookup("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            default_period: lookup("DEFAULT_PERIOD").unwrap_or(defaults.default_period),
            default_tickers,
        })
    }
}
