use async_trait::async_trait;

use crate::error::Result;
use crate::models::Series;

pub mod yahoo_client;
pub use yahoo_client::YahooClient;

/// Source of daily price history.
///
/// Implementations make one outbound request per call and never retry. An
/// unknown ticker or an inactive period yields an empty series, not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch(&self, ticker: &str, period: &str) -> Result<Series>;
}
