use async_trait::async_trait;

use super::Sink;
use crate::error::Result;
use crate::models::{IndicatorRow, SeriesSummary};

/// Prints a short summary of each ticker's series to stdout
#[derive(Debug, Default)]
pub struct ConsoleSink;

#[async_trait]
impl Sink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn write(&self, ticker: &str, rows: &[IndicatorRow]) -> Result<usize> {
        let summary = SeriesSummary::from_rows(ticker, rows);
        println!("\n=== Data Summary ===");
        println!("{}", summary);
        Ok(rows.len())
    }
}
