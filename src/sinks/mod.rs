//! Output stages for computed indicator rows.
//!
//! A run writes each ticker's rows to every configured sink, in order. The
//! first sink failure abandons the ticker.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::IndicatorRow;

pub mod console;
pub mod csv_export;
pub mod database;

pub use console::ConsoleSink;
pub use csv_export::CsvExportSink;
pub use database::DatabaseSink;

#[async_trait]
pub trait Sink: Send + Sync {
    /// Short name used in logs and run summaries
    fn name(&self) -> &'static str;

    /// Write all rows for one ticker, returning the number of rows written
    async fn write(&self, ticker: &str, rows: &[IndicatorRow]) -> Result<usize>;
}
