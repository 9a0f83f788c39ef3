use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::Sink;
use crate::error::{PipelineError, Result};
use crate::models::IndicatorRow;

/// One exported line; field order is the header order
#[derive(Debug, Serialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
    sma20: Option<f64>,
    rsi14: Option<f64>,
}

impl From<&IndicatorRow> for CsvRow {
    fn from(row: &IndicatorRow) -> Self {
        Self {
            date: row.bar.date,
            open: row.bar.open,
            high: row.bar.high,
            low: row.bar.low,
            close: row.bar.close,
            volume: row.bar.volume,
            sma20: row.sma20,
            rsi14: row.rsi14,
        }
    }
}

/// Where exported files go
#[derive(Debug, Clone)]
enum Target {
    /// `<dir>/<TICKER>_stock_data.csv`
    Directory(PathBuf),
    File(PathBuf),
}

/// Writes each ticker's rows to a delimited file, one row per bar
#[derive(Debug, Clone)]
pub struct CsvExportSink {
    target: Target,
}

impl CsvExportSink {
    /// Export into `dir` using a file name derived from the ticker
    pub fn in_directory(dir: impl Into<PathBuf>) -> Self {
        Self { target: Target::Directory(dir.into()) }
    }

    /// Export to a fixed file path
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self { target: Target::File(path.into()) }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        match &self.target {
            Target::Directory(dir) => dir.join(format!("{}_stock_data.csv", ticker)),
            Target::File(path) => path.clone(),
        }
    }

    fn write_file(path: &Path, rows: &[IndicatorRow]) -> std::io::Result<()> {
        // The directory must already exist
        let mut writer = csv::Writer::from_path(path)?;
        for row in rows {
            writer.serialize(CsvRow::from(row))?;
        }
        writer.flush()
    }
}

#[async_trait]
impl Sink for CsvExportSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn write(&self, ticker: &str, rows: &[IndicatorRow]) -> Result<usize> {
        let path = self.path_for(ticker);
        Self::write_file(&path, rows).map_err(|e| PipelineError::io(&path, e))?;
        info!("📄 Data saved to {}", path.display());
        Ok(rows.len())
    }
}
