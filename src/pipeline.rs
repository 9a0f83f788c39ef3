//! Sequential fetch → indicators → sinks run over a list of tickers.

use std::fmt;
use tracing::{error, info, warn};

use crate::api::MarketDataProvider;
use crate::error::{PipelineError, Result};
use crate::indicators;
use crate::models::{IndicatorRow, ResolvedRequest};
use crate::resolver;
use crate::sinks::Sink;

/// What happened to one ticker during a run
#[derive(Debug)]
pub enum TickerOutcome {
    /// Rows fetched, computed and written to every sink
    Completed { rows: usize },
    /// The provider had no bars for this ticker and period
    NoData,
    /// Processing was abandoned at the failing step
    Failed(PipelineError),
}

#[derive(Debug)]
pub struct TickerReport {
    pub ticker: String,
    pub outcome: TickerOutcome,
}

impl fmt::Display for TickerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            TickerOutcome::Completed { rows } => write!(f, "✅ {}: {} rows", self.ticker, rows),
            TickerOutcome::NoData => {
                write!(f, "⚪ {}: no data (ticker not found or no trading activity)", self.ticker)
            }
            TickerOutcome::Failed(e) => write!(f, "❌ {}: {}", self.ticker, e),
        }
    }
}

/// Result of a whole run, one report per attempted ticker in input order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<TickerReport>,
}

impl RunSummary {
    pub fn completed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, TickerOutcome::Completed { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, TickerOutcome::Failed(_)))
            .count()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            writeln!(f, "{}", report)?;
        }
        write!(
            f,
            "{} of {} tickers completed, {} failed",
            self.completed(),
            self.reports.len(),
            self.failed()
        )
    }
}

pub struct Pipeline<P: MarketDataProvider> {
    provider: P,
    sinks: Vec<Box<dyn Sink>>,
}

impl<P: MarketDataProvider> Pipeline<P> {
    pub fn new(provider: P, sinks: Vec<Box<dyn Sink>>) -> Self {
        Self { provider, sinks }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Process every ticker in order; a failing ticker never stops the run
    pub async fn run(&self, tickers: &[String], period: &str) -> RunSummary {
        let mut summary = RunSummary::default();

        for (index, raw) in tickers.iter().enumerate() {
            let ticker = raw.trim().to_uppercase();
            let outcome = match self.process(raw, period).await {
                Ok(Some(rows)) => TickerOutcome::Completed { rows },
                Ok(None) => {
                    warn!("No data found for {}", ticker);
                    TickerOutcome::NoData
                }
                Err(e) => {
                    error!("❌ {}/{}: {} failed - {}", index + 1, tickers.len(), ticker, e);
                    TickerOutcome::Failed(e)
                }
            };
            summary.reports.push(TickerReport { ticker, outcome });
        }

        info!(
            "✅ Run completed: {} of {} tickers ({} failed)",
            summary.completed(),
            tickers.len(),
            summary.failed()
        );
        summary
    }

    /// Fetch, compute and sink one ticker; `None` means the provider had no data
    pub async fn process(&self, raw_ticker: &str, raw_period: &str) -> Result<Option<usize>> {
        let request = resolver::resolve(raw_ticker, raw_period)?;
        let Some(rows) = self.fetch_rows(&request).await? else {
            return Ok(None);
        };

        self.write_rows(&request.ticker, &rows).await?;
        Ok(Some(rows.len()))
    }

    /// Hand rows to every sink in order, stopping at the first failure
    pub async fn write_rows(&self, ticker: &str, rows: &[IndicatorRow]) -> Result<()> {
        for sink in &self.sinks {
            if let Err(e) = sink.write(ticker, rows).await {
                warn!("{} sink rejected {} rows for {}", sink.name(), rows.len(), ticker);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Fetch and compute indicator rows without writing them anywhere
    pub async fn fetch_rows(&self, request: &ResolvedRequest) -> Result<Option<Vec<IndicatorRow>>> {
        info!("📈 Fetching {} of data for {}", request.period, request.ticker);

        let series = self.provider.fetch(&request.ticker, &request.period).await?;
        if series.is_empty() {
            return Ok(None);
        }

        info!("Successfully fetched {} data points for {}", series.len(), request.ticker);
        Ok(Some(indicators::apply(&series)))
    }
}
