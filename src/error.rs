use std::path::PathBuf;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures raised at the pipeline's boundaries.
///
/// An empty provider response is not represented here: it is an ordinary
/// outcome (`TickerOutcome::NoData`), not an error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("market data unavailable for {ticker}: {source}")]
    SourceUnavailable {
        ticker: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to write {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store {operation} failed: {source}")]
    StoreFailure {
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn source_unavailable(ticker: &str, source: impl Into<BoxError>) -> Self {
        PipelineError::SourceUnavailable {
            ticker: ticker.to_string(),
            source: source.into(),
        }
    }

    pub fn store(operation: impl Into<String>, source: sqlx::Error) -> Self {
        PipelineError::StoreFailure {
            operation: operation.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::IoFailure {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
