use crate::error::{PipelineError, Result};
use crate::models::ResolvedRequest;

/// Normalize a raw ticker/period pair into a fetch request.
///
/// The ticker is trimmed and uppercased. The period is only trimmed: which
/// period tokens are valid is decided by the market-data provider.
pub fn resolve(raw_ticker: &str, raw_period: &str) -> Result<ResolvedRequest> {
    let ticker = raw_ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(PipelineError::InvalidInput("ticker must not be empty".to_string()));
    }

    Ok(ResolvedRequest {
        ticker,
        period: raw_period.trim().to_string(),
    })
}
