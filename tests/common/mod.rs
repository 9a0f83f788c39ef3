//! Common test utilities and helpers

pub mod database;

pub use database::init_fresh_test_database;

/// Test data utilities
pub mod test_data {
    use chrono::{Duration, NaiveDate};
    use tick_stocks::models::{IndicatorRow, PriceBar};

    /// Create a test bar
    pub fn create_test_bar(date: NaiveDate, close: f64) -> PriceBar {
        PriceBar {
            date,
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000_000,
        }
    }

    /// Create `len` consecutive daily bars with a wavy close
    pub fn create_test_series(len: usize) -> Vec<PriceBar> {
        create_test_series_from(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), len)
    }

    pub fn create_test_series_from(start: NaiveDate, len: usize) -> Vec<PriceBar> {
        (0..len)
            .map(|i| {
                let close = 150.0 + (i as f64) * 0.75 + if i % 4 == 0 { -3.0 } else { 1.25 };
                create_test_bar(start + Duration::days(i as i64), close)
            })
            .collect()
    }

    /// Wrap bars as rows with no indicator values
    pub fn create_test_rows(bars: &[PriceBar]) -> Vec<IndicatorRow> {
        bars.iter()
            .map(|bar| IndicatorRow { bar: bar.clone(), sma20: None, rsi14: None })
            .collect()
    }
}

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;
    use tracing::info;

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            // Another test harness may already own the global subscriber
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("tick_stocks=debug,main=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }

    /// Log test step
    pub fn log_test_step(step: &str) {
        info!("🧪 Test Step: {}", step);
    }
}
