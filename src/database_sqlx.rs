use chrono::NaiveDate;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Row, SqlitePool,
};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::models::{IndicatorRow, StoredRecord};

/// SQLX-based store for ticker price history keyed by (ticker, date)
#[derive(Clone)]
pub struct DatabaseManagerSqlx {
    pool: SqlitePool,
}

impl DatabaseManagerSqlx {
    /// Open (or create) the database and make sure the schema exists
    pub async fn new(database_path: &str) -> Result<Self> {
        Self::connect(database_path, true).await
    }

    /// Open a database file that must already exist
    pub async fn open_existing(database_path: &str) -> Result<Self> {
        Self::connect(database_path, false).await
    }

    async fn connect(database_path: &str, create_if_missing: bool) -> Result<Self> {
        let path = database_path.strip_prefix("sqlite:").unwrap_or(database_path);
        info!("💾 Connecting to database: {}", path);

        // A single long-lived connection; the pipeline never writes concurrently
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(create_if_missing),
            )
            .await
            .map_err(|e| PipelineError::store("connect", e))?;

        let db = Self { pool };
        db.ensure_schema().await?;
        Ok(db)
    }

    /// Create the price table and its uniqueness constraint if missing
    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stocks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT NOT NULL,
                date DATE NOT NULL,
                open REAL,
                high REAL,
                low REAL,
                close REAL,
                volume INTEGER,
                sma20 REAL,
                rsi REAL,
                UNIQUE(ticker, date)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| PipelineError::store("create schema", e))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_stocks_ticker_date ON stocks(ticker, date)")
            .execute(&self.pool)
            .await
            .map_err(|e| PipelineError::store("create schema", e))?;

        debug!("Schema ready");
        Ok(())
    }

    /// Insert or update every row for `ticker` in a single transaction.
    ///
    /// On a (ticker, date) conflict all non-key columns take the new values,
    /// including NULL for indicators that are not yet computable.
    pub async fn upsert_rows(&self, ticker: &str, rows: &[IndicatorRow]) -> Result<usize> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PipelineError::store("begin transaction", e))?;

        for row in rows {
            let record = StoredRecord::from_row(ticker, row);
            sqlx::query(
                r#"
                INSERT INTO stocks (ticker, date, open, high, low, close, volume, sma20, rsi)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(ticker, date) DO UPDATE SET
                    open = excluded.open,
                    high = excluded.high,
                    low = excluded.low,
                    close = excluded.close,
                    volume = excluded.volume,
                    sma20 = excluded.sma20,
                    rsi = excluded.rsi
                "#,
            )
            .bind(&record.ticker)
            .bind(record.date)
            .bind(record.open)
            .bind(record.high)
            .bind(record.low)
            .bind(record.close)
            .bind(record.volume)
            .bind(record.sma20)
            .bind(record.rsi14)
            .execute(&mut *tx)
            .await
            .map_err(|e| PipelineError::store(format!("upsert {} {}", ticker, record.date), e))?;
        }

        tx.commit()
            .await
            .map_err(|e| PipelineError::store("commit", e))?;

        debug!("Upserted {} rows for {}", rows.len(), ticker);
        Ok(rows.len())
    }

    /// All stored records for a ticker, ascending by date
    pub async fn get_records_by_ticker(&self, ticker: &str) -> Result<Vec<StoredRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, ticker, date, open, high, low, close, volume, sma20, rsi
            FROM stocks
            WHERE ticker = ?
            ORDER BY date ASC
            "#,
        )
        .bind(ticker.trim().to_uppercase())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PipelineError::store("select records", e))?;

        Ok(rows
            .into_iter()
            .map(|r| StoredRecord {
                id: Some(r.get::<i64, _>("id")),
                ticker: r.get::<String, _>("ticker"),
                date: r.get::<NaiveDate, _>("date"),
                open: r.get::<Option<f64>, _>("open"),
                high: r.get::<Option<f64>, _>("high"),
                low: r.get::<Option<f64>, _>("low"),
                close: r.get::<Option<f64>, _>("close"),
                volume: r.get::<Option<i64>, _>("volume"),
                sma20: r.get::<Option<f64>, _>("sma20"),
                rsi14: r.get::<Option<f64>, _>("rsi"),
            })
            .collect())
    }

    /// Distinct tickers that have at least one stored record
    pub async fn get_available_tickers(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT DISTINCT ticker FROM stocks ORDER BY ticker")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PipelineError::store("select tickers", e))?;

        Ok(rows.into_iter().map(|r| r.get::<String, _>("ticker")).collect())
    }

    /// Number of stored records, optionally restricted to one ticker
    pub async fn count_records(&self, ticker: Option<&str>) -> Result<i64> {
        let count = match ticker {
            Some(ticker) => sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stocks WHERE ticker = ?")
                .bind(ticker.trim().to_uppercase())
                .fetch_one(&self.pool)
                .await,
            None => sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stocks")
                .fetch_one(&self.pool)
                .await,
        }
        .map_err(|e| PipelineError::store("count records", e))?;

        Ok(count)
    }

    /// Close the pool, waiting for the connection to be released
    pub async fn close(&self) {
        self.pool.close().await;
        info!("💾 Database connection closed");
    }
}
