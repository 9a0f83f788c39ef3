use async_trait::async_trait;
use tracing::info;

use super::Sink;
use crate::database_sqlx::DatabaseManagerSqlx;
use crate::error::Result;
use crate::models::IndicatorRow;

/// Upserts rows into the price store keyed by (ticker, date)
pub struct DatabaseSink {
    database: DatabaseManagerSqlx,
}

impl DatabaseSink {
    pub fn new(database: DatabaseManagerSqlx) -> Self {
        Self { database }
    }
}

#[async_trait]
impl Sink for DatabaseSink {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn write(&self, ticker: &str, rows: &[IndicatorRow]) -> Result<usize> {
        let written = self.database.upsert_rows(ticker, rows).await?;
        info!("💾 Upserted {} records for {}", written, ticker);
        Ok(written)
    }
}
