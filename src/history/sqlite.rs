use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use super::HistoryStore;
use crate::error::Result;
use crate::types::{OpenInterestRecord, PositioningRecord, PriceRecord};

/// History store backed by the scraper-maintained SQLite file.
#[derive(Clone)]
pub struct SqliteHistory {
    pool: SqlitePool,
}

impl SqliteHistory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens an existing history database read-only. A missing file is an error.
    pub async fn open(path: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{path}"))?
            .read_only(true)
            .create_if_missing(false);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(opts)
            .await?;
        info!("[HISTORY] opened {path} (read-only)");
        Ok(Self::new(pool))
    }
}

// Contract codes extend the base symbol (SBER -> SBERH5), so OI and positioning
// rows are matched with an exact starts-with test. `substr`/`length` keep `%` and
// `_` literal, which LIKE would treat as wildcards.

impl HistoryStore for SqliteHistory {
    async fn recent_prices(&self, ticker: &str, limit: u32) -> Result<Vec<PriceRecord>> {
        let rows = sqlx::query_as::<_, PriceRecord>(
            r#"
            SELECT ticker, date, volume
            FROM prices
            WHERE ticker = ?1
            ORDER BY date DESC
            LIMIT ?2
            "#,
        )
        .bind(ticker)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn latest_open_interest(&self, ticker: &str) -> Result<Option<OpenInterestRecord>> {
        let row = sqlx::query_as::<_, OpenInterestRecord>(
            r#"
            SELECT ticker, date, oi, oi_change
            FROM futures_oi
            WHERE substr(ticker, 1, length(?1)) = ?1
            ORDER BY date DESC, ticker ASC
            LIMIT 1
            "#,
        )
        .bind(ticker)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn latest_positioning(&self, ticker: &str) -> Result<Option<PositioningRecord>> {
        let row = sqlx::query_as::<_, PositioningRecord>(
            r#"
            SELECT ticker, date, pos_long, pos_short
            FROM futoi
            WHERE substr(ticker, 1, length(?1)) = ?1
            ORDER BY date DESC, ticker ASC
            LIMIT 1
            "#,
        )
        .bind(ticker)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Single-connection in-memory history database with the schema applied.
    pub(crate) async fn memory_history() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations/history").run(&pool).await.unwrap();
        pool
    }

    pub(crate) async fn insert_price(pool: &SqlitePool, ticker: &str, date: &str, volume: i64) {
        sqlx::query("INSERT INTO prices (ticker, date, close, volume) VALUES (?, ?, 100.0, ?)")
            .bind(ticker)
            .bind(date)
            .bind(volume)
            .execute(pool)
            .await
            .unwrap();
    }

    pub(crate) async fn insert_oi(pool: &SqlitePool, code: &str, date: &str, oi: i64, change: Option<i64>) {
        sqlx::query("INSERT INTO futures_oi (ticker, date, oi, oi_change) VALUES (?, ?, ?, ?)")
            .bind(code)
            .bind(date)
            .bind(oi)
            .bind(change)
            .execute(pool)
            .await
            .unwrap();
    }

    pub(crate) async fn insert_positioning(pool: &SqlitePool, code: &str, date: &str, longs: i64, shorts: i64) {
        sqlx::query("INSERT INTO futoi (ticker, date, pos_long, pos_short) VALUES (?, ?, ?, ?)")
            .bind(code)
            .bind(date)
            .bind(longs)
            .bind(shorts)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn recent_prices_newest_first_and_limited() {
        let pool = memory_history().await;
        for day in 1..=25 {
            insert_price(&pool, "SBER", &format!("2025-01-{day:02}"), day * 10).await;
        }
        insert_price(&pool, "SBERP", "2025-01-26", 999).await;

        let history = SqliteHistory::new(pool);
        let rows = history.recent_prices("SBER", 20).await.unwrap();
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].date, "2025-01-25");
        assert_eq!(rows[0].volume, 250);
        assert_eq!(rows[19].date, "2025-01-06");
        assert!(rows.iter().all(|r| r.ticker == "SBER"));
    }

    #[tokio::test]
    async fn unknown_ticker_has_no_rows() {
        let history = SqliteHistory::new(memory_history().await);
        assert!(history.recent_prices("NOPE", 20).await.unwrap().is_empty());
        assert!(history.latest_open_interest("NOPE").await.unwrap().is_none());
        assert!(history.latest_positioning("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn open_interest_matches_contract_prefix() {
        let pool = memory_history().await;
        insert_oi(&pool, "SBERH5", "2025-01-27", 900, Some(10)).await;
        insert_oi(&pool, "SBERM5", "2025-01-28", 1100, Some(100)).await;
        insert_oi(&pool, "GAZPH5", "2025-01-29", 5000, None).await;

        let history = SqliteHistory::new(pool);
        let row = history.latest_open_interest("SBER").await.unwrap().unwrap();
        assert_eq!(row.ticker, "SBERM5");
        assert_eq!(row.oi, 1100);
        assert_eq!(row.oi_change, Some(100));

        let row = history.latest_open_interest("GAZP").await.unwrap().unwrap();
        assert_eq!(row.oi_change, None);
    }

    #[tokio::test]
    async fn prefix_is_not_a_like_pattern() {
        let pool = memory_history().await;
        insert_positioning(&pool, "SBERH5", "2025-01-28", 70, 20).await;

        let history = SqliteHistory::new(pool);
        assert!(history.latest_positioning("SB%").await.unwrap().is_none());
        assert!(history.latest_positioning("S_ER").await.unwrap().is_none());
        assert!(history.latest_positioning("BER").await.unwrap().is_none());

        let row = history.latest_positioning("SBER").await.unwrap().unwrap();
        assert_eq!((row.pos_long, row.pos_short), (70, 20));
    }

    #[tokio::test]
    async fn missing_file_fails_to_open() {
        let dir = std::env::temp_dir().join("pump-scanner-missing-history");
        let path = dir.join("does-not-exist.db");
        assert!(SqliteHistory::open(path.to_str().unwrap()).await.is_err());
    }
}
