use chrono::SecondsFormat;
use tracing::debug;

use crate::error::Result;
use crate::types::PumpSignal;

/// Appends pump signals to the journal. Signals below `min_score` are dropped
/// before touching the database; a repeat of the same (ticker, dt) is ignored.
pub struct SignalWriter {
    pool: sqlx::SqlitePool,
    min_score: f64,
}

impl SignalWriter {
    pub fn new(pool: sqlx::SqlitePool, min_score: f64) -> Self {
        Self { pool, min_score }
    }

    /// Returns true when a new row was inserted.
    pub async fn persist(&self, s: &PumpSignal) -> Result<bool> {
        if s.pump_score < self.min_score {
            return Ok(false);
        }

        let dt = format_dt(s);
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO pump_signals (
                dt, ticker, volume, volume_avg, volume_ratio,
                oi, oi_prev, oi_change_pct, delta, delta_pct,
                pump_score, is_pump
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&dt)
        .bind(&s.ticker)
        .bind(s.volume)
        .bind(s.volume_avg)
        .bind(s.volume_ratio)
        .bind(s.oi)
        .bind(s.oi_prev)
        .bind(s.oi_change_pct)
        .bind(s.delta)
        .bind(s.delta_pct)
        .bind(s.pump_score)
        .bind(s.is_pump)
        .execute(&self.pool)
        .await?;

        let inserted = result.rows_affected() == 1;
        if !inserted {
            debug!(ticker = %s.ticker, dt = %dt, "[JOURNAL] duplicate signal ignored");
        }
        Ok(inserted)
    }
}

fn format_dt(s: &PumpSignal) -> String {
    s.detected_at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::memory_journal;
    use crate::types::{OpenInterestChange, PositioningDelta, VolumeStats};
    use chrono::{TimeZone, Utc};

    fn signal_with_score(ticker: &str, score: f64) -> PumpSignal {
        PumpSignal::from_components(
            ticker,
            VolumeStats { volume: 500, volume_avg: 200.0, ratio: 2.5 },
            OpenInterestChange { oi: 1100, oi_prev: 1000, change_pct: 10.0 },
            PositioningDelta { delta: 50, delta_pct: 55.56 },
            score,
            score >= 50.0,
            Utc.with_ymd_and_hms(2025, 1, 28, 10, 0, 0).unwrap(),
        )
    }

    async fn row_count(pool: &sqlx::SqlitePool) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pump_signals")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn below_gate_is_not_written() {
        let pool = memory_journal().await;
        let writer = SignalWriter::new(pool.clone(), 30.0);

        assert!(!writer.persist(&signal_with_score("SBER", 29.9)).await.unwrap());
        assert_eq!(row_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn at_gate_is_written_exactly_once() {
        let pool = memory_journal().await;
        let writer = SignalWriter::new(pool.clone(), 30.0);

        assert!(writer.persist(&signal_with_score("SBER", 30.0)).await.unwrap());
        assert_eq!(row_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn same_ticker_and_timestamp_is_deduplicated() {
        let pool = memory_journal().await;
        let writer = SignalWriter::new(pool.clone(), 30.0);
        let s = signal_with_score("SBER", 54.0);

        assert!(writer.persist(&s).await.unwrap());
        assert!(!writer.persist(&s).await.unwrap());
        assert!(writer.persist(&signal_with_score("GAZP", 54.0)).await.unwrap());
        assert_eq!(row_count(&pool).await, 2);
    }

    #[tokio::test]
    async fn stored_row_matches_signal() {
        let pool = memory_journal().await;
        let writer = SignalWriter::new(pool.clone(), 30.0);
        writer.persist(&signal_with_score("SBER", 54.0)).await.unwrap();

        let row = sqlx::query_as::<_, crate::db::PumpSignalRow>("SELECT * FROM pump_signals")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.ticker, "SBER");
        assert_eq!(row.dt, "2025-01-28T10:00:00.000000Z");
        assert_eq!(row.volume, 500);
        assert_eq!(row.oi_prev, 1000);
        assert_eq!(row.delta_pct, 55.56);
        assert_eq!(row.pump_score, 54.0);
        assert!(row.is_pump);
    }
}
