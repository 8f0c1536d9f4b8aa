//! Read queries over the pump signal journal, used by the HTTP API.

use sqlx::SqlitePool;

use super::models::PumpSignalRow;
use crate::error::Result;

const SELECT_SIGNALS: &str = r#"
    SELECT id, dt, ticker, volume, volume_avg, volume_ratio,
           oi, oi_prev, oi_change_pct, delta, delta_pct,
           pump_score, is_pump
    FROM pump_signals
"#;

/// Newest first, optionally filtered by minimum score.
pub async fn recent_signals(pool: &SqlitePool, min_score: f64, limit: i64) -> Result<Vec<PumpSignalRow>> {
    let sql = format!("{SELECT_SIGNALS} WHERE pump_score >= ? ORDER BY dt DESC, id DESC LIMIT ?");
    let rows = sqlx::query_as::<_, PumpSignalRow>(&sql)
        .bind(min_score)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Highest scores first; newer rows win ties.
pub async fn top_signals(pool: &SqlitePool, limit: i64) -> Result<Vec<PumpSignalRow>> {
    let sql = format!("{SELECT_SIGNALS} ORDER BY pump_score DESC, dt DESC LIMIT ?");
    let rows = sqlx::query_as::<_, PumpSignalRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn signals_for_ticker(pool: &SqlitePool, ticker: &str, limit: i64) -> Result<Vec<PumpSignalRow>> {
    let sql = format!("{SELECT_SIGNALS} WHERE ticker = ? ORDER BY dt DESC, id DESC LIMIT ?");
    let rows = sqlx::query_as::<_, PumpSignalRow>(&sql)
        .bind(ticker)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn count_signals(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pump_signals")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
