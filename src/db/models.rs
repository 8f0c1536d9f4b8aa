use serde::Serialize;

/// Row type for the `pump_signals` journal table (migrations/signals).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PumpSignalRow {
    pub id: i64,
    /// RFC 3339 UTC detection time.
    pub dt: String,
    pub ticker: String,
    pub volume: i64,
    pub volume_avg: f64,
    pub volume_ratio: f64,
    pub oi: i64,
    pub oi_prev: i64,
    pub oi_change_pct: f64,
    pub delta: i64,
    pub delta_pct: f64,
    pub pump_score: f64,
    pub is_pump: bool,
}
