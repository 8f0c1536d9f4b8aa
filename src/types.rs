use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// History rows
// ---------------------------------------------------------------------------

/// One daily bar from `prices`. Only the volume feeds the pump score.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct PriceRecord {
    pub ticker: String,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    pub volume: i64,
}

/// Open interest for one futures series. `ticker` is the full contract code
/// (e.g. `SBERH5`), matched against the base symbol by prefix.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct OpenInterestRecord {
    pub ticker: String,
    pub date: String,
    pub oi: i64,
    /// Day-over-day change. NULL or 0 means no change was recorded.
    pub oi_change: Option<i64>,
}

/// Long/short holder counts for one futures series.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct PositioningRecord {
    pub ticker: String,
    pub date: String,
    pub pos_long: i64,
    pub pos_short: i64,
}

// ---------------------------------------------------------------------------
// Derived signal components
// ---------------------------------------------------------------------------

/// Output of the volume ratio calculator. `Default` is the zero-history sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VolumeStats {
    pub volume: i64,
    pub volume_avg: f64,
    pub ratio: f64,
}

/// Output of the open interest calculator. `Default` is the no-record sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OpenInterestChange {
    pub oi: i64,
    pub oi_prev: i64,
    pub change_pct: f64,
}

/// Output of the positioning calculator. `Default` is the no-record sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PositioningDelta {
    pub delta: i64,
    pub delta_pct: f64,
}

// ---------------------------------------------------------------------------
// Pump signal
// ---------------------------------------------------------------------------

/// Scan result for one ticker. Never mutated once built; the journal only appends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PumpSignal {
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
    pub detected_at: DateTime<Utc>,
}

impl PumpSignal {
    pub fn from_components(
        ticker: &str,
        volume: VolumeStats,
        oi: OpenInterestChange,
        positioning: PositioningDelta,
        pump_score: f64,
        is_pump: bool,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ticker: ticker.to_string(),
            volume: volume.volume,
            volume_avg: volume.volume_avg,
            volume_ratio: volume.ratio,
            oi: oi.oi,
            oi_prev: oi.oi_prev,
            oi_change_pct: oi.change_pct,
            delta: positioning.delta,
            delta_pct: positioning.delta_pct,
            pump_score,
            is_pump,
            detected_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Scan report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Tickers processed, qualifying or not.
    pub scanned: usize,
    /// Signals at or above the logging threshold, in scan order.
    pub signals: Vec<PumpSignal>,
    /// Journal rows actually inserted during this scan.
    pub persisted: usize,
}

impl ScanReport {
    /// Highest-scoring signal. On ties the earliest one in scan order wins.
    pub fn top(&self) -> Option<&PumpSignal> {
        self.signals.iter().fold(None, |best: Option<&PumpSignal>, s| match best {
            Some(b) if b.pump_score >= s.pump_score => Some(b),
            _ => Some(s),
        })
    }

    pub fn pump_count(&self) -> usize {
        self.signals.iter().filter(|s| s.is_pump).count()
    }
}
