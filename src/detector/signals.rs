//! Per-ticker signal calculators. Pure functions over rows already fetched
//! from the history store; `None` means the store had nothing usable for the
//! ticker (no rows, or counts too large to combine without overflow).

use crate::scorer::round_to;
use crate::types::{
    OpenInterestChange, OpenInterestRecord, PositioningDelta, PositioningRecord, PriceRecord,
    VolumeStats,
};

impl VolumeStats {
    /// `history` must be newest-first and already limited to the averaging window.
    pub fn from_history(history: &[PriceRecord]) -> Option<Self> {
        let latest = history.first()?;

        let sum: f64 = history.iter().map(|r| r.volume as f64).sum();
        let mean = sum / history.len() as f64;
        // all-zero volume history
        let volume_avg = if mean == 0.0 { 1.0 } else { mean };

        Some(Self {
            volume: latest.volume,
            volume_avg,
            ratio: round_to(latest.volume as f64 / volume_avg, 2),
        })
    }
}

impl OpenInterestChange {
    pub fn from_record(record: &OpenInterestRecord) -> Option<Self> {
        let oi = record.oi;
        let change = record.oi_change.unwrap_or(0);
        let oi_prev = if change != 0 { oi.checked_sub(change)? } else { oi };

        let change_pct = if oi_prev != 0 {
            round_to(change as f64 / oi_prev as f64 * 100.0, 2)
        } else {
            0.0
        };

        Some(Self {
            oi,
            oi_prev,
            change_pct,
        })
    }
}

impl PositioningDelta {
    pub fn from_record(record: &PositioningRecord) -> Option<Self> {
        let delta = record.pos_long.checked_sub(record.pos_short)?;
        let total = record.pos_long.checked_add(record.pos_short)?;

        let delta_pct = if total != 0 {
            round_to(delta as f64 / total as f64 * 100.0, 2)
        } else {
            0.0
        };

        Some(Self { delta, delta_pct })
    }
}
