//! Shared health state for the /health endpoint.
//! Updated by the scanner after every cycle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Default)]
pub struct HealthState {
    pub scans_completed: AtomicU64,
    /// Nanosecond timestamp of the last finished scan (0 = none yet).
    pub last_scan_at_ns: AtomicU64,
    /// Qualifying signals found by the last scan.
    pub last_scan_signals: AtomicU64,
    /// Journal rows inserted since process start.
    pub signals_written: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_scan(&self, signals: u64, written: u64) {
        self.scans_completed.fetch_add(1, Ordering::Relaxed);
        self.last_scan_at_ns.store(now_ns(), Ordering::Relaxed);
        self.last_scan_signals.store(signals, Ordering::Relaxed);
        self.signals_written.fetch_add(written, Ordering::Relaxed);
    }

    pub fn scans_completed(&self) -> u64 {
        self.scans_completed.load(Ordering::Relaxed)
    }

    pub fn last_scan_at_ns(&self) -> u64 {
        self.last_scan_at_ns.load(Ordering::Relaxed)
    }

    pub fn last_scan_signals(&self) -> u64 {
        self.last_scan_signals.load(Ordering::Relaxed)
    }

    pub fn signals_written(&self) -> u64 {
        self.signals_written.load(Ordering::Relaxed)
    }
}

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_scan_accumulates_writes() {
        let health = HealthState::new();
        assert_eq!(health.last_scan_at_ns(), 0);

        health.record_scan(3, 3);
        health.record_scan(2, 1);
        assert_eq!(health.scans_completed(), 2);
        assert_eq!(health.last_scan_signals(), 2);
        assert_eq!(health.signals_written(), 4);
        assert!(health.last_scan_at_ns() > 0);
    }
}
