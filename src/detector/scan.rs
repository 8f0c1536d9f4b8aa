use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::config::{Thresholds, VOLUME_AVG_WINDOW};
use crate::db::SignalWriter;
use crate::history::HistoryStore;
use crate::scorer::{compute_score, is_pump};
use crate::types::{OpenInterestChange, PositioningDelta, PumpSignal, ScanReport, VolumeStats};

/// Scores every ticker in the universe, one after another, and journals the
/// interesting ones. A failing read only zeroes that ticker's input.
pub struct PumpScanner<H> {
    history: H,
    writer: SignalWriter,
    thresholds: Thresholds,
    latency: Arc<LatencyStats>,
    health: Arc<HealthState>,
}

impl<H: HistoryStore> PumpScanner<H> {
    pub fn new(
        history: H,
        writer: SignalWriter,
        thresholds: Thresholds,
        latency: Arc<LatencyStats>,
        health: Arc<HealthState>,
    ) -> Self {
        Self {
            history,
            writer,
            thresholds,
            latency,
            health,
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Full signal for one ticker, whatever its score.
    pub async fn detect(&self, ticker: &str) -> PumpSignal {
        let volume = self.volume_stats(ticker).await;
        let oi = self.open_interest(ticker).await;
        let positioning = self.positioning(ticker).await;

        let score = compute_score(volume.ratio, oi.change_pct, positioning.delta_pct, &self.thresholds);
        let pump = is_pump(score, &self.thresholds);

        debug!(
            ticker,
            score,
            volume_ratio = volume.ratio,
            oi_change_pct = oi.change_pct,
            delta_pct = positioning.delta_pct,
            "[SCAN] scored"
        );

        PumpSignal::from_components(ticker, volume, oi, positioning, score, pump, Utc::now())
    }

    /// Scans `tickers` in order. Signals at or above the logging threshold are
    /// returned in that same order and journaled once each.
    pub async fn scan(&self, tickers: &[String]) -> ScanReport {
        let mut report = ScanReport::default();

        for ticker in tickers {
            let started = Instant::now();
            let signal = self.detect(ticker).await;
            self.latency.record(started.elapsed());
            report.scanned += 1;

            if signal.pump_score < self.thresholds.min_log_score {
                continue;
            }

            match self.writer.persist(&signal).await {
                Ok(true) => report.persisted += 1,
                Ok(false) => {}
                Err(e) => error!(ticker = %ticker, "[SCAN] failed to journal signal: {e}"),
            }
            report.signals.push(signal);
        }

        self.health.record_scan(report.signals.len() as u64, report.persisted as u64);
        info!(
            scanned = report.scanned,
            signals = report.signals.len(),
            pumps = report.pump_count(),
            persisted = report.persisted,
            "[SCAN] complete: {} signals from {} tickers",
            report.signals.len(),
            report.scanned,
        );
        report
    }

    async fn volume_stats(&self, ticker: &str) -> VolumeStats {
        match self.history.recent_prices(ticker, VOLUME_AVG_WINDOW).await {
            Ok(rows) => VolumeStats::from_history(&rows).unwrap_or_default(),
            Err(e) => {
                warn!(ticker, "[SCAN] price history unavailable, volume zeroed: {e}");
                VolumeStats::default()
            }
        }
    }

    async fn open_interest(&self, ticker: &str) -> OpenInterestChange {
        match self.history.latest_open_interest(ticker).await {
            Ok(row) => row.as_ref().and_then(OpenInterestChange::from_record).unwrap_or_default(),
            Err(e) => {
                warn!(ticker, "[SCAN] open interest unavailable, zeroed: {e}");
                OpenInterestChange::default()
            }
        }
    }

    async fn positioning(&self, ticker: &str) -> PositioningDelta {
        match self.history.latest_positioning(ticker).await {
            Ok(row) => row.as_ref().and_then(PositioningDelta::from_record).unwrap_or_default(),
            Err(e) => {
                warn!(ticker, "[SCAN] positioning unavailable, delta zeroed: {e}");
                PositioningDelta::default()
            }
        }
    }
}
