//! Console rendering of a scan. Everything returns `String` so `main` only prints.

use chrono::{DateTime, Local};

use crate::config::Thresholds;
use crate::types::{PumpSignal, ScanReport};

const RULE_WIDTH: usize = 50;

pub fn banner(started_at: DateTime<Local>, ticker_count: usize, t: &Thresholds) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    format!(
        "{heavy}\nPUMP DETECTOR: {}\n{heavy}\nTickers: {ticker_count}\nThresholds: vol>{}x, oi>{}%, delta>{}%\n{light}",
        started_at.format("%H:%M:%S"),
        t.volume_spike,
        t.oi_spike,
        t.delta_strong,
    )
}

/// Two lines per signal: marker with score, then the three inputs.
pub fn signal_lines(s: &PumpSignal) -> String {
    let marker = if s.is_pump { "🚀" } else { "⚡" };
    format!(
        "{marker} {}: score={:.1}\n   vol={}x oi={}% delta={}%",
        s.ticker, s.pump_score, s.volume_ratio, s.oi_change_pct, s.delta_pct,
    )
}

pub fn summary(report: &ScanReport) -> String {
    let light = "-".repeat(RULE_WIDTH);
    match report.top() {
        Some(top) => format!(
            "{light}\nSignals found: {}\nTOP: {} score={:.1}",
            report.signals.len(),
            top.ticker,
            top.pump_score,
        ),
        None => format!("{light}\nNo pumps detected"),
    }
}

pub fn render(report: &ScanReport) -> String {
    let mut out: Vec<String> = report.signals.iter().map(signal_lines).collect();
    out.push(summary(report));
    out.join("\n")
}
