use std::str::FromStr;

use crate::error::{AppError, Result};

/// Default scan universe: MOEX TQBR blue chips and second tier.
pub const DEFAULT_TICKERS: &[&str] = &[
    "AFKS", "AFLT", "ALRS", "BELU", "BSPB", "CBOM", "CHMF", "CNRU", "FEES", "GAZP",
    "GMKN", "HEAD", "HYDR", "IRAO", "LEAS", "LKOH", "MAGN", "MGNT", "MOEX", "MTLR",
    "MTSS", "NLMK", "NVTK", "OZON", "PHOR", "PIKK", "PLZL", "POLY", "POSI", "RNFT",
    "ROSN", "RTKM", "RUAL", "SBER", "SBERP", "SFIN", "SGZH", "SIBN", "SMLT", "SNGS",
    "SNGSP", "SPBE", "SVAV", "SVCB", "T", "TATN", "TATNP", "TRNFP", "VKCO", "VTBR",
    "X5", "YDEX",
];

/// Number of most recent price rows averaged for the volume baseline.
pub const VOLUME_AVG_WINDOW: u32 = 20;

/// Per-component ceilings of the composite score. They sum to 100.
pub mod score_caps {
    pub const VOLUME: f64 = 33.0;
    pub const OPEN_INTEREST: f64 = 33.0;
    pub const DELTA: f64 = 34.0;
}

/// Gating thresholds for the pump score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Volume ratio (current / 20-sample average) at which the volume component activates.
    pub volume_spike: f64,
    /// Day-over-day open interest growth, percent.
    pub oi_spike: f64,
    /// Long/short imbalance, percent of total positions.
    pub delta_strong: f64,
    /// Signals scoring below this are neither reported nor persisted.
    pub min_log_score: f64,
    /// Score at which a signal is classified as a pump.
    pub pump_score: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            volume_spike: 2.0,
            oi_spike: 10.0,
            delta_strong: 20.0,
            min_log_score: 30.0,
            pump_score: 50.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// Market history database, opened read-only (HISTORY_DB_PATH)
    pub history_db_path: String,
    /// Pump signal journal, created and migrated on startup (SIGNALS_DB_PATH)
    pub signals_db_path: String,
    /// Tickers scanned in order (TICKERS, comma-separated)
    pub tickers: Vec<String>,
    pub thresholds: Thresholds,
    /// Repeat the scan every N seconds instead of exiting (SCAN_INTERVAL_SECS)
    pub scan_interval_secs: Option<u64>,
    /// Serve the JSON API in watch mode (API_PORT)
    pub api_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Thresholds::default();

        let tickers: Vec<String> = match lookup("TICKERS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
        };
        if tickers.is_empty() {
            return Err(AppError::Config("TICKERS must name at least one ticker".to_string()));
        }

        let thresholds = Thresholds {
            volume_spike: parse_or(&lookup, "VOLUME_SPIKE", defaults.volume_spike)?,
            oi_spike: parse_or(&lookup, "OI_SPIKE", defaults.oi_spike)?,
            delta_strong: parse_or(&lookup, "DELTA_STRONG", defaults.delta_strong)?,
            min_log_score: parse_or(&lookup, "MIN_LOG_SCORE", defaults.min_log_score)?,
            pump_score: parse_or(&lookup, "PUMP_SCORE", defaults.pump_score)?,
        };

        let scan_interval_secs = parse_opt::<u64, _>(&lookup, "SCAN_INTERVAL_SECS")?;
        if scan_interval_secs == Some(0) {
            return Err(AppError::Config("SCAN_INTERVAL_SECS must be greater than zero".to_string()));
        }

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            history_db_path: lookup("HISTORY_DB_PATH").unwrap_or_else(|| "history.db".to_string()),
            signals_db_path: lookup("SIGNALS_DB_PATH").unwrap_or_else(|| "knowledge.db".to_string()),
            tickers,
            thresholds,
            scan_interval_secs,
            api_port: parse_opt::<u16, _>(&lookup, "API_PORT")?,
        })
    }
}

fn parse_opt<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{key} has an invalid value: {raw:?}"))),
        _ => Ok(None),
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}
