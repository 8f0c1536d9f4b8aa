mod api;
mod config;
mod db;
mod detector;
mod error;
mod history;
mod report;
mod scorer;
mod types;

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::db::SignalWriter;
use crate::detector::PumpScanner;
use crate::error::Result;
use crate::history::{HistoryStore, SqliteHistory};

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    // stdout carries the scan report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Databases ---
    let history = SqliteHistory::open(&cfg.history_db_path).await?;
    let journal = db::open_journal(&cfg.signals_db_path).await?;

    let health = Arc::new(HealthState::new());
    let latency = Arc::new(LatencyStats::new());
    let scanner = PumpScanner::new(
        history,
        SignalWriter::new(journal.clone(), cfg.thresholds.min_log_score),
        cfg.thresholds,
        Arc::clone(&latency),
        Arc::clone(&health),
    );

    // --- One-shot ---
    let Some(interval_secs) = cfg.scan_interval_secs else {
        if cfg.api_port.is_some() {
            warn!("API_PORT is ignored without SCAN_INTERVAL_SECS");
        }
        scan_once(&scanner, &cfg.tickers).await;
        return Ok(());
    };

    // --- Watch mode ---
    if let Some(port) = cfg.api_port {
        let app = router(ApiState {
            pool: journal.clone(),
            health: Arc::clone(&health),
            latency: Arc::clone(&latency),
        });
        let bind_addr = format!("0.0.0.0:{port}");
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
        info!("HTTP API listening on {bind_addr}");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("HTTP API stopped: {e}");
            }
        });
    }

    info!(
        "[SCAN] watch mode: {} tickers every {interval_secs}s",
        cfg.tickers.len()
    );
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    loop {
        tokio::select! {
            _ = interval.tick() => scan_once(&scanner, &cfg.tickers).await,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping watch mode");
                return Ok(());
            }
        }
    }
}

async fn scan_once<H: HistoryStore>(scanner: &PumpScanner<H>, tickers: &[String]) {
    println!("{}", report::banner(Local::now(), tickers.len(), scanner.thresholds()));
    let scan = scanner.scan(tickers).await;
    println!("{}", report::render(&scan));
}
