use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::db::{reader, PumpSignalRow};
use crate::error::AppError;

#[derive(Clone)]
pub struct ApiState {
    pub pool: sqlx::SqlitePool,
    pub health: Arc<HealthState>,
    pub latency: Arc<LatencyStats>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/signals/recent", get(get_recent_signals))
        .route("/signals/top", get(get_top_signals))
        .route("/signals/:ticker", get(get_ticker_signals))
        .route("/stats/latency", get(get_stats_latency))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct RecentSignalsQuery {
    pub min_score: Option<f64>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub scans_completed: u64,
    pub last_scan_at_ns: Option<u64>,
    pub last_scan_signals: u64,
    pub signals_written: u64,
    pub journal_rows: i64,
}

#[derive(Serialize)]
pub struct LatencyResponse {
    pub samples: u64,
    pub p50_us: Option<u64>,
    pub p95_us: Option<u64>,
    pub p99_us: Option<u64>,
    pub max_us: Option<u64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_health(State(state): State<ApiState>) -> Result<Json<HealthResponse>, AppError> {
    let journal_rows = reader::count_signals(&state.pool).await?;
    let last = state.health.last_scan_at_ns();

    Ok(Json(HealthResponse {
        status: "ok",
        scans_completed: state.health.scans_completed(),
        last_scan_at_ns: (last > 0).then_some(last),
        last_scan_signals: state.health.last_scan_signals(),
        signals_written: state.health.signals_written(),
        journal_rows,
    }))
}

async fn get_recent_signals(
    State(state): State<ApiState>,
    Query(params): Query<RecentSignalsQuery>,
) -> Result<Json<Vec<PumpSignalRow>>, AppError> {
    let min_score = params.min_score.unwrap_or(0.0);
    let limit = clamp_limit(params.limit, 100);
    let rows = reader::recent_signals(&state.pool, min_score, limit).await?;
    Ok(Json(rows))
}

async fn get_top_signals(
    State(state): State<ApiState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<PumpSignalRow>>, AppError> {
    let rows = reader::top_signals(&state.pool, clamp_limit(params.limit, 10)).await?;
    Ok(Json(rows))
}

async fn get_ticker_signals(
    State(state): State<ApiState>,
    Path(ticker): Path<String>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<PumpSignalRow>>, AppError> {
    let ticker = ticker.to_uppercase();
    let rows = reader::signals_for_ticker(&state.pool, &ticker, clamp_limit(params.limit, 100)).await?;
    Ok(Json(rows))
}

async fn get_stats_latency(State(state): State<ApiState>) -> Json<LatencyResponse> {
    let samples = state.latency.len();
    let resp = match state.latency.percentiles() {
        Some((p50, p95, p99, max)) => LatencyResponse {
            samples,
            p50_us: Some(p50),
            p95_us: Some(p95),
            p99_us: Some(p99),
            max_us: Some(max),
        },
        None => LatencyResponse {
            samples,
            p50_us: None,
            p95_us: None,
            p99_us: None,
            max_us: None,
        },
    };
    Json(resp)
}

/// Caps client-supplied limits at 1000 rows.
fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, 1000)
}
