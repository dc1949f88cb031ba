//! HTTP read API over a live civicpulse feed session.
//!
//! Serves the session's snapshot views as JSON. The session is internally
//! synchronized (every read is a single-lock capture), so handlers hold no
//! async locks of their own. Unknown sector filters degrade to empty
//! collections with 200, never an error.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use civicpulse_core::activity::format_relative;
use civicpulse_core::session::{FeedSession, FeedSnapshot};
use civicpulse_core::summary::format_inr;
use civicpulse_core::window::TimeBucket;
use civicpulse_core::{AnomalyStatus, DeviceStatus};

/// Shared server state.
struct AppState {
    session: FeedSession,
}

#[derive(Deserialize)]
struct SectorParams {
    /// Sector filter: "all" (default), a sector name, or anything else for
    /// an empty result.
    sector: Option<String>,
}

impl SectorParams {
    fn key(&self) -> &str {
        self.sector.as_deref().unwrap_or("all")
    }
}

#[derive(Serialize)]
struct AnomalyEntry {
    id: String,
    time: String,
    sector: String,
    category: String,
    severity: String,
    status: String,
}

#[derive(Serialize)]
struct AnomaliesResponse {
    anomalies: Vec<AnomalyEntry>,
    total: usize,
    unresolved: usize,
}

#[derive(Serialize)]
struct DeviceEntry {
    id: String,
    name: String,
    sector: String,
    status: String,
    last_update: String,
    data_points: u64,
}

#[derive(Serialize)]
struct DevicesResponse {
    devices: Vec<DeviceEntry>,
    total: usize,
    online: usize,
}

#[derive(Serialize)]
struct ActivityEntry {
    id: String,
    activity: String,
    sector: String,
    user: String,
    time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<String>,
}

#[derive(Serialize)]
struct ActivityResponse {
    activities: Vec<ActivityEntry>,
    total: usize,
}

#[derive(Serialize)]
struct SummaryResponse {
    total_budget: f64,
    allocated_budget: f64,
    allocated_inr: String,
    unallocated: f64,
    utilization_rate: f64,
    efficiency_score: f64,
    transactions: u64,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    session_id: String,
    tick_count: u64,
    devices_online: usize,
    devices_total: usize,
    unresolved_anomalies: usize,
    refreshing: bool,
}

#[derive(Serialize)]
struct RefreshResponse {
    started: bool,
    refreshing: bool,
}

async fn handle_snapshot(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SectorParams>,
) -> Json<FeedSnapshot> {
    Json(state.session.snapshot_filtered(params.key()))
}

async fn handle_window(State(state): State<Arc<AppState>>) -> Json<Vec<TimeBucket>> {
    Json(state.session.snapshot().window)
}

async fn handle_anomalies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SectorParams>,
) -> Json<AnomaliesResponse> {
    let now_ms = state.session.now_ms();
    let anomalies = state.session.anomalies_for(params.key());
    let unresolved = anomalies
        .iter()
        .filter(|a| a.status == AnomalyStatus::Unresolved)
        .count();
    let entries: Vec<AnomalyEntry> = anomalies
        .iter()
        .map(|a| AnomalyEntry {
            id: a.id.clone(),
            time: format_relative(now_ms, a.timestamp_ms),
            sector: a.sector.name().to_string(),
            category: a.category.clone(),
            severity: a.severity.label().to_string(),
            status: a.status.label().to_string(),
        })
        .collect();
    let total = entries.len();
    Json(AnomaliesResponse {
        anomalies: entries,
        total,
        unresolved,
    })
}

async fn handle_devices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SectorParams>,
) -> Json<DevicesResponse> {
    let now_ms = state.session.now_ms();
    let devices = state.session.devices_for(params.key());
    let online = devices
        .iter()
        .filter(|d| d.status == DeviceStatus::Online)
        .count();
    let entries: Vec<DeviceEntry> = devices
        .iter()
        .map(|d| DeviceEntry {
            id: d.id.clone(),
            name: d.name.clone(),
            sector: d.sector.name().to_string(),
            status: d.status.label().to_string(),
            last_update: format_relative(now_ms, d.last_update_ms),
            data_points: d.data_points,
        })
        .collect();
    let total = entries.len();
    Json(DevicesResponse {
        devices: entries,
        total,
        online,
    })
}

async fn handle_activity(State(state): State<Arc<AppState>>) -> Json<ActivityResponse> {
    let now_ms = state.session.now_ms();
    let entries: Vec<ActivityEntry> = state
        .session
        .activities()
        .iter()
        .map(|a| ActivityEntry {
            id: a.id.clone(),
            activity: a.activity.clone(),
            sector: a.sector.name().to_string(),
            user: a.user.clone(),
            time: format_relative(now_ms, a.timestamp_ms),
            amount: a.amount.map(|v| format_inr(v as f64)),
        })
        .collect();
    let total = entries.len();
    Json(ActivityResponse {
        activities: entries,
        total,
    })
}

async fn handle_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    let summary = state.session.summary();
    Json(SummaryResponse {
        total_budget: summary.total_budget,
        allocated_budget: summary.allocated_budget,
        allocated_inr: format_inr(summary.allocated_budget),
        unallocated: summary.unallocated(),
        utilization_rate: summary.utilization_rate(),
        efficiency_score: summary.efficiency_score,
        transactions: summary.transactions,
    })
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.session.snapshot_filtered("all");
    Json(HealthResponse {
        status: if snapshot.online_devices > 0 {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        session_id: snapshot.session_id,
        tick_count: snapshot.tick_count,
        devices_online: snapshot.online_devices,
        devices_total: snapshot.devices.len(),
        unresolved_anomalies: snapshot.unresolved_anomalies,
        refreshing: snapshot.refreshing,
    })
}

async fn handle_refresh(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RefreshResponse>) {
    let started = state.session.refresh();
    let status = if started {
        StatusCode::ACCEPTED
    } else {
        StatusCode::CONFLICT
    };
    (
        status,
        Json(RefreshResponse {
            started,
            refreshing: state.session.is_refreshing(),
        }),
    )
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Civicpulse Server",
        "version": civicpulse_core::VERSION,
        "session": state.session.id(),
        "endpoints": {
            "/": "This API index",
            "/snapshot": "Full feed snapshot (params: sector=all|<name>)",
            "/window": "Rolling 24-hour spending window",
            "/anomalies": "Anomaly events, newest first (params: sector)",
            "/devices": "Telemetry device fleet (params: sector)",
            "/activity": "Activity log, newest first",
            "/summary": "Budget summary with derived figures",
            "/health": "Session health check",
            "/refresh": {
                "method": "POST",
                "description": "Trigger a manual window refresh (409 while one is in flight)",
            },
        },
        "examples": {
            "filtered_devices": "/devices?sector=environment",
            "filtered_snapshot": "/snapshot?sector=public%20safety",
        }
    }))
}

/// Build the axum router.
fn build_router(session: FeedSession) -> Router {
    let state = Arc::new(AppState { session });

    Router::new()
        .route("/", get(handle_index))
        .route("/snapshot", get(handle_snapshot))
        .route("/window", get(handle_window))
        .route("/anomalies", get(handle_anomalies))
        .route("/devices", get(handle_devices))
        .route("/activity", get(handle_activity))
        .route("/summary", get(handle_summary))
        .route("/health", get(handle_health))
        .route("/refresh", post(handle_refresh))
        .with_state(state)
}

/// Run the HTTP feed server.
pub async fn run_server(session: FeedSession, host: &str, port: u16) {
    let app = build_router(session);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
