use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Health check endpoint - lightweight, no auth
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: checks DB connectivity with timeout protection
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let query = sqlx::query("SELECT 1").fetch_one(&state.db);
    match tokio::time::timeout(std::time::Duration::from_secs(5), query).await {
        Ok(Ok(_)) => (StatusCode::OK, "ready").into_response(),
        Ok(Err(e)) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {}", e)).into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: timeout").into_response(),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.metrics.get_snapshot();
    Json(snapshot)
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let body = format!(
        "# HELP leseregal_syncs_started Total library syncs started\n# TYPE leseregal_syncs_started counter\nleseregal_syncs_started {}\n\
# HELP leseregal_syncs_completed Total library syncs completed\n# TYPE leseregal_syncs_completed counter\nleseregal_syncs_completed {}\n\
# HELP leseregal_syncs_failed Total library syncs failed\n# TYPE leseregal_syncs_failed counter\nleseregal_syncs_failed {}\n\
# HELP leseregal_syncs_skipped Total library syncs skipped inside the refresh interval\n# TYPE leseregal_syncs_skipped counter\nleseregal_syncs_skipped {}\n\
# HELP leseregal_items_upserted Library items upserted\n# TYPE leseregal_items_upserted counter\nleseregal_items_upserted {}\n\
# HELP leseregal_items_deleted Library items deleted\n# TYPE leseregal_items_deleted counter\nleseregal_items_deleted {}\n\
# HELP leseregal_submissions_recorded Writing submissions recorded\n# TYPE leseregal_submissions_recorded counter\nleseregal_submissions_recorded {}\n\
# HELP leseregal_uptime_seconds Uptime seconds\n# TYPE leseregal_uptime_seconds gauge\nleseregal_uptime_seconds {}\n",
        m.syncs_started,
        m.syncs_completed,
        m.syncs_failed,
        m.syncs_skipped,
        m.items_upserted,
        m.items_deleted,
        m.submissions_recorded,
        m.uptime_seconds,
    );
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
