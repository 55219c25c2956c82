// HTTP surface: the update webhook plus health and metrics probes.

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::dispatch::Dispatcher;
use crate::metrics;
use crate::transport::InboundUpdate;

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub webhook_token: Option<String>,
}

// ── Error helper ──────────────────────────────────────────────────────

fn json_error(status: StatusCode, msg: &str) -> impl IntoResponse {
    (status, Json(json!({ "error": msg })))
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(dispatcher: Arc<Dispatcher>, webhook_token: Option<String>) -> Router {
    let state = AppState {
        dispatcher,
        webhook_token,
    };

    Router::new()
        .route("/api/updates", post(receive_update))
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Handlers ──────────────────────────────────────────────────────────

/// Ingest one update from the messaging gateway.
///
/// The update is handed to the dispatcher on its own task and the
/// gateway gets an immediate 202, so a slow hunt never stalls the
/// webhook. Per-user ordering is the dispatcher's job, not this
/// handler's.
async fn receive_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<InboundUpdate>,
) -> impl IntoResponse {
    if let Some(expected) = &state.webhook_token {
        let presented = headers.get("x-webhook-token").and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            return json_error(StatusCode::UNAUTHORIZED, "Invalid webhook token").into_response();
        }
    }

    if update.user_id <= 0 {
        return json_error(StatusCode::BAD_REQUEST, "user_id is required").into_response();
    }

    let dispatcher = state.dispatcher.clone();
    tokio::spawn(async move { dispatcher.dispatch(update).await });

    (StatusCode::ACCEPTED, Json(json!({ "status": "accepted" }))).into_response()
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "cachehunt-bot" }))
}

async fn metrics_text() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        metrics::gather_metrics(),
    )
        .into_response()
}
