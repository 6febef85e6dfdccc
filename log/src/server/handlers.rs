//! HTTP route handlers for the message log server.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use super::error::ApiError;
use super::metrics::Metrics;
use super::request::{GetMessagesParams, parse_push_message};
use super::response::{MessageCreated, MessagePage};
use crate::{Error, MessageLog};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub log: Arc<MessageLog>,
    pub metrics: Arc<Metrics>,
}

/// Handle POST /messages
///
/// Expects a JSON body `{"sender": "...", "content": "..."}` and returns the
/// assigned offset as `{"offset": n}`.
pub async fn handle_push_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageCreated>, ApiError> {
    let message = parse_push_message(&body)?;

    let offset = state.log.push_message(&message).await?;

    state.metrics.messages_appended_total.inc();
    state
        .metrics
        .message_bytes_appended_total
        .inc_by((message.sender().len() + message.content().len()) as u64);

    Ok(Json(MessageCreated { offset }))
}

/// Handle GET /messages
///
/// Accepts optional `offset` (default 0, >= 0) and `limit` (default 10,
/// >= 1) query parameters and returns `{"messages": [...]}`.
pub async fn handle_get_messages(
    State(state): State<AppState>,
    params: Result<Query<GetMessagesParams>, QueryRejection>,
) -> Result<Json<MessagePage>, ApiError> {
    let Query(params) = params.map_err(|e| Error::InvalidInput(e.body_text()))?;
    let request = params.page_request()?;

    let messages = state.log.get_messages(&request).await?;

    state.metrics.messages_read_total.inc_by(messages.len() as u64);

    Ok(Json(MessagePage { messages }))
}

/// Handle GET /metrics
pub async fn handle_metrics(State(state): State<AppState>) -> String {
    state.metrics.encode()
}

/// Handle GET /-/healthy
///
/// Returns 200 OK while the process is running.
pub async fn handle_healthy() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Handle GET /-/ready
///
/// Returns 200 OK if the storage backend answers a minimal read.
pub async fn handle_ready(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.log.check_storage().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "Not Ready")
        }
    }
}
