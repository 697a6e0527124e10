//! HTTP route handlers for the Cura agent API.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::answer::types::Mode;
use crate::conversations::types::Exchange;

use super::error::ApiError;
use super::state::AppState;

/// Maximum exchanges returned by the history endpoint.
pub const HISTORY_LIMIT: usize = 100;

/// Create the API router with all routes.
///
/// The ask contract is mounted twice, bare and under `/api`, matching
/// the paths the frontends call.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(ask_router())
        .nest("/api", ask_router())
        .with_state(state)
}

fn ask_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ask", post(ask))
        .route("/ask/history", get(history))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "cura-agent",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Ask request.
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    /// The question text.
    #[serde(default)]
    pub question: String,
    /// Optional persona mode; unrecognized values normalize to patient.
    #[serde(default)]
    pub mode: Option<String>,
}

/// Ask response.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// The resolved answer.
    pub answer: String,
}

/// History response.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// The caller's exchanges, newest first.
    pub conversations: Vec<Exchange>,
}

/// Extract the raw `Authorization` header value, if any.
fn bearer_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
}

/// Handle ask requests.
///
/// Validation runs before any other component: a blank question is
/// rejected without touching the network or the store. Identity is
/// optional, the answer chain is total, and persistence is enqueued
/// fire-and-forget so it can never alter the response.
async fn ask(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Option<Json<AskRequest>>,
) -> Result<Json<AskResponse>, ApiError> {
    let request = payload.map(|Json(body)| body).unwrap_or_default();

    if request.question.trim().is_empty() {
        return Err(ApiError::Validation("Question is required".to_string()));
    }

    let mode = Mode::from_param(request.mode.as_deref());
    let identity = state.resolver.resolve(bearer_header(&headers));

    let answer = state.answers.resolve(&request.question, mode).await;

    let exchange = Exchange::new(
        request.question,
        answer.clone(),
        mode,
        identity.map(|identity| identity.user_id),
    );
    if !state.recorder.try_record(exchange) {
        tracing::warn!("exchange was not queued for persistence");
    }

    Ok(Json(AskResponse { answer }))
}

/// Handle history requests.
///
/// Strictly gated on a valid credential; anonymous callers get 401 and
/// no partial history is ever returned.
async fn history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<HistoryResponse>, ApiError> {
    let identity = state.resolver.require(bearer_header(&headers))?;

    let conversations = state
        .store
        .list_by_owner(&identity.user_id, HISTORY_LIMIT)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(Json(HistoryResponse { conversations }))
}
