// Reverie — Request handlers
//
// Every response carries a `success` flag and an RFC 3339 `timestamp`.
// Failures use the `{success: false, error, timestamp}` envelope.

use super::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, info, warn};
use reverie_core::{ConsciousnessMetrics, ContextRequest, EngineError, Thought};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

// ── Envelopes ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ThoughtResponse {
    pub success: bool,
    pub thought: Thought,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub success: bool,
    pub metrics: Vec<ConsciousnessMetrics>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThoughtsResponse {
    pub success: bool,
    pub thoughts: Vec<Thought>,
    pub timestamp: String,
}

/// `?limit=N`. Anything that is not a non-negative integer, including a
/// query string that fails to decode, falls back to the endpoint default.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    #[serde(default)]
    pub limit: Option<String>,
}

impl LimitQuery {
    fn parsed(&self) -> Option<usize> {
        self.limit.as_deref().and_then(|s| s.trim().parse().ok())
    }

    fn from_extracted(query: Result<Query<LimitQuery>, QueryRejection>) -> Self {
        match query {
            Ok(Query(q)) => q,
            Err(e) => {
                warn!("[http] Ignoring query string: {}", e.body_text());
                LimitQuery::default()
            }
        }
    }
}

pub fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

// ── Errors ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body was not valid JSON or did not match the context shape.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
            "timestamp": now(),
        }));
        (status, body).into_response()
    }
}

// ── Handlers ───────────────────────────────────────────────────────────

pub async fn generate_thought(
    State(state): State<AppState>,
    payload: Result<Json<ContextRequest>, JsonRejection>,
) -> Result<Json<ThoughtResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!("[http] Rejected /generate-thought body: {}", e.body_text());
        ApiError::BadRequest(e.body_text())
    })?;

    let thought = state.service.generate_thought(request).await.map_err(|e| {
        if e.is_config() {
            error!("[http] /generate-thought misconfigured: {}", e);
        }
        ApiError::from(e)
    })?;
    let (thoughts, metrics, _) = state.service.history_sizes();
    info!(
        "[http] /generate-thought → {} chars (history: {} thoughts, {} metrics)",
        thought.content.chars().count(),
        thoughts,
        metrics
    );

    Ok(Json(ThoughtResponse {
        success: true,
        thought,
        timestamp: now(),
    }))
}

pub async fn consciousness_metrics(
    State(state): State<AppState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Json<MetricsResponse> {
    let query = LimitQuery::from_extracted(query);
    Json(MetricsResponse {
        success: true,
        metrics: state.service.list_metrics(query.parsed()),
        timestamp: now(),
    })
}

pub async fn thought_history(
    State(state): State<AppState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Json<ThoughtsResponse> {
    let query = LimitQuery::from_extracted(query);
    Json(ThoughtsResponse {
        success: true,
        thoughts: state.service.list_thoughts(query.parsed()),
        timestamp: now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverie_core::BackendError;

    #[test]
    fn limit_parsing_falls_back_on_garbage() {
        let q = |s: &str| LimitQuery { limit: Some(s.to_string()) }.parsed();
        assert_eq!(q("5"), Some(5));
        assert_eq!(q(" 7 "), Some(7));
        assert_eq!(q("-3"), None);
        assert_eq!(q("ten"), None);
        assert_eq!(LimitQuery::default().parsed(), None);
    }

    #[test]
    fn error_status_mapping() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        let e: ApiError = EngineError::from(BackendError::UnsupportedProvider("palm".into())).into();
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.to_string(), "Unsupported LLM provider: palm");
    }
}
