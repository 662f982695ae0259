//! API error handling (`spec.md` §7 HTTP-layer error mapping).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// `InvalidInput -> 400; UnknownApplication -> 404;
/// PersistenceUnavailable on a query endpoint -> 503; everything else -> 500`
/// (`spec.md` §7).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// `{error, detail}` (`spec.md` §7) — spec.md gives this exact body,
/// narrower than the teacher's `{error, message, details}` shape.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "unknown_application"),
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "persistence_unavailable")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            detail: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<infra_store::StoreError> for ApiError {
    fn from(err: infra_store::StoreError) -> Self {
        match err {
            infra_store::StoreError::NotFound(id) => {
                ApiError::NotFound(format!("no report found for application {id}"))
            }
            infra_store::StoreError::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
            infra_store::StoreError::Query(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<agent_runtime::OrchestratorError> for ApiError {
    fn from(err: agent_runtime::OrchestratorError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
