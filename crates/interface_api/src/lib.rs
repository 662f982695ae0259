//! HTTP API Layer for the underwriting pipeline (`spec.md` §6).
//!
//! - **handlers**: one handler per `/api/v1/underwriting` endpoint
//! - **middleware**: audit logging
//! - **dto**: request/response wire shapes
//! - **error**: `ApiError` and its HTTP mapping (`spec.md` §7)
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{AppState, create_router};
//!
//! let app = create_router(AppState { store, agent_runner, config });
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use agent_runtime::AgentRunnerPort;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use infra_store::PersistencePort;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{health, underwriting};
use crate::middleware::audit_middleware;

/// Shared state for every handler: the document store, the LLM-backed
/// agent runner, and the resolved configuration.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PersistencePort>,
    pub agent_runner: Arc<dyn AgentRunnerPort>,
    pub config: ApiConfig,
}

/// Builds the full router for `spec.md` §6's endpoint list.
pub fn create_router(state: AppState) -> Router {
    let underwriting_routes = Router::new()
        .route("/process", post(underwriting::process))
        .route("/process/stream", post(underwriting::process_stream))
        .route("/process/file", post(underwriting::process_file))
        .route("/agents", get(underwriting::agents))
        .route("/sample-data", get(underwriting::sample_data))
        .route("/demo", post(underwriting::demo))
        .route("/reports", get(underwriting::list_reports))
        .route("/reports/:applicationId", get(underwriting::get_report))
        .route(
            "/reports/:applicationId/all",
            get(underwriting::get_report_all),
        )
        .route("/dashboard-data", get(underwriting::dashboard_data))
        .route("/ws/:clientId", get(underwriting::websocket));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1/underwriting", underwriting_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            audit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
