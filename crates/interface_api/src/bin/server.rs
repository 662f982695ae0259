//! Underwriting Pipeline - API Server Binary
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` / `DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_LLM_ENDPOINT` - Base URL for the agent LLM
//! * `API_LLM_MODEL` - Model name passed to the LLM
//! * `API_LLM_BEARER_TOKEN` - Bearer credential for the LLM

use std::sync::Arc;

use agent_runtime::{HttpAgentRunner, HttpAgentRunnerConfig};
use infra_store::PostgresDocumentStore;
use interface_api::{config::ApiConfig, create_router, AppState};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = load_config()?;
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting underwriting pipeline API server"
    );

    let pool = create_database_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let store: Arc<dyn infra_store::PersistencePort> =
        Arc::new(PostgresDocumentStore::new(pool));
    let agent_runner: Arc<dyn agent_runtime::AgentRunnerPort> =
        Arc::new(HttpAgentRunner::new(HttpAgentRunnerConfig {
            base_url: config.llm_endpoint.clone(),
            model: config.llm_model.clone(),
            bearer_token: config.llm_bearer_token.clone(),
            ..HttpAgentRunnerConfig::default()
        }));

    let app = create_router(AppState {
        store,
        agent_runner,
        config: config.clone(),
    });

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads configuration from `API_`-prefixed environment variables,
/// falling back to individually-named variables and then defaults.
fn load_config() -> Result<ApiConfig, Box<dyn std::error::Error>> {
    let config = ApiConfig::from_env().unwrap_or_else(|_| ApiConfig {
        host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        port: std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080),
        database_url: std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("API_DATABASE_URL"))
            .unwrap_or_else(|_| "postgres://localhost/underwriting".to_string()),
        log_level: std::env::var("API_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string()),
        llm_endpoint: std::env::var("API_LLM_ENDPOINT").unwrap_or_default(),
        llm_api_version: std::env::var("API_LLM_API_VERSION").ok(),
        llm_model: std::env::var("API_LLM_MODEL").unwrap_or_else(|_| "gpt-4".to_string()),
        llm_bearer_token: std::env::var("API_LLM_BEARER_TOKEN").unwrap_or_default(),
        auto_approval_threshold: std::env::var("API_AUTO_APPROVAL_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| rust_decimal::Decimal::new(7, 1)),
        high_risk_threshold: std::env::var("API_HIGH_RISK_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| rust_decimal::Decimal::new(3, 1)),
        strict_premium_conformance: std::env::var("API_STRICT_PREMIUM_CONFORMANCE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true),
    });

    Ok(config)
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

async fn create_database_pool(database_url: &str) -> Result<sqlx::PgPool, sqlx::Error> {
    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(database_url)
        .await?;

    tracing::info!("Database connection established");
    Ok(pool)
}

async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database ready");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM so in-flight requests can drain before
/// the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, initiating graceful shutdown");
        }
    }
}
