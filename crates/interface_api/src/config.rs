//! API configuration (`spec.md` §6 "Configuration").

use serde::Deserialize;

/// Environment-backed configuration for the whole process: the HTTP
/// server, the outbound LLM client, and the document store, in the
/// teacher's `ApiConfig::from_env` shape.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL backing the document store
    pub database_url: String,
    /// Log level
    pub log_level: String,

    /// LLM text-completion endpoint (`spec.md` §4.D/§6).
    pub llm_endpoint: String,
    /// LLM API version, when the provider is versioned (e.g. Azure OpenAI).
    pub llm_api_version: Option<String>,
    /// Model / deployment name sent in each chat-completion request.
    pub llm_model: String,
    /// Bearer credential for the LLM endpoint. In production this is
    /// resolved once at startup from either a static API key or a cloud
    /// identity token provider; here it is always a resolved string by
    /// the time `AppConfig` is constructed.
    pub llm_bearer_token: String,

    /// `spec.md` §6: "auto-approval threshold (default 0.7)". Advisory —
    /// the Orchestrator's decision comes from the Decision Maker agent's
    /// text, not this threshold directly; it is surfaced to agents and to
    /// the dashboard as the configured policy line.
    pub auto_approval_threshold: rust_decimal::Decimal,
    /// `spec.md` §6: "high-risk threshold (default 0.3)".
    pub high_risk_threshold: rust_decimal::Decimal,

    /// Gates the ₹16,770 hard-coded premium split (`spec.md` §4.F, §9
    /// Open Question 3; `DESIGN.md` Open Question resolution 3).
    pub strict_premium_conformance: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/underwriting".to_string(),
            log_level: "info".to_string(),
            llm_endpoint: String::new(),
            llm_api_version: None,
            llm_model: "gpt-4".to_string(),
            llm_bearer_token: String::new(),
            auto_approval_threshold: rust_decimal::Decimal::new(7, 1),
            high_risk_threshold: rust_decimal::Decimal::new(3, 1),
            strict_premium_conformance: true,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment variables prefixed `API_`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
