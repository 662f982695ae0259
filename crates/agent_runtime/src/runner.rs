//! Agent Runner (`spec.md` §4.D): the one non-pure component in the
//! pipeline. `AgentRunnerPort` is the seam tests substitute a
//! table-driven fake across (`spec.md` §9); `HttpAgentRunner` is the
//! live implementation backing a bearer-token LLM text-completion
//! endpoint.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use core_kernel::ports::{
    AdapterHealth, CircuitBreakerConfig, DomainPort, HealthCheckResult, HealthCheckable,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prompts::AgentStage;

/// LLM call contract temperature (`spec.md` §4.D).
const TEMPERATURE: f32 = 0.1;
/// LLM call contract max tokens (`spec.md` §4.D).
const MAX_TOKENS: u32 = 4000;
/// LLM call contract timeout (`spec.md` §4.D, §5).
const TIMEOUT_SECS: u64 = 240;

#[derive(Debug, Error)]
pub enum AgentError {
    /// `spec.md` §7: LLM timeout or non-2xx response, or the circuit
    /// breaker refusing the call outright.
    #[error("agent call failed at stage {stage:?}: {cause}")]
    AgentCallFailed { stage: AgentStage, cause: String },
}

/// `run(systemPrompt, userContext) → text | error` (`spec.md` §4.D). No
/// retries — caller policy (the orchestrator) decides what to do with
/// a failure.
#[async_trait]
pub trait AgentRunnerPort: Send + Sync {
    async fn run(
        &self,
        stage: AgentStage,
        system_prompt: &str,
        user_context: &str,
    ) -> Result<String, AgentError>;
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Environment-backed configuration for the live LLM client
/// (`spec.md` §6 "Configuration"): endpoint, API version, model name,
/// and a bearer credential. `base_url` is expected to already include
/// the deployment/API-version query the provider requires.
#[derive(Debug, Clone)]
pub struct HttpAgentRunnerConfig {
    pub base_url: String,
    pub model: String,
    pub bearer_token: String,
    pub circuit_breaker: Option<CircuitBreakerConfig>,
}

impl Default for HttpAgentRunnerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            model: String::new(),
            bearer_token: String::new(),
            circuit_breaker: Some(CircuitBreakerConfig::default()),
        }
    }
}

/// Tracks consecutive failures against a threshold and opens the
/// circuit for `reset_timeout_secs` before allowing a half-open probe.
/// Grounded on `domain_party::adapters::external_crm::CircuitBreaker`.
struct CircuitBreaker {
    config: CircuitBreakerConfig,
    failure_count: AtomicU64,
    success_count: AtomicU64,
    is_open: AtomicBool,
    last_failure_time: RwLock<Option<Instant>>,
}

impl CircuitBreaker {
    fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            failure_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            is_open: AtomicBool::new(false),
            last_failure_time: RwLock::new(None),
        }
    }

    fn is_available(&self) -> bool {
        if !self.is_open.load(Ordering::SeqCst) {
            return true;
        }
        let elapsed = self
            .last_failure_time
            .read()
            .unwrap()
            .map(|t| t.elapsed())
            .unwrap_or(Duration::MAX);
        elapsed >= Duration::from_secs(self.config.reset_timeout_secs)
    }

    fn record_success(&self) {
        self.failure_count.store(0, Ordering::SeqCst);
        let successes = self.success_count.fetch_add(1, Ordering::SeqCst) + 1;
        if successes >= self.config.success_threshold as u64 {
            self.is_open.store(false, Ordering::SeqCst);
            self.success_count.store(0, Ordering::SeqCst);
        }
    }

    fn record_failure(&self) {
        self.success_count.store(0, Ordering::SeqCst);
        let failures = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
        if failures >= self.config.failure_threshold as u64 {
            self.is_open.store(true, Ordering::SeqCst);
            *self.last_failure_time.write().unwrap() = Some(Instant::now());
        }
    }
}

/// Live `AgentRunnerPort` backed by a pooled `reqwest::Client`
/// (`spec.md` §5 "the LLM client (thread-safe, connection-pooled)").
/// Grounded on `llm_orchestrator::LLMOrchestrator::speak_internal` for
/// the request/response envelope.
pub struct HttpAgentRunner {
    client: reqwest::Client,
    config: HttpAgentRunnerConfig,
    circuit_breaker: Option<Arc<CircuitBreaker>>,
}

impl HttpAgentRunner {
    pub fn new(config: HttpAgentRunnerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .expect("reqwest client builds with static TLS config");
        let circuit_breaker = config
            .circuit_breaker
            .clone()
            .map(|cb| Arc::new(CircuitBreaker::new(cb)));
        Self {
            client,
            config,
            circuit_breaker,
        }
    }

    fn is_circuit_open(&self) -> bool {
        self.circuit_breaker
            .as_ref()
            .is_some_and(|cb| !cb.is_available())
    }
}

impl DomainPort for HttpAgentRunner {}

#[async_trait]
impl HealthCheckable for HttpAgentRunner {
    async fn health_check(&self) -> HealthCheckResult {
        let status = if self.is_circuit_open() {
            AdapterHealth::Unhealthy
        } else {
            AdapterHealth::Healthy
        };
        HealthCheckResult {
            adapter_id: "agent_runtime.http_agent_runner".to_string(),
            status,
            latency_ms: 0,
            message: None,
            checked_at: chrono::Utc::now(),
        }
    }
}

#[async_trait]
impl AgentRunnerPort for HttpAgentRunner {
    async fn run(
        &self,
        stage: AgentStage,
        system_prompt: &str,
        user_context: &str,
    ) -> Result<String, AgentError> {
        if self.is_circuit_open() {
            return Err(AgentError::AgentCallFailed {
                stage,
                cause: "circuit breaker open".to_string(),
            });
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_context.to_string(),
                },
            ],
            stream: false,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let result = self.call(&request).await;

        match &result {
            Ok(_) => {
                if let Some(cb) = &self.circuit_breaker {
                    cb.record_success();
                }
            }
            Err(_) => {
                if let Some(cb) = &self.circuit_breaker {
                    cb.record_failure();
                }
            }
        }

        result.map_err(|cause| AgentError::AgentCallFailed { stage, cause })
    }
}

impl HttpAgentRunner {
    async fn call(&self, request: &ChatRequest) -> Result<String, String> {
        let response = self
            .client
            .post(&self.config.base_url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.bearer_token),
            )
            .json(request)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let body_snip: String = body.chars().take(600).collect();
            return Err(format!("HTTP error: {status} — {body_snip}"));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| format!("failed to parse response: {e}"))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| "no content in response".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circuit_breaker_opens_after_threshold_failures() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 2,
            reset_timeout_secs: 30,
            success_threshold: 1,
        });
        assert!(cb.is_available());
        cb.record_failure();
        assert!(cb.is_available());
        cb.record_failure();
        assert!(!cb.is_available());
    }

    #[test]
    fn circuit_breaker_closes_after_success_threshold() {
        let cb = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            reset_timeout_secs: 0,
            success_threshold: 2,
        });
        cb.record_failure();
        assert!(!cb.is_available());
        // reset_timeout_secs=0 means the half-open probe is immediately available.
        assert!(cb.is_available());
        cb.record_success();
        cb.record_success();
        assert!(cb.is_available());
    }
}
