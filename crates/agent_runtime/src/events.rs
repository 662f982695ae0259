//! `WorkflowEvent` wire format (`spec.md` §4.G, §6).

use chrono::{DateTime, Utc};
use core_kernel::EventId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Lifecycle status of one pipeline stage (`spec.md` §4.G, GLOSSARY
/// "Stage"). Every stage emits exactly one `Active` and one `Completed`
/// or `Error`; `Pending` is never observed on the wire in this
/// implementation (no stage is announced before it starts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Pending,
    Active,
    Completed,
    Error,
}

/// One event on a workflow's event bus (`spec.md` §4.H, §6
/// "WorkflowEvent wire format"). Field names are deliberately
/// snake_case on the wire, unlike the rest of this crate's camelCase
/// DTOs, matching the source's dataclass field names exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub agent_name: String,
    pub agent_role: String,
    pub status: AgentStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(default)]
    pub metadata: Value,
}

impl WorkflowEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        event_id: &EventId,
        agent_name: impl Into<String>,
        agent_role: impl Into<String>,
        status: AgentStatus,
        message: impl Into<String>,
        analysis: Option<String>,
        metadata: Value,
    ) -> Self {
        Self {
            event_id: event_id.to_string(),
            timestamp: Utc::now(),
            agent_name: agent_name.into(),
            agent_role: agent_role.into(),
            status,
            message: message.into(),
            analysis,
            metadata,
        }
    }

    /// A `{"type":"complete",...}` terminal SSE frame (`spec.md` §6).
    pub fn terminal_complete_frame(workflow_id: &str) -> Value {
        json!({ "type": "complete", "workflow_id": workflow_id })
    }

    /// A `{"type":"error",...}` terminal SSE frame (`spec.md` §6, §7).
    pub fn terminal_error_frame(workflow_id: &str, message: &str) -> Value {
        json!({ "type": "error", "workflow_id": workflow_id, "message": message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&AgentStatus::Active).unwrap(), "\"active\"");
        assert_eq!(serde_json::to_string(&AgentStatus::Completed).unwrap(), "\"completed\"");
    }

    #[test]
    fn event_omits_analysis_when_absent() {
        let id = EventId::new(Utc::now(), 1);
        let event = WorkflowEvent::new(
            &id,
            "System",
            "Workflow Orchestrator",
            AgentStatus::Active,
            "Starting",
            None,
            json!({}),
        );
        let text = serde_json::to_string(&event).unwrap();
        assert!(!text.contains("analysis"));
    }
}
