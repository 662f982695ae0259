//! Persistence subscriber (`spec.md` §4.H, §7 "PersistenceUnavailable
//! ... log, continue"): mirrors the event bus into the document store
//! as it happens, best-effort — a storage failure never affects the
//! workflow or any other subscriber, it is only logged.

use std::sync::Arc;

use agent_runtime::events::{AgentStatus, WorkflowEvent};
use chrono::Utc;
use infra_store::{AgentResultDocument, PersistencePort, WorkflowResultDocument};
use tokio::sync::broadcast;

/// Drains the bus for the lifetime of one workflow, storing an
/// `agent_result` document per non-system event and a single
/// `workflow_result` document once the bus closes. Intended to be
/// `tokio::spawn`ed alongside the orchestrator task; takes the store by
/// `Arc` so it can run after the spawning scope has moved on.
pub async fn run(
    mut rx: broadcast::Receiver<WorkflowEvent>,
    store: Arc<dyn PersistencePort>,
    application_id: String,
    workflow_id: String,
    applicant_name: String,
) {
    let mut collected = Vec::new();
    let mut final_status = "completed".to_string();

    loop {
        match rx.recv().await {
            Ok(event) => {
                if event.status == AgentStatus::Error {
                    final_status = "error".to_string();
                }
                if event.agent_name != "System" {
                    let document = AgentResultDocument {
                        id: format!("{}_{}", event.event_id, event.agent_name.to_lowercase()),
                        application_id: application_id.clone(),
                        agent_name: event.agent_name.clone(),
                        agent_role: event.agent_role.clone(),
                        analysis: event.analysis.clone(),
                        status: status_str(event.status).to_string(),
                        timestamp: event.timestamp,
                        metadata: event.metadata.clone(),
                    };
                    if let Err(err) = store.store_agent_result(document).await {
                        tracing::warn!(application_id = %application_id, error = %err, "failed to persist agent result");
                    }
                }
                collected.push(event);
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(application_id = %application_id, skipped, "persistence subscriber lagged, continuing from latest cursor");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    let events = collected
        .iter()
        .map(|e| serde_json::to_value(e).unwrap_or(serde_json::Value::Null))
        .collect();
    let agent_outputs = collected
        .iter()
        .filter(|e| e.agent_name != "System" && e.status == AgentStatus::Completed)
        .map(|e| (e.agent_name.clone(), serde_json::json!(e.analysis)))
        .collect::<serde_json::Map<_, _>>();

    let document = WorkflowResultDocument {
        id: format!("workflow_{workflow_id}"),
        application_id: application_id.clone(),
        workflow_id,
        applicant_name,
        status: final_status,
        processing_timestamp: Utc::now(),
        events,
        agent_outputs: serde_json::Value::Object(agent_outputs),
        final_decision: serde_json::Value::Null,
    };
    if let Err(err) = store.store_workflow(document).await {
        tracing::warn!(application_id = %application_id, error = %err, "failed to persist workflow result");
    }
}

fn status_str(status: AgentStatus) -> &'static str {
    match status {
        AgentStatus::Pending => "pending",
        AgentStatus::Active => "active",
        AgentStatus::Completed => "completed",
        AgentStatus::Error => "error",
    }
}
