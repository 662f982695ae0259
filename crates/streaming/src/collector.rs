//! In-memory collector for `POST /process` (`spec.md` §6): the
//! synchronous endpoint still attaches a subscriber to the bus (per
//! §4.H "Subscribers ... attach before START") but replays the
//! collected events back in the response body instead of streaming
//! them, rather than skip the bus for a "simpler" direct return path.

use agent_runtime::events::WorkflowEvent;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::StreamExt;

/// Drains every event the bus produced, in emission order, until the
/// channel closes (the last `Sender` — orchestrator and bus alike — is
/// dropped). Call after the orchestrator's `run()` future has resolved
/// and every clone of its `broadcast::Sender` has gone out of scope.
pub async fn collect(rx: broadcast::Receiver<WorkflowEvent>) -> Vec<WorkflowEvent> {
    let mut stream = BroadcastStream::new(rx);
    let mut events = Vec::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(event) => events.push(event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "collector subscriber lagged, continuing from latest cursor");
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::WorkflowBus;
    use agent_runtime::events::AgentStatus;
    use core_kernel::EventId;
    use chrono::Utc;

    #[tokio::test]
    async fn collects_every_event_in_order_once_the_bus_closes() {
        let bus = WorkflowBus::with_capacity(16);
        let rx = bus.subscribe();
        let sender = bus.sender();
        drop(bus);

        let id = EventId::new(Utc::now(), 1);
        for i in 0..3 {
            sender
                .send(WorkflowEvent::new(
                    &id,
                    "System",
                    "Workflow Orchestrator",
                    AgentStatus::Active,
                    format!("event {i}"),
                    None,
                    serde_json::json!({}),
                ))
                .unwrap();
        }
        drop(sender);

        let events = collect(rx).await;
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].message, "event 0");
        assert_eq!(events[2].message, "event 2");
    }
}
