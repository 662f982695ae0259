//! `WS /ws/{clientId}` session handler (`spec.md` §6): a client sends
//! `{action:"process", data:{…}}` or `{action:"ping"}`; the server
//! streams `WorkflowEvent` JSON for whichever workflow is currently
//! active on the session, then a terminal `{type:"workflow_complete"}`
//! or `{type:"error", message}` frame — the session itself stays open
//! for further actions afterward (`spec.md` §6, §7).
//!
//! `start_workflow` is supplied by the HTTP layer: it knows how to turn
//! the inbound `data` payload into an `Applicant`/`ExtractedMedical`
//! pair and spawn the orchestrator run, neither of which this crate
//! needs to know about.

use std::future::Future;
use std::pin::Pin;

use agent_runtime::events::WorkflowEvent;
use axum::extract::ws::{Message, WebSocket};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{broadcast, oneshot};

pub type StartWorkflowResult = Result<WorkflowHandle, String>;
pub type StartWorkflowFuture = Pin<Box<dyn Future<Output = StartWorkflowResult> + Send>>;
pub type StartWorkflow = Box<dyn Fn(Value) -> StartWorkflowFuture + Send + Sync>;

/// What a `start_workflow` callback hands back once the orchestrator
/// task has been spawned: the event receiver to stream, and a
/// one-shot that resolves with the terminal outcome.
pub struct WorkflowHandle {
    pub events: broadcast::Receiver<WorkflowEvent>,
    pub outcome: oneshot::Receiver<Result<(), String>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum ClientMessage {
    Process { data: Value },
    Ping,
}

fn pong_frame() -> Value {
    json!({ "type": "pong" })
}

fn workflow_complete_frame() -> Value {
    json!({ "type": "workflow_complete" })
}

fn error_frame(message: &str) -> Value {
    json!({ "type": "error", "message": message })
}

enum ActiveEvent {
    Event(Result<WorkflowEvent, broadcast::error::RecvError>),
    Outcome(Result<Result<(), String>, oneshot::error::RecvError>),
}

async fn next_active_event(active: &mut WorkflowHandle) -> ActiveEvent {
    tokio::select! {
        biased;
        outcome = &mut active.outcome => ActiveEvent::Outcome(outcome),
        event = active.events.recv() => ActiveEvent::Event(event),
    }
}

/// Drives one WebSocket session to completion (client disconnect or
/// socket error). Per §4.G "a client disconnecting ... detaches its
/// subscriber only" — dropping `active` here does not cancel the
/// workflow; it keeps running and persists independently.
pub async fn handle_socket(mut socket: WebSocket, client_id: String, start_workflow: StartWorkflow) {
    let mut active: Option<WorkflowHandle> = None;

    loop {
        tokio::select! {
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Ping) => {
                                if send_json(&mut socket, &pong_frame()).await.is_err() {
                                    break;
                                }
                            }
                            Ok(ClientMessage::Process { data }) => {
                                match start_workflow(data).await {
                                    Ok(handle) => active = Some(handle),
                                    Err(message) => {
                                        tracing::warn!(%client_id, %message, "websocket process request failed to start");
                                        if send_json(&mut socket, &error_frame(&message)).await.is_err() {
                                            break;
                                        }
                                    }
                                }
                            }
                            Err(e) => {
                                if send_json(&mut socket, &error_frame(&e.to_string())).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(%client_id, error = %e, "websocket recv error, closing session");
                        break;
                    }
                }
            }
            next = next_active_event(active.as_mut().expect("guarded by is_some() below")), if active.is_some() => {
                let close = match next {
                    ActiveEvent::Event(Ok(event)) => {
                        send_json(&mut socket, &serde_json::to_value(&event).expect("WorkflowEvent always serializes")).await.is_err()
                    }
                    ActiveEvent::Event(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                        tracing::warn!(%client_id, skipped, "websocket subscriber lagged, continuing from latest cursor");
                        false
                    }
                    ActiveEvent::Event(Err(broadcast::error::RecvError::Closed)) => false,
                    ActiveEvent::Outcome(Ok(Ok(()))) => {
                        let closed = send_json(&mut socket, &workflow_complete_frame()).await.is_err();
                        active = None;
                        closed
                    }
                    ActiveEvent::Outcome(Ok(Err(message))) => {
                        let closed = send_json(&mut socket, &error_frame(&message)).await.is_err();
                        active = None;
                        closed
                    }
                    ActiveEvent::Outcome(Err(_)) => {
                        let closed = send_json(&mut socket, &error_frame("workflow task terminated unexpectedly")).await.is_err();
                        active = None;
                        closed
                    }
                };
                if close {
                    break;
                }
            }
        }
    }
}

async fn send_json(socket: &mut WebSocket, value: &Value) -> Result<(), axum::Error> {
    socket
        .send(Message::Text(
            serde_json::to_string(value).expect("JSON values always serialize"),
        ))
        .await
}
