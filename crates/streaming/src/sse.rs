//! SSE subscriber for `POST /process/stream` (`spec.md` §6): one `data:`
//! frame per `WorkflowEvent`, terminated by a `{"type":"complete",...}`
//! or `{"type":"error",...}` frame. Ported from
//! `phoenix_web::mission_control::api_agent_events`'s actix-web
//! broadcast-to-SSE loop into axum's `Sse`/`Event` types; the
//! `Lagged`/`Closed` handling is unchanged.

use std::convert::Infallible;

use agent_runtime::events::WorkflowEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use tokio::sync::broadcast;

pub enum TerminalFrame {
    Complete { workflow_id: String },
    Error { workflow_id: String, message: String },
}

/// Builds the axum `Sse` response for a workflow's event stream. The
/// stream ends (no more `yield`s) once the bus is closed or the
/// caller-provided `terminal` future resolves, whichever comes first —
/// `terminal` is driven by the same orchestrator-result future the
/// caller awaits, so the handler can append the closing frame spec.md
/// requires without the bus itself needing to know about it.
pub fn workflow_event_stream(
    mut rx: broadcast::Receiver<WorkflowEvent>,
    terminal: impl std::future::Future<Output = TerminalFrame> + Send + 'static,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = async_stream::stream! {
        tokio::pin!(terminal);
        loop {
            tokio::select! {
                biased;
                result = rx.recv() => {
                    match result {
                        Ok(event) => {
                            let json = serde_json::to_string(&event)
                                .expect("WorkflowEvent always serializes");
                            yield Ok(Event::default().data(json));
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "sse subscriber lagged, continuing from latest cursor");
                            continue;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                frame = &mut terminal => {
                    let json = match frame {
                        TerminalFrame::Complete { workflow_id } => {
                            serde_json::to_string(&WorkflowEvent::terminal_complete_frame(&workflow_id))
                        }
                        TerminalFrame::Error { workflow_id, message } => {
                            serde_json::to_string(&WorkflowEvent::terminal_error_frame(&workflow_id, &message))
                        }
                    }
                    .expect("terminal frames always serialize");
                    yield Ok(Event::default().data(json));
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
