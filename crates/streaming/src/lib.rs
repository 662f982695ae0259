//! Streaming substrate (`spec.md` §4.H): the per-workflow event bus and
//! its four subscriber adapters — SSE, WebSocket, in-memory collector,
//! and best-effort persistence.

pub mod bus;
pub mod collector;
pub mod persistence;
pub mod sse;
pub mod websocket;

pub use bus::WorkflowBus;
