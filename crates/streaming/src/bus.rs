//! `WorkflowBus`: the per-workflow event bus (`spec.md` §4.H). A thin
//! wrapper around `tokio::sync::broadcast::Sender<WorkflowEvent>`,
//! grounded on `phoenix_web::internal_bus::InternalSwarmBus` (same
//! `broadcast::channel` + `subscribe()`/`send()` shape, without the
//! swarm-coordination state that bus also carries).
//!
//! Subscribers attach before the orchestrator's `run()` call starts
//! (`spec.md` §4.H "Subscribers ... attach before START"). Each
//! `broadcast::Receiver` has its own read cursor, so a subscriber that
//! falls behind sees `RecvError::Lagged(skipped)` and the producer
//! never blocks on it — this is the bus's overflow policy ("drop
//! oldest for that subscriber, mark subscriber lagging").

use agent_runtime::events::WorkflowEvent;
use tokio::sync::broadcast;

/// `spec.md` §4.H: "a bounded buffer (≥ 32 events)". 64 gives every
/// subscriber two full agent-cycle's worth of slack before lagging.
pub const DEFAULT_CAPACITY: usize = 64;

pub struct WorkflowBus {
    tx: broadcast::Sender<WorkflowEvent>,
}

impl WorkflowBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.tx.subscribe()
    }

    /// Exposes the raw sender for the orchestrator call, which only
    /// needs to publish and has no reason to depend on this crate.
    pub fn sender(&self) -> broadcast::Sender<WorkflowEvent> {
        self.tx.clone()
    }
}

impl Default for WorkflowBus {
    fn default() -> Self {
        Self::new()
    }
}
