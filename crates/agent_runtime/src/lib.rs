//! Agent Runner and Orchestrator (`spec.md` §4.D, §4.G).
//!
//! `prompts` bundles the five fixed system prompts and the execution
//! order; `runner` is the `AgentRunnerPort` trait and its live HTTP
//! implementation; `events` defines the wire-level `WorkflowEvent`;
//! `orchestrator` drives the per-workflow state machine that calls the
//! runner in sequence and emits events onto a bounded channel.

pub mod events;
pub mod orchestrator;
pub mod prompts;
pub mod runner;

pub use events::{AgentStatus, WorkflowEvent};
pub use orchestrator::{Orchestrator, OrchestratorConfig, OrchestratorError};
pub use prompts::{AgentDefinition, AgentStage, AGENT_WORKFLOW};
pub use runner::{AgentError, AgentRunnerPort, HttpAgentRunner, HttpAgentRunnerConfig};
