//! Core Kernel - Foundational types and utilities for the underwriting pipeline
//!
//! This crate provides the fundamental building blocks shared across every
//! other crate in the workspace:
//! - `Money`/`Currency` with precise decimal arithmetic
//! - Strongly-typed identifiers (`WorkflowId`, `ApplicationId`, `EventId`)
//! - The ports-and-adapters infrastructure (`PortError`, `DomainPort`,
//!   `HealthCheckable`) that `agent_runtime` and `infra_store` build their
//!   trait-based adapters on.

pub mod money;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{WorkflowId, ApplicationId, EventId};
pub use error::CoreError;
pub use ports::{
    DomainPort, PortError, AdapterConfig, AdapterType, CircuitBreakerConfig,
    ExternalSystemConfig, ExternalAuthConfig, AdapterHealth, HealthCheckResult,
    HealthCheckable, OperationMetadata,
};
