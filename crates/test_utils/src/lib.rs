//! Test Utilities Crate
//!
//! Shared test infrastructure, fixtures, and helpers for the
//! underwriting pipeline's test suite.
//!
//! # Modules
//!
//! - `fixtures`: pre-built applicants/extracted-medical data for the
//!   four scored end-to-end scenarios
//! - `builders`: builder patterns for test `Applicant`/`ExtractedMedical`
//!   construction
//! - `fake_agent`: the table-driven `FakeAgentRunner` and its canned
//!   per-scenario transcripts
//! - `database`: testcontainers-backed PostgreSQL harness
//! - `assertions`: custom assertion helpers for domain invariants
//! - `generators`: property-based test data generators

pub mod assertions;
pub mod builders;
pub mod database;
pub mod fake_agent;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use builders::*;
pub use database::*;
pub use fake_agent::*;
pub use fixtures::*;
pub use generators::*;
