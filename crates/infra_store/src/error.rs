//! Storage errors (`spec.md` §6 persisted-document shapes).
//!
//! Grounded on `infra_db::error::DatabaseError`'s shape, trimmed to the
//! three failure modes the underwriting document store actually needs:
//! unreachable backing store, missing document, and a query that the
//! database rejected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The pool could not be reached at all. Distinct from `Query` so
    /// callers (e.g. `streaming::PersistenceSubscriber`) can decide
    /// whether to keep retrying or give up for the rest of the workflow.
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}
