//! JSONB document persistence for workflow results, per-agent outputs,
//! and comprehensive reports (`spec.md` §6).

pub mod document;
pub mod error;
pub mod port;
pub mod postgres;

pub use document::{
    AgentResultDocument, ComprehensiveReportDocument, DashboardSummary, DocumentType,
    WorkflowResultDocument,
};
pub use error::StoreError;
pub use port::PersistencePort;
pub use postgres::PostgresDocumentStore;
