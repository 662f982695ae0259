//! `PersistencePort` (`spec.md` §6 persistence operations), extending
//! the `core_kernel` port marker the way every other domain's adapter
//! boundary does (`infra_db::repositories::policy::PolicyRepository`
//! is the same shape without the marker trait, predating its adoption
//! in this codebase — `infra_store` is built against the current
//! convention).

use async_trait::async_trait;
use core_kernel::ports::DomainPort;

use crate::document::{
    AgentResultDocument, ComprehensiveReportDocument, DashboardSummary, DocumentType,
    WorkflowResultDocument,
};
use crate::error::StoreError;

#[async_trait]
pub trait PersistencePort: DomainPort {
    async fn store_workflow(&self, document: WorkflowResultDocument) -> Result<(), StoreError>;

    async fn store_agent_result(&self, document: AgentResultDocument) -> Result<(), StoreError>;

    async fn store_report(
        &self,
        document: ComprehensiveReportDocument,
    ) -> Result<(), StoreError>;

    /// `GET /reports/{appId}` (latest) and `/reports/{appId}/all`
    /// (`limit` governs how many rows come back; callers pass `1` for
    /// "latest only").
    async fn find_by_application(
        &self,
        application_id: &str,
        document_type: DocumentType,
        limit: i64,
    ) -> Result<Vec<serde_json::Value>, StoreError>;

    /// `GET /reports` (all comprehensive reports, newest first).
    async fn find_all_reports(&self) -> Result<Vec<serde_json::Value>, StoreError>;

    /// `GET /dashboard-data`'s `summary` object.
    async fn dashboard_summary(&self) -> Result<DashboardSummary, StoreError>;
}
