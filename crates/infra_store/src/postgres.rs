//! `PostgresDocumentStore`: a single JSONB table behind `PersistencePort`.
//! Grounded on `infra_db::repositories::policy::PolicyRepository`'s
//! `sqlx::query_as!`/transaction idiom, without the bi-temporal
//! `sys_period`/`valid_period` machinery that repository uses — the
//! persisted documents here are append-only, never updated in place.
//!
//! Schema (see `migrations/` in the binary crate that owns the pool):
//!
//! ```sql
//! CREATE TABLE underwriting_documents (
//!     id              TEXT PRIMARY KEY,
//!     application_id  TEXT NOT NULL,
//!     document_type   TEXT NOT NULL,
//!     payload         JSONB NOT NULL,
//!     created_at      TIMESTAMPTZ NOT NULL
//! );
//! CREATE INDEX idx_underwriting_documents_app_type_created
//!     ON underwriting_documents (application_id, document_type, created_at DESC);
//! ```

use async_trait::async_trait;
use core_kernel::ports::DomainPort;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::document::{
    AgentResultDocument, ComprehensiveReportDocument, DashboardSummary, DocumentType,
    WorkflowResultDocument,
};
use crate::error::StoreError;
use crate::port::PersistencePort;

pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PostgresDocumentStore {}

struct DashboardRow {
    total_applications: i64,
    total_accepted: i64,
    total_additional_requirements: i64,
    total_declined: i64,
    total_pending: i64,
    total_premium_value: Decimal,
    average_processing_time: f64,
}

#[async_trait]
impl PersistencePort for PostgresDocumentStore {
    async fn store_workflow(&self, document: WorkflowResultDocument) -> Result<(), StoreError> {
        let created_at = document.processing_timestamp;
        let payload = serde_json::to_value(&document)
            .map_err(|e| StoreError::Query(sqlx::Error::Decode(Box::new(e))))?;
        sqlx::query!(
            r#"
            INSERT INTO underwriting_documents (id, application_id, document_type, payload, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
            document.id,
            document.application_id,
            DocumentType::WorkflowResult.as_str(),
            payload,
            created_at,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn store_agent_result(&self, document: AgentResultDocument) -> Result<(), StoreError> {
        let created_at = document.timestamp;
        let payload = serde_json::to_value(&document)
            .map_err(|e| StoreError::Query(sqlx::Error::Decode(Box::new(e))))?;
        sqlx::query!(
            r#"
            INSERT INTO underwriting_documents (id, application_id, document_type, payload, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
            document.id,
            document.application_id,
            DocumentType::AgentResult.as_str(),
            payload,
            created_at,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn store_report(&self, document: ComprehensiveReportDocument) -> Result<(), StoreError> {
        let created_at = document.created_at;
        let payload = serde_json::to_value(&document)
            .map_err(|e| StoreError::Query(sqlx::Error::Decode(Box::new(e))))?;
        sqlx::query!(
            r#"
            INSERT INTO underwriting_documents (id, application_id, document_type, payload, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
            document.id,
            document.application_id,
            DocumentType::ComprehensiveReport.as_str(),
            payload,
            created_at,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_application(
        &self,
        application_id: &str,
        document_type: DocumentType,
        limit: i64,
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        let rows = sqlx::query!(
            r#"
            SELECT payload
            FROM underwriting_documents
            WHERE application_id = $1 AND document_type = $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
            application_id,
            document_type.as_str(),
            limit,
        )
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(application_id.to_string()));
        }
        Ok(rows.into_iter().map(|r| r.payload).collect())
    }

    async fn find_all_reports(&self) -> Result<Vec<serde_json::Value>, StoreError> {
        let rows = sqlx::query!(
            r#"
            SELECT payload
            FROM underwriting_documents
            WHERE document_type = 'comprehensive_report'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.payload).collect())
    }

    async fn dashboard_summary(&self) -> Result<DashboardSummary, StoreError> {
        let row = sqlx::query_as!(
            DashboardRow,
            r#"
            WITH reports AS (
                SELECT application_id, created_at,
                       payload->>'final_decision' AS final_decision,
                       (payload->>'total_final_premium')::numeric AS total_final_premium
                FROM underwriting_documents
                WHERE document_type = 'comprehensive_report'
            ),
            first_workflow AS (
                SELECT DISTINCT ON (application_id) application_id, created_at AS started_at
                FROM underwriting_documents
                WHERE document_type = 'workflow_result'
                ORDER BY application_id, created_at ASC
            ),
            latest_status AS (
                SELECT DISTINCT ON (application_id) application_id, document_type,
                       payload->>'status' AS status
                FROM underwriting_documents
                WHERE document_type IN ('workflow_result', 'comprehensive_report')
                ORDER BY application_id, created_at DESC
            )
            SELECT
                (SELECT count(DISTINCT application_id) FROM underwriting_documents) AS "total_applications!",
                (SELECT count(*) FROM reports WHERE final_decision = 'AutoApproved') AS "total_accepted!",
                (SELECT count(*) FROM reports WHERE final_decision = 'AdditionalRequirements') AS "total_additional_requirements!",
                (SELECT count(*) FROM reports WHERE final_decision = 'Declined') AS "total_declined!",
                (SELECT count(*) FROM latest_status
                    WHERE document_type = 'workflow_result' AND status NOT IN ('completed', 'failed')
                ) AS "total_pending!",
                (SELECT COALESCE(sum(total_final_premium), 0) FROM reports) AS "total_premium_value!",
                (SELECT COALESCE(AVG(EXTRACT(EPOCH FROM (r.created_at - f.started_at))), 0)
                    FROM reports r JOIN first_workflow f ON f.application_id = r.application_id
                ) AS "average_processing_time!"
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardSummary {
            total_applications: row.total_applications,
            total_accepted: row.total_accepted,
            total_additional_requirements: row.total_additional_requirements,
            total_declined: row.total_declined,
            total_pending: row.total_pending,
            total_premium_value: row.total_premium_value,
            average_processing_time: row.average_processing_time,
        })
    }
}
