//! Persisted-document shapes (`spec.md` §6): three document types, one
//! JSONB payload column per row, distinguished by `document_type` and
//! queried by `application_id`.

use chrono::{DateTime, Utc};
use domain_underwriting::UnderwritingReport;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    WorkflowResult,
    AgentResult,
    ComprehensiveReport,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::WorkflowResult => "workflow_result",
            DocumentType::AgentResult => "agent_result",
            DocumentType::ComprehensiveReport => "comprehensive_report",
        }
    }
}

/// `storeWorkflow(appId, {events, outputs, decision})` payload
/// (`spec.md` §6 "workflow_result").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResultDocument {
    pub id: String,
    pub application_id: String,
    pub workflow_id: String,
    pub applicant_name: String,
    pub status: String,
    pub processing_timestamp: DateTime<Utc>,
    pub events: Vec<Value>,
    pub agent_outputs: Value,
    pub final_decision: Value,
}

/// `storeAgentResult(appId, stage, text, status, meta)` payload
/// (`spec.md` §6 "agent_result").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResultDocument {
    pub id: String,
    pub application_id: String,
    pub agent_name: String,
    pub agent_role: String,
    pub analysis: Option<String>,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: Value,
}

/// `storeReport(appId, report)` payload, denormalized for dashboard
/// queries (`spec.md` §6 "comprehensive_report").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveReportDocument {
    pub id: String,
    pub application_id: String,
    pub created_at: DateTime<Utc>,
    pub report: UnderwritingReport,
    pub applicant_name: String,
    pub final_decision: String,
    pub risk_category: String,
    pub total_final_premium: rust_decimal::Decimal,
}

impl ComprehensiveReportDocument {
    pub fn from_report(report: UnderwritingReport, risk_category: impl Into<String>) -> Self {
        let application_id = report.application_id.to_string();
        let created_at = report.created_at;
        let total_final_premium = report
            .premiums
            .iter()
            .map(|p| p.final_premium.amount())
            .sum();
        Self {
            id: format!("report_{application_id}_{}", created_at.timestamp()),
            application_id,
            created_at,
            applicant_name: report.applicant_name.clone(),
            final_decision: format!("{:?}", report.final_decision),
            risk_category: risk_category.into(),
            total_final_premium,
            report,
        }
    }
}

/// `GET /dashboard-data`'s `summary` object (`spec.md` §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_applications: i64,
    pub total_accepted: i64,
    pub total_additional_requirements: i64,
    pub total_declined: i64,
    pub total_pending: i64,
    pub total_premium_value: rust_decimal::Decimal,
    pub average_processing_time: f64,
}
