//! The application request body and response shapes (`spec.md` §6).

use chrono::{DateTime, Utc};
use domain_underwriting::{
    Applicant, CoverRequest, CoverType, ExtractedMedical, Gender, LabResult, Lifestyle,
    MedicalReport, Physical, UnderwritingReport,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeBody {
    pub annual: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoBody {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub occupation: Option<String>,
    #[serde(default)]
    pub income: Option<IncomeBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetailsBody {
    pub application_number: String,
    pub application_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceCoverageBody {
    pub total_sum_assured: Option<Decimal>,
    pub covers_requested: Vec<CoverRequest>,
}

/// The full application request body (`spec.md` §6): `{personalInfo,
/// applicationDetails, insuranceCoverage, lifestyle?, health?, medicalData?}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub personal_info: PersonalInfoBody,
    pub application_details: ApplicationDetailsBody,
    pub insurance_coverage: InsuranceCoverageBody,
    #[serde(default)]
    pub lifestyle: Lifestyle,
    #[serde(default)]
    pub health: Option<PhysicalBody>,
    #[serde(default)]
    pub medical_data: Option<ExtractedMedicalBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalBody {
    pub height_cm: Option<Decimal>,
    pub weight_kg: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalReportBody {
    pub extraction_successful: bool,
    #[serde(default)]
    pub lab_results: Vec<LabResult>,
    #[serde(default)]
    pub normal_values: Vec<String>,
    #[serde(default)]
    pub abnormal_values: Vec<String>,
    #[serde(default)]
    pub critical_alerts: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExtractedMedicalBody {
    #[serde(default)]
    pub reports: Vec<MedicalReportBody>,
}

fn parse_gender(raw: &str) -> Gender {
    match raw.to_ascii_lowercase().as_str() {
        "male" | "m" => Gender::Male,
        "female" | "f" => Gender::Female,
        _ => Gender::Other,
    }
}

impl ApplicationRequest {
    /// Validates required fields and splits the wire body into the
    /// typed `Applicant`/`ExtractedMedical` pair the engines consume.
    /// `spec.md` §6 request body: `age 18-80`, non-empty
    /// `applicationNumber`, at least one requested cover.
    pub fn into_domain(self) -> Result<(Applicant, ExtractedMedical), ApiError> {
        if self.application_details.application_number.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "applicationDetails.applicationNumber is required".to_string(),
            ));
        }
        if !(18..=80).contains(&self.personal_info.age) {
            return Err(ApiError::BadRequest(format!(
                "personalInfo.age must be in 18..=80, got {}",
                self.personal_info.age
            )));
        }
        if self.insurance_coverage.covers_requested.is_empty() {
            return Err(ApiError::BadRequest(
                "insuranceCoverage.coversRequested must contain at least one cover".to_string(),
            ));
        }

        let health = self.health.unwrap_or_default();
        let applicant = Applicant {
            application_id: self.application_details.application_number.into(),
            name: self.personal_info.name,
            age: self.personal_info.age,
            gender: parse_gender(&self.personal_info.gender),
            occupation: self.personal_info.occupation,
            annual_income: self.personal_info.income.and_then(|i| i.annual),
            covers_requested: self.insurance_coverage.covers_requested,
            lifestyle: self.lifestyle,
            physical: Physical {
                height_cm: health.height_cm,
                weight_kg: health.weight_kg,
            },
        };

        let extracted = ExtractedMedical {
            reports: self
                .medical_data
                .unwrap_or_default()
                .reports
                .into_iter()
                .map(|r| MedicalReport {
                    extraction_successful: r.extraction_successful,
                    lab_results: r.lab_results,
                    normal_values: r.normal_values,
                    abnormal_values: r.abnormal_values,
                    critical_alerts: r.critical_alerts,
                })
                .collect(),
        };

        Ok((applicant, extracted))
    }
}

/// Response body for `POST /process` / `POST /demo`: "a full
/// workflow-result document" (`spec.md` §6) — the events emitted on the
/// workflow's bus plus the assembled report.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub workflow_id: String,
    pub application_id: String,
    pub status: String,
    pub events: Vec<agent_runtime::WorkflowEvent>,
    pub report: UnderwritingReport,
}

/// `GET /agents` (`spec.md` §6): static description of the seven
/// pipeline stages (the two deterministic engines plus the five agents).
#[derive(Debug, Serialize)]
pub struct AgentDescription {
    pub name: &'static str,
    pub role: &'static str,
    pub kind: &'static str,
}

pub fn pipeline_stage_descriptions() -> Vec<AgentDescription> {
    vec![
        AgentDescription {
            name: "MedicalAnalyzer",
            role: "ML Medical Data Analyzer",
            kind: "deterministic",
        },
        AgentDescription {
            name: "RiskAssessmentML",
            role: "ML Risk Assessment Engine",
            kind: "deterministic",
        },
        AgentDescription {
            name: "MedicalReviewer",
            role: "Chief Medical Officer",
            kind: "agent",
        },
        AgentDescription {
            name: "FraudDetector",
            role: "Fraud Detection Specialist",
            kind: "agent",
        },
        AgentDescription {
            name: "RiskAssessor",
            role: "Senior Risk Assessor",
            kind: "agent",
        },
        AgentDescription {
            name: "PremiumCalculator",
            role: "Premium Calculation Actuary",
            kind: "agent",
        },
        AgentDescription {
            name: "DecisionMaker",
            role: "Chief Underwriter",
            kind: "agent",
        },
    ]
}

/// `GET /dashboard-data` (`spec.md` §6).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub applications: Vec<serde_json::Value>,
    pub summary: DashboardSummaryDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummaryDto {
    pub total_applications: i64,
    pub total_accepted: i64,
    pub total_additional_requirements: i64,
    pub total_declined: i64,
    pub total_pending: i64,
    pub total_premium_value: Decimal,
    pub average_processing_time: f64,
}

impl From<infra_store::DashboardSummary> for DashboardSummaryDto {
    fn from(s: infra_store::DashboardSummary) -> Self {
        Self {
            total_applications: s.total_applications,
            total_accepted: s.total_accepted,
            total_additional_requirements: s.total_additional_requirements,
            total_declined: s.total_declined,
            total_pending: s.total_pending,
            total_premium_value: s.total_premium_value,
            average_processing_time: s.average_processing_time,
        }
    }
}

/// Body for `POST /process/file` (`spec.md` §6): paths to applicant/
/// medical JSON on the server's filesystem.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessFileRequest {
    pub applicant_path: String,
    pub medical_path: Option<String>,
}
