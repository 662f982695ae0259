//! Shared data model for the underwriting pipeline (`spec.md` §3).

use chrono::{DateTime, Utc};
use core_kernel::{ApplicationId, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------
// Inbound request shapes
// ---------------------------------------------------------------------

/// A single requested coverage line (`insuranceCoverage.coversRequested[]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverRequest {
    pub cover_type: CoverType,
    pub sum_assured: Decimal,
    pub term: u32,
}

/// The four coverage lines the pipeline recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverType {
    #[serde(rename = "Term Life Insurance")]
    TermLifeInsurance,
    #[serde(rename = "Critical Illness")]
    CriticalIllness,
    #[serde(rename = "Accidental Death Benefit")]
    AccidentalDeathBenefit,
    #[serde(rename = "Disability Income")]
    DisabilityIncome,
}

impl CoverType {
    /// `base_rate[coverType]` from `spec.md` §4.F.
    pub fn base_rate(&self) -> Decimal {
        match self {
            CoverType::TermLifeInsurance => Decimal::new(12, 4), // 0.0012
            CoverType::CriticalIllness => Decimal::new(8, 4),    // 0.0008
            CoverType::AccidentalDeathBenefit => Decimal::new(2, 4), // 0.0002
            CoverType::DisabilityIncome => Decimal::new(15, 4),  // 0.0015
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverType::TermLifeInsurance => "Term Life Insurance",
            CoverType::CriticalIllness => "Critical Illness",
            CoverType::AccidentalDeathBenefit => "Accidental Death Benefit",
            CoverType::DisabilityIncome => "Disability Income",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Lifestyle factors (`spec.md` §3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifestyle {
    #[serde(default)]
    pub smoker: bool,
    #[serde(default)]
    pub cigarettes_per_day: Option<u32>,
    #[serde(default)]
    pub alcohol_units_per_week: Option<u32>,
    #[serde(default)]
    pub exercise_frequency: Option<String>,
}

/// Physical measurements used for BMI (`spec.md` §4.B).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Physical {
    pub height_cm: Option<Decimal>,
    pub weight_kg: Option<Decimal>,
}

/// The full applicant record (`spec.md` §3, §6 request body).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub application_id: ApplicationId,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub occupation: Option<String>,
    pub annual_income: Option<Decimal>,
    pub covers_requested: Vec<CoverRequest>,
    #[serde(default)]
    pub lifestyle: Lifestyle,
    #[serde(default)]
    pub physical: Physical,
}

/// One categorized lab result (`spec.md` §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResult {
    pub category: String,
    pub value: Decimal,
    pub unit: String,
    pub reference_range: Option<String>,
}

/// One per-report extracted-medical record (`spec.md` §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalReport {
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

/// The full extracted-medical input (`spec.md` §3): a sequence of reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedMedical {
    pub reports: Vec<MedicalReport>,
}

// ---------------------------------------------------------------------
// Derived entities
// ---------------------------------------------------------------------

/// Output of the Medical Analyzer (`spec.md` §4.A).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalFindings {
    pub normal_values: Vec<String>,
    pub abnormal_values: Vec<String>,
    pub critical_alerts: Vec<String>,
    /// In `[0, 1]`; `1` is healthiest (`spec.md` §3).
    pub risk_score: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Standard,
    High,
    Declined,
}

/// Output of the Risk Engine (`spec.md` §4.B).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub overall_level: RiskLevel,
    pub risk_score: Decimal,
    pub medical_risk: Decimal,
    pub lifestyle_risk: Decimal,
    pub financial_risk: Decimal,
    pub occupation_risk: Decimal,
    pub red_flags: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Minimal,
    Mild,
    Moderate,
    Severe,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadingType {
    Medical,
    Lifestyle,
    Occupational,
    Combined,
}

/// A single tariff-table hit (`spec.md` §4.C).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalLoading {
    pub condition: String,
    pub loading_pct: Decimal,
    pub severity: Severity,
    pub loading_type: LoadingType,
    pub reasoning: String,
    pub affects_critical_illness: bool,
    pub affects_term_life: bool,
    pub affects_disability: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    Preferred,
    Standard,
    StandardPlus,
    ModerateRisk,
    HighRisk,
}

/// Output of the Loading Engine (`spec.md` §4.C).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingResult {
    pub total_loading_pct: Decimal,
    pub loadings: Vec<MedicalLoading>,
    pub critical_count: usize,
    pub abnormal_count: usize,
    pub normal_count: usize,
    pub health_score: Decimal,
    pub risk_category: RiskCategory,
    pub recommendations: Vec<String>,
    pub exclusions: Vec<String>,
    pub requires_additional_tests: bool,
}

/// Stage names for the agent transcript (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    MedicalReview,
    FraudDetection,
    RiskAssessment,
    PremiumCalculation,
    FinalDecision,
}

/// Raw per-stage agent text (`spec.md` §3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentTranscript {
    pub medical_review: Option<String>,
    pub fraud_detection: Option<String>,
    pub risk_assessment: Option<String>,
    pub premium_calculation: Option<String>,
    pub final_decision: Option<String>,
}

impl AgentTranscript {
    pub fn set(&mut self, stage: Stage, text: String) {
        match stage {
            Stage::MedicalReview => self.medical_review = Some(text),
            Stage::FraudDetection => self.fraud_detection = Some(text),
            Stage::RiskAssessment => self.risk_assessment = Some(text),
            Stage::PremiumCalculation => self.premium_calculation = Some(text),
            Stage::FinalDecision => self.final_decision = Some(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnderwritingDecision {
    AutoApproved,
    ManualReview,
    AdditionalRequirements,
    Declined,
}

/// Parsed premium figures from the Response Parser (`spec.md` §4.E).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedPremiumInfo {
    pub total: Decimal,
    pub loading_pct: Decimal,
}

/// Output of `parseDecision` (`spec.md` §4.E / §3 `DecisionDetails`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionDetails {
    pub decision: UnderwritingDecision,
    pub processing_time_days: u32,
    pub total_premium: Decimal,
    pub medical_loading_pct: Option<Decimal>,
    pub conditions: Vec<String>,
    pub exclusions: Vec<String>,
    pub reasoning: Option<String>,
}

/// One coverage's final premium figures (`spec.md` §3 / §4.F).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumCalculation {
    pub cover_type: CoverType,
    pub base_premium: Money,
    pub final_premium: Money,
    pub total_loading_pct: Decimal,
    pub loadings: Vec<MedicalLoading>,
}

/// The terminal underwriting output (`spec.md` §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderwritingReport {
    pub application_id: ApplicationId,
    pub applicant_name: String,
    pub final_decision: UnderwritingDecision,
    /// In `[0.5, 1.0]`.
    pub confidence_score: Decimal,
    pub risk_assessment: RiskAssessment,
    pub medical_findings: MedicalFindings,
    pub loading_result: LoadingResult,
    pub premiums: Vec<PremiumCalculation>,
    pub conditions: Vec<String>,
    pub exclusions: Vec<String>,
    pub reasoning: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub agent_transcript: AgentTranscript,
}
