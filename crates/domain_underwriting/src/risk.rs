//! Risk Engine (`spec.md` §4.B).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Applicant, MedicalFindings, RiskAssessment, RiskLevel};

const DEFAULT_HEIGHT_CM: Decimal = dec!(165);
const DEFAULT_WEIGHT_KG: Decimal = dec!(65);

const MEDICAL_WEIGHT: Decimal = dec!(0.5);
const LIFESTYLE_WEIGHT: Decimal = dec!(0.25);
const OCCUPATION_WEIGHT: Decimal = dec!(0.15);
const FINANCIAL_WEIGHT: Decimal = dec!(0.1);

/// The source hard-codes this for every occupation ("Assume low for
/// accountant" in `underwriter.py`); no occupation-to-risk table exists
/// to port, so the value is carried as-is.
const OCCUPATION_RISK: Decimal = dec!(0.1);

/// BMI with the same 165cm/65kg defaults `assess` uses for missing
/// measurements; exposed for presentation contexts (e.g. the
/// orchestrator's agent case-context summary) that want the same
/// figure without recomputing risk.
pub fn bmi(applicant: &Applicant) -> Decimal {
    let height_cm = applicant
        .physical
        .height_cm
        .filter(|h| *h > Decimal::ZERO)
        .unwrap_or(DEFAULT_HEIGHT_CM);
    let weight_kg = applicant
        .physical
        .weight_kg
        .filter(|w| *w > Decimal::ZERO)
        .unwrap_or(DEFAULT_WEIGHT_KG);
    let height_m = height_cm / dec!(100);
    weight_kg / (height_m * height_m)
}

fn lifestyle_risk(applicant: &Applicant) -> Decimal {
    let mut composite = dec!(0.8);
    if applicant.lifestyle.smoker {
        composite -= dec!(0.3);
    }
    if applicant
        .lifestyle
        .alcohol_units_per_week
        .is_some_and(|units| units > 14)
    {
        composite -= dec!(0.1);
    }
    Decimal::ONE - composite
}

fn financial_risk(applicant: &Applicant) -> Decimal {
    let annual_income = match applicant.annual_income {
        Some(income) if income > Decimal::ZERO => income,
        _ => return Decimal::ZERO,
    };
    let total_sum_assured: Decimal = applicant
        .covers_requested
        .iter()
        .map(|c| c.sum_assured)
        .sum();
    (total_sum_assured / (dec!(10) * annual_income)).min(dec!(0.5))
}

/// `assess(Applicant, MedicalFindings) -> RiskAssessment` (`spec.md` §4.B).
pub fn assess(applicant: &Applicant, findings: &MedicalFindings) -> RiskAssessment {
    let medical_risk = Decimal::ONE - findings.risk_score;
    let lifestyle_risk = lifestyle_risk(applicant);
    let financial_risk = financial_risk(applicant);
    let occupation_risk = OCCUPATION_RISK;

    let has_critical_alert = !findings.critical_alerts.is_empty();

    let overall_level = if medical_risk <= dec!(0.2) && lifestyle_risk <= dec!(0.2) && !has_critical_alert
    {
        RiskLevel::Low
    } else if medical_risk >= dec!(0.5) || has_critical_alert {
        RiskLevel::High
    } else {
        RiskLevel::Standard
    };

    let risk_score = MEDICAL_WEIGHT * medical_risk
        + LIFESTYLE_WEIGHT * lifestyle_risk
        + OCCUPATION_WEIGHT * occupation_risk
        + FINANCIAL_WEIGHT * financial_risk;

    let mut red_flags = Vec::new();
    for alert in &findings.critical_alerts {
        red_flags.push(format!("Critical medical alert: {alert}"));
    }
    if applicant.lifestyle.smoker {
        red_flags.push("Current smoker".to_string());
    }
    let bmi_value = bmi(applicant);
    if bmi_value > dec!(30) {
        red_flags.push(format!("High BMI: {bmi_value}"));
    }
    if applicant.age > 55 {
        red_flags.push(format!("Advanced age: {}", applicant.age));
    }

    let mut recommendations = Vec::new();
    if has_critical_alert {
        recommendations.push("Recommend specialist medical review before final decision".to_string());
    }
    if applicant.lifestyle.smoker {
        recommendations.push("Consider smoking cessation program enrollment".to_string());
    }
    if bmi_value > dec!(30) {
        recommendations.push("Recommend weight management consultation".to_string());
    }
    if applicant.age > 55 {
        recommendations.push("Recommend comprehensive age-related health screening".to_string());
    }

    RiskAssessment {
        overall_level,
        risk_score,
        medical_risk,
        lifestyle_risk,
        financial_risk,
        occupation_risk,
        red_flags,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoverRequest, CoverType, Gender, Lifestyle, Physical};

    fn base_applicant() -> Applicant {
        Applicant {
            application_id: "APP001".into(),
            name: "Test Applicant".into(),
            age: 28,
            gender: Gender::Male,
            occupation: Some("Accountant".into()),
            annual_income: Some(dec!(1_500_000)),
            covers_requested: vec![CoverRequest {
                cover_type: CoverType::TermLifeInsurance,
                sum_assured: dec!(5_000_000),
                term: 20,
            }],
            lifestyle: Lifestyle::default(),
            physical: Physical {
                height_cm: Some(dec!(175)),
                weight_kg: Some(dec!(70)),
            },
        }
    }

    fn healthy_findings() -> MedicalFindings {
        MedicalFindings {
            normal_values: vec![],
            abnormal_values: vec![],
            critical_alerts: vec![],
            risk_score: dec!(0.8),
        }
    }

    #[test]
    fn healthy_young_adult_is_low_risk() {
        let assessment = assess(&base_applicant(), &healthy_findings());
        assert_eq!(assessment.overall_level, RiskLevel::Low);
        assert!(assessment.red_flags.is_empty());
    }

    #[test]
    fn critical_alert_forces_high_risk_and_red_flag() {
        let findings = MedicalFindings {
            critical_alerts: vec!["Severe arrhythmia".into()],
            ..healthy_findings()
        };
        let assessment = assess(&base_applicant(), &findings);
        assert_eq!(assessment.overall_level, RiskLevel::High);
        assert!(assessment
            .red_flags
            .contains(&"Critical medical alert: Severe arrhythmia".to_string()));
    }

    #[test]
    fn smoker_reduces_lifestyle_composite_and_adds_flag() {
        let mut applicant = base_applicant();
        applicant.lifestyle.smoker = true;
        let assessment = assess(&applicant, &healthy_findings());
        assert_eq!(assessment.lifestyle_risk, Decimal::ONE - dec!(0.5));
        assert!(assessment.red_flags.contains(&"Current smoker".to_string()));
    }

    #[test]
    fn missing_physical_measurements_use_defaults() {
        let mut applicant = base_applicant();
        applicant.physical = Physical::default();
        let assessment = assess(&applicant, &healthy_findings());
        // Default BMI (165cm/65kg ~ 23.9) is well under the 30 threshold.
        assert!(!assessment
            .red_flags
            .iter()
            .any(|f| f.starts_with("High BMI")));
    }

    #[test]
    fn zero_income_yields_zero_financial_risk() {
        let mut applicant = base_applicant();
        applicant.annual_income = None;
        let assessment = assess(&applicant, &healthy_findings());
        assert_eq!(assessment.financial_risk, Decimal::ZERO);
    }

    #[test]
    fn financial_risk_is_capped_at_one_half() {
        let mut applicant = base_applicant();
        applicant.annual_income = Some(dec!(100));
        let assessment = assess(&applicant, &healthy_findings());
        assert_eq!(assessment.financial_risk, dec!(0.5));
    }

    #[test]
    fn advanced_age_adds_red_flag() {
        let mut applicant = base_applicant();
        applicant.age = 60;
        let assessment = assess(&applicant, &healthy_findings());
        assert!(assessment
            .red_flags
            .contains(&"Advanced age: 60".to_string()));
    }
}
