//! Final-assembly helpers (`spec.md` §4.G "Final assembly"): policy
//! conditions, policy exclusions, and the confidence score. Pure
//! functions, called by the orchestrator after the decision-maker
//! agent completes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{MedicalFindings, RiskAssessment, UnderwritingDecision};

/// `calculate_confidence_score(decision, risk, findings)` (`spec.md` §4.G).
pub fn confidence_score(
    decision: UnderwritingDecision,
    risk: &RiskAssessment,
    findings: &MedicalFindings,
) -> Decimal {
    let mut score = match decision {
        UnderwritingDecision::AutoApproved => dec!(0.95),
        UnderwritingDecision::ManualReview => dec!(0.80),
        UnderwritingDecision::AdditionalRequirements => dec!(0.70),
        UnderwritingDecision::Declined => dec!(0.90),
    };

    if !findings.critical_alerts.is_empty() {
        score += dec!(0.05);
    } else if findings.abnormal_values.is_empty() {
        score += dec!(0.05);
    } else if findings.abnormal_values.len() > 3 {
        score -= dec!(0.10);
    }

    if risk.risk_score > dec!(0.8) && decision == UnderwritingDecision::AutoApproved {
        score += dec!(0.05);
    } else if risk.risk_score < dec!(0.3) && decision == UnderwritingDecision::Declined {
        score += dec!(0.05);
    }

    score.clamp(dec!(0.5), dec!(1.0))
}

/// `generate_conditions(RiskAssessment) -> [String]` (`spec.md` §4.G).
pub fn generate_conditions(risk: &RiskAssessment) -> Vec<String> {
    let mut conditions = Vec::new();
    if risk.medical_risk > dec!(0.3) {
        conditions.push("Annual medical check-up required".to_string());
    }
    if risk.lifestyle_risk > dec!(0.2) {
        conditions.push("Lifestyle modification counseling recommended".to_string());
    }
    if !risk.red_flags.is_empty() {
        conditions.push("Additional medical examinations may be required during policy term".to_string());
    }
    conditions
}

/// `generate_exclusions(MedicalFindings) -> [String]` (`spec.md` §4.G
/// fallback list plus cardiac/diabetes rules).
pub fn generate_exclusions(findings: &MedicalFindings) -> Vec<String> {
    let mut exclusions = vec![
        "Standard suicide clause".to_string(),
        "War and terrorism exclusion".to_string(),
    ];
    for alert in &findings.critical_alerts {
        let lower = alert.to_lowercase();
        if lower.contains("cardiac") || lower.contains("heart") {
            exclusions.push("Pre-existing cardiac conditions exclusion for 4 years".to_string());
        }
        if lower.contains("diabetes") {
            exclusions.push("Diabetes-related complications exclusion for 2 years".to_string());
        }
    }
    exclusions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskLevel;

    fn risk(medical: Decimal, lifestyle: Decimal, red_flags: Vec<String>, risk_score: Decimal) -> RiskAssessment {
        RiskAssessment {
            overall_level: RiskLevel::Standard,
            risk_score,
            medical_risk: medical,
            lifestyle_risk: lifestyle,
            financial_risk: Decimal::ZERO,
            occupation_risk: Decimal::ZERO,
            red_flags,
            recommendations: vec![],
        }
    }

    fn findings(critical: Vec<String>, abnormal: Vec<String>) -> MedicalFindings {
        MedicalFindings {
            normal_values: vec![],
            abnormal_values: abnormal,
            critical_alerts: critical,
            risk_score: dec!(0.8),
        }
    }

    #[test]
    fn healthy_auto_approved_gets_bonus_for_zero_abnormal() {
        let score = confidence_score(
            UnderwritingDecision::AutoApproved,
            &risk(dec!(0.1), dec!(0.1), vec![], dec!(0.9)),
            &findings(vec![], vec![]),
        );
        // 0.95 (decision) + 0.05 (zero abnormal) + 0.05 (risk_score>0.8 & auto-approved) = 1.00
        assert_eq!(score, dec!(1.0));
    }

    #[test]
    fn many_abnormal_values_without_critical_penalizes() {
        let score = confidence_score(
            UnderwritingDecision::ManualReview,
            &risk(dec!(0.4), dec!(0.3), vec![], dec!(0.5)),
            &findings(vec![], vec!["a".into(), "b".into(), "c".into(), "d".into()]),
        );
        // 0.80 - 0.10 = 0.70
        assert_eq!(score, dec!(0.70));
    }

    #[test]
    fn score_never_drops_below_minimum() {
        let score = confidence_score(
            UnderwritingDecision::ManualReview,
            &risk(dec!(0.9), dec!(0.9), vec![], dec!(0.1)),
            &findings(vec![], (0..10).map(|i| i.to_string()).collect()),
        );
        assert!(score >= dec!(0.5));
    }

    #[test]
    fn generate_conditions_covers_all_three_triggers() {
        let conditions = generate_conditions(&risk(
            dec!(0.4),
            dec!(0.3),
            vec!["flag".to_string()],
            dec!(0.5),
        ));
        assert_eq!(conditions.len(), 3);
    }

    #[test]
    fn generate_exclusions_always_includes_the_fallback_pair() {
        let exclusions = generate_exclusions(&findings(vec![], vec![]));
        assert_eq!(
            exclusions,
            vec!["Standard suicide clause".to_string(), "War and terrorism exclusion".to_string()]
        );
    }

    #[test]
    fn cardiac_critical_alert_adds_cardiac_exclusion() {
        let exclusions = generate_exclusions(&findings(vec!["Severe cardiac arrhythmia".to_string()], vec![]));
        assert!(exclusions
            .iter()
            .any(|e| e.contains("cardiac conditions exclusion")));
    }
}
