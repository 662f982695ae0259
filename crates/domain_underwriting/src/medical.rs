//! Medical Analyzer (`spec.md` §4.A).
//!
//! Pure function: walks each successful extracted-medical report,
//! concatenates its pre-classified findings, and derives a composite
//! medical-risk scalar from a small set of lab-value thresholds.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{ExtractedMedical, MedicalFindings};

const BASELINE: Decimal = dec!(0.8);
const PENALTY_BLOOD_SUGAR_OR_DIABETES: Decimal = dec!(0.15);
const PENALTY_CARDIAC: Decimal = dec!(0.25);
const PENALTY_ANEMIA: Decimal = dec!(0.10);
const PENALTY_INFECTION: Decimal = dec!(0.05);
const PENALTY_PER_CRITICAL_ALERT: Decimal = dec!(0.20);

/// `analyze(ExtractedMedical) -> MedicalFindings` (`spec.md` §4.A).
///
/// Tolerates missing fields by skipping them; never fails (§7: "Engine
/// functions never fail").
pub fn analyze(extracted: &ExtractedMedical) -> MedicalFindings {
    let mut normal_values = Vec::new();
    let mut abnormal_values = Vec::new();
    let mut critical_alerts = Vec::new();

    let mut high_blood_sugar_or_diabetes = false;
    let mut anemia = false;
    let mut infection = false;

    for report in extracted.reports.iter().filter(|r| r.extraction_successful) {
        normal_values.extend(report.normal_values.iter().cloned());
        abnormal_values.extend(report.abnormal_values.iter().cloned());
        critical_alerts.extend(report.critical_alerts.iter().cloned());

        for lab in &report.lab_results {
            let category = lab.category.to_lowercase();
            if category.contains("glucose") && category.contains("random") && lab.value > dec!(180)
            {
                high_blood_sugar_or_diabetes = true;
            }
            if category.contains("glucose") && category.contains("fasting") && lab.value > dec!(126)
            {
                high_blood_sugar_or_diabetes = true;
            }
            if category.contains("hemoglobin") && lab.value < dec!(10) {
                anemia = true;
            }
            if (category.contains("wbc") || category.contains("white blood cell"))
                && lab.value > dec!(15000)
            {
                infection = true;
            }
        }
    }

    let cardiac = critical_alerts
        .iter()
        .chain(abnormal_values.iter())
        .any(|text| {
            let lower = text.to_lowercase();
            lower.contains("cardiac") || lower.contains("heart")
        });

    let mut penalties = Decimal::ZERO;
    if high_blood_sugar_or_diabetes {
        penalties += PENALTY_BLOOD_SUGAR_OR_DIABETES;
    }
    if cardiac {
        penalties += PENALTY_CARDIAC;
    }
    if anemia {
        penalties += PENALTY_ANEMIA;
    }
    if infection {
        penalties += PENALTY_INFECTION;
    }
    penalties += PENALTY_PER_CRITICAL_ALERT * Decimal::from(critical_alerts.len() as u64);

    let risk_score = (BASELINE - penalties).clamp(Decimal::ZERO, Decimal::ONE);

    MedicalFindings {
        normal_values,
        abnormal_values,
        critical_alerts,
        risk_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LabResult, MedicalReport};

    fn report_with(
        critical: Vec<&str>,
        abnormal: Vec<&str>,
        labs: Vec<LabResult>,
    ) -> MedicalReport {
        MedicalReport {
            extraction_successful: true,
            lab_results: labs,
            normal_values: vec![],
            abnormal_values: abnormal.into_iter().map(String::from).collect(),
            critical_alerts: critical.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn no_findings_yields_baseline_risk_score() {
        let extracted = ExtractedMedical {
            reports: vec![report_with(vec![], vec![], vec![])],
        };
        let findings = analyze(&extracted);
        assert_eq!(findings.risk_score, dec!(0.8));
    }

    #[test]
    fn unsuccessful_extraction_is_skipped() {
        let extracted = ExtractedMedical {
            reports: vec![MedicalReport {
                extraction_successful: false,
                lab_results: vec![],
                normal_values: vec![],
                abnormal_values: vec![],
                critical_alerts: vec!["should be ignored".into()],
            }],
        };
        let findings = analyze(&extracted);
        assert!(findings.critical_alerts.is_empty());
        assert_eq!(findings.risk_score, dec!(0.8));
    }

    #[test]
    fn random_blood_sugar_above_threshold_applies_penalty() {
        let extracted = ExtractedMedical {
            reports: vec![report_with(
                vec![],
                vec![],
                vec![LabResult {
                    category: "Random Blood Sugar".into(),
                    value: dec!(200),
                    unit: "mg/dL".into(),
                    reference_range: None,
                }],
            )],
        };
        let findings = analyze(&extracted);
        assert_eq!(findings.risk_score, dec!(0.8) - dec!(0.15));
    }

    #[test]
    fn critical_alerts_apply_per_alert_penalty() {
        let extracted = ExtractedMedical {
            reports: vec![report_with(
                vec!["Severe arrhythmia detected", "Unrelated alert"],
                vec![],
                vec![],
            )],
        };
        let findings = analyze(&extracted);
        // 2 critical alerts * 0.20, no cardiac keyword match here.
        assert_eq!(findings.risk_score, dec!(0.8) - dec!(0.40));
        assert_eq!(findings.critical_alerts.len(), 2);
    }

    #[test]
    fn cardiac_keyword_in_critical_alert_applies_cardiac_penalty() {
        let extracted = ExtractedMedical {
            reports: vec![report_with(vec!["Acute cardiac event"], vec![], vec![])],
        };
        let findings = analyze(&extracted);
        // 0.25 cardiac + 0.20 per-critical-alert.
        assert_eq!(findings.risk_score, dec!(0.8) - dec!(0.45));
    }

    #[test]
    fn risk_score_clamps_at_zero_when_penalties_exceed_baseline() {
        let extracted = ExtractedMedical {
            reports: vec![report_with(
                vec![
                    "cardiac arrest",
                    "diabetic ketoacidosis",
                    "severe infection",
                    "renal failure",
                    "hepatic failure",
                ],
                vec![],
                vec![],
            )],
        };
        let findings = analyze(&extracted);
        assert_eq!(findings.risk_score, Decimal::ZERO);
    }
}
