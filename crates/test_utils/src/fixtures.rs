//! Pre-built Test Fixtures
//!
//! Ready-to-use applicants, extracted-medical payloads, and agent
//! transcripts for the four scored scenarios and the two process-level
//! scenarios (`spec.md` §8 "Concrete end-to-end scenarios").

use domain_underwriting::{
    Applicant, CoverRequest, CoverType, ExtractedMedical, Gender, LabResult, Lifestyle,
    MedicalReport, Physical,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Applicant fixtures for the four scored end-to-end scenarios.
pub struct ApplicantFixtures;

impl ApplicantFixtures {
    /// Scenario 1: healthy young adult, full coverage.
    pub fn healthy_young_adult() -> Applicant {
        Applicant {
            application_id: "APP-SCENARIO-1".into(),
            name: "Jordan Lee".into(),
            age: 28,
            gender: Gender::Male,
            occupation: Some("Accountant".into()),
            annual_income: Some(dec!(1_500_000)),
            covers_requested: vec![CoverRequest {
                cover_type: CoverType::TermLifeInsurance,
                sum_assured: dec!(5_000_000),
                term: 20,
            }],
            lifestyle: Lifestyle {
                smoker: false,
                cigarettes_per_day: None,
                alcohol_units_per_week: Some(2),
                exercise_frequency: Some("regular".into()),
            },
            physical: Physical {
                height_cm: Some(dec!(175)),
                weight_kg: Some(dec!(70)),
            },
        }
    }

    /// Scenario 2: diabetic with controlled HbA1c 7.8%.
    pub fn diabetic_controlled() -> Applicant {
        Applicant {
            application_id: "APP-SCENARIO-2".into(),
            name: "Priya Nair".into(),
            age: 45,
            gender: Gender::Male,
            occupation: Some("Teacher".into()),
            annual_income: Some(dec!(900_000)),
            covers_requested: vec![CoverRequest {
                cover_type: CoverType::TermLifeInsurance,
                sum_assured: dec!(3_000_000),
                term: 15,
            }],
            lifestyle: Lifestyle {
                smoker: true,
                cigarettes_per_day: Some(5),
                alcohol_units_per_week: Some(4),
                exercise_frequency: Some("occasional".into()),
            },
            physical: Physical {
                height_cm: Some(dec!(170)),
                weight_kg: Some(dec!(78)),
            },
        }
    }

    /// Scenario 3: critical finding, HbA1c 10.5%.
    pub fn critical_hba1c() -> Applicant {
        Applicant {
            application_id: "APP-SCENARIO-3".into(),
            name: "Meera Iyer".into(),
            age: 52,
            gender: Gender::Female,
            occupation: Some("Consultant".into()),
            annual_income: Some(dec!(2_000_000)),
            covers_requested: vec![CoverRequest {
                cover_type: CoverType::CriticalIllness,
                sum_assured: dec!(2_000_000),
                term: 10,
            }],
            lifestyle: Lifestyle::default(),
            physical: Physical {
                height_cm: Some(dec!(160)),
                weight_kg: Some(dec!(65)),
            },
        }
    }

    /// Scenario 4: decline by threshold — severe obesity, uncontrolled
    /// diabetes, and severe hypertension compound past 250%.
    pub fn decline_by_threshold() -> Applicant {
        Applicant {
            application_id: "APP-SCENARIO-4".into(),
            name: "Arjun Verma".into(),
            age: 58,
            gender: Gender::Male,
            occupation: Some("Long-haul Driver".into()),
            annual_income: Some(dec!(600_000)),
            covers_requested: vec![CoverRequest {
                cover_type: CoverType::TermLifeInsurance,
                sum_assured: dec!(4_000_000),
                term: 10,
            }],
            lifestyle: Lifestyle {
                smoker: true,
                cigarettes_per_day: Some(25),
                alcohol_units_per_week: Some(25),
                exercise_frequency: Some("none".into()),
            },
            physical: Physical {
                height_cm: Some(dec!(170)),
                weight_kg: Some(dec!(110)),
            },
        }
    }
}

/// Extracted-medical fixtures matching each `ApplicantFixtures` scenario.
pub struct ExtractedMedicalFixtures;

impl ExtractedMedicalFixtures {
    pub fn no_findings() -> ExtractedMedical {
        ExtractedMedical {
            reports: vec![MedicalReport {
                extraction_successful: true,
                lab_results: vec![],
                normal_values: vec!["Complete blood count within normal limits".to_string()],
                abnormal_values: vec![],
                critical_alerts: vec![],
            }],
        }
    }

    /// HbA1c 7.8% (flagged abnormal), BP 140/90, light smoking.
    pub fn controlled_diabetes_with_mild_hypertension() -> ExtractedMedical {
        ExtractedMedical {
            reports: vec![MedicalReport {
                extraction_successful: true,
                lab_results: vec![LabResult {
                    category: "HbA1c".to_string(),
                    value: dec!(7.8),
                    unit: "%".to_string(),
                    reference_range: Some("4.0-5.6".to_string()),
                }],
                normal_values: vec![],
                abnormal_values: vec![
                    "HbA1c 7.8% indicates diabetes requiring management".to_string(),
                    "Blood pressure 140/90 mmHg".to_string(),
                ],
                critical_alerts: vec![],
            }],
        }
    }

    /// Critical HbA1c 10.5%, no other findings.
    pub fn critical_diabetes() -> ExtractedMedical {
        ExtractedMedical {
            reports: vec![MedicalReport {
                extraction_successful: true,
                lab_results: vec![LabResult {
                    category: "HbA1c".to_string(),
                    value: dec!(10.5),
                    unit: "%".to_string(),
                    reference_range: Some("4.0-5.6".to_string()),
                }],
                normal_values: vec![],
                abnormal_values: vec![],
                critical_alerts: vec!["HbA1c 10.5% indicates severe diabetes".to_string()],
            }],
        }
    }

    /// Severe obesity, uncontrolled diabetes, and severe hypertension —
    /// enough to push the combined loading past the decline threshold.
    pub fn severe_multi_condition() -> ExtractedMedical {
        ExtractedMedical {
            reports: vec![MedicalReport {
                extraction_successful: true,
                lab_results: vec![LabResult {
                    category: "HbA1c".to_string(),
                    value: dec!(9.2),
                    unit: "%".to_string(),
                    reference_range: Some("4.0-5.6".to_string()),
                }],
                normal_values: vec![],
                abnormal_values: vec!["HbA1c 9.2% indicates uncontrolled diabetes".to_string()],
                critical_alerts: vec![
                    "Blood pressure 190/115 mmHg indicates severe hypertension".to_string(),
                ],
            }],
        }
    }
}

/// Fixture for decimal test data shared across engine tests.
pub struct DecimalFixtures;

impl DecimalFixtures {
    pub fn zero() -> Decimal {
        Decimal::ZERO
    }

    pub fn epsilon() -> Decimal {
        dec!(0.0001)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_applicants_carry_distinct_application_ids() {
        let ids = [
            ApplicantFixtures::healthy_young_adult().application_id,
            ApplicantFixtures::diabetic_controlled().application_id,
            ApplicantFixtures::critical_hba1c().application_id,
            ApplicantFixtures::decline_by_threshold().application_id,
        ];
        let distinct: std::collections::HashSet<_> = ids.iter().map(|id| id.to_string()).collect();
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn controlled_diabetes_fixture_carries_the_hba1c_lab_result() {
        let extracted = ExtractedMedicalFixtures::controlled_diabetes_with_mild_hypertension();
        assert_eq!(extracted.reports[0].lab_results[0].value, dec!(7.8));
    }
}
