//! Test Data Builders
//!
//! Builder patterns for constructing `Applicant`/`ExtractedMedical`
//! test data, specifying only the fields relevant to a given test while
//! defaulting everything else to the healthy-young-adult baseline.

use domain_underwriting::{
    Applicant, CoverRequest, CoverType, ExtractedMedical, Gender, LabResult, Lifestyle,
    MedicalReport, Physical,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::ApplicantFixtures;

/// Builder for constructing test `Applicant` data.
pub struct ApplicantBuilder {
    applicant: Applicant,
}

impl Default for ApplicantBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicantBuilder {
    /// Starts from the healthy-young-adult baseline fixture.
    pub fn new() -> Self {
        Self {
            applicant: ApplicantFixtures::healthy_young_adult(),
        }
    }

    pub fn with_application_id(mut self, id: impl Into<String>) -> Self {
        self.applicant.application_id = id.into().into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.applicant.name = name.into();
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.applicant.age = age;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.applicant.gender = gender;
        self
    }

    pub fn with_occupation(mut self, occupation: impl Into<String>) -> Self {
        self.applicant.occupation = Some(occupation.into());
        self
    }

    pub fn with_annual_income(mut self, income: Decimal) -> Self {
        self.applicant.annual_income = Some(income);
        self
    }

    pub fn with_cover(mut self, cover_type: CoverType, sum_assured: Decimal, term: u32) -> Self {
        self.applicant.covers_requested = vec![CoverRequest {
            cover_type,
            sum_assured,
            term,
        }];
        self
    }

    pub fn with_covers(mut self, covers: Vec<CoverRequest>) -> Self {
        self.applicant.covers_requested = covers;
        self
    }

    pub fn with_lifestyle(mut self, lifestyle: Lifestyle) -> Self {
        self.applicant.lifestyle = lifestyle;
        self
    }

    pub fn smoker(mut self, cigarettes_per_day: u32) -> Self {
        self.applicant.lifestyle.smoker = true;
        self.applicant.lifestyle.cigarettes_per_day = Some(cigarettes_per_day);
        self
    }

    pub fn with_physical(mut self, height_cm: Decimal, weight_kg: Decimal) -> Self {
        self.applicant.physical = Physical {
            height_cm: Some(height_cm),
            weight_kg: Some(weight_kg),
        };
        self
    }

    pub fn build(self) -> Applicant {
        self.applicant
    }
}

/// Builder for constructing test `ExtractedMedical` data, one report at
/// a time.
pub struct ExtractedMedicalBuilder {
    reports: Vec<MedicalReport>,
}

impl Default for ExtractedMedicalBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractedMedicalBuilder {
    pub fn new() -> Self {
        Self { reports: Vec::new() }
    }

    pub fn with_report(mut self, report: MedicalReport) -> Self {
        self.reports.push(report);
        self
    }

    pub fn with_lab_result(
        mut self,
        category: impl Into<String>,
        value: Decimal,
        unit: impl Into<String>,
    ) -> Self {
        let report = self.reports.last_mut();
        let lab = LabResult {
            category: category.into(),
            value,
            unit: unit.into(),
            reference_range: None,
        };
        match report {
            Some(report) => report.lab_results.push(lab),
            None => self.reports.push(MedicalReport {
                extraction_successful: true,
                lab_results: vec![lab],
                normal_values: vec![],
                abnormal_values: vec![],
                critical_alerts: vec![],
            }),
        }
        self
    }

    pub fn with_abnormal_value(mut self, text: impl Into<String>) -> Self {
        self.ensure_report().abnormal_values.push(text.into());
        self
    }

    pub fn with_critical_alert(mut self, text: impl Into<String>) -> Self {
        self.ensure_report().critical_alerts.push(text.into());
        self
    }

    fn ensure_report(&mut self) -> &mut MedicalReport {
        if self.reports.is_empty() {
            self.reports.push(MedicalReport {
                extraction_successful: true,
                lab_results: vec![],
                normal_values: vec![],
                abnormal_values: vec![],
                critical_alerts: vec![],
            });
        }
        self.reports.last_mut().unwrap()
    }

    pub fn build(self) -> ExtractedMedical {
        ExtractedMedical {
            reports: self.reports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_only_the_fields_it_sets() {
        let applicant = ApplicantBuilder::new().with_age(61).build();
        assert_eq!(applicant.age, 61);
        assert_eq!(applicant.name, "Jordan Lee");
    }

    #[test]
    fn medical_builder_accumulates_onto_one_report() {
        let extracted = ExtractedMedicalBuilder::new()
            .with_lab_result("HbA1c", dec!(9.0), "%")
            .with_abnormal_value("HbA1c 9.0% indicates uncontrolled diabetes")
            .build();
        assert_eq!(extracted.reports.len(), 1);
        assert_eq!(extracted.reports[0].lab_results.len(), 1);
        assert_eq!(extracted.reports[0].abnormal_values.len(), 1);
    }
}
