//! Loading Engine (`spec.md` §4.C).
//!
//! A table-driven classifier: free-text critical alerts and abnormal
//! values are scanned with regexes to recover embedded clinical values
//! (HbA1c percentages, blood pressure pairs, cholesterol/hemoglobin
//! readings); structured lab results and lifestyle factors are matched
//! directly on their typed fields.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{
    Applicant, ExtractedMedical, LoadingResult, LoadingType, MedicalLoading, RiskCategory,
    Severity,
};

static HBA1C_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.?\d*)\s*%").unwrap());
static BP_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*/\s*(\d+)").unwrap());
static CHOLESTEROL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*mg/dl").unwrap());
static HEMOGLOBIN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.?\d*)\s*g").unwrap());

fn loading(
    condition: &str,
    loading_pct: Decimal,
    severity: Severity,
    loading_type: LoadingType,
    reasoning: String,
    affects_ci: bool,
    affects_tl: bool,
    affects_di: bool,
) -> MedicalLoading {
    MedicalLoading {
        condition: condition.to_string(),
        loading_pct,
        severity,
        loading_type,
        reasoning,
        affects_critical_illness: affects_ci,
        affects_term_life: affects_tl,
        affects_disability: affects_di,
    }
}

fn hba1c_loading(value: Decimal) -> Option<MedicalLoading> {
    if value >= dec!(10.0) {
        Some(loading(
            "Severe Diabetes (HbA1c >= 10%)",
            dec!(150),
            Severity::Critical,
            LoadingType::Medical,
            format!("HbA1c {value}% indicates severe diabetes with poor control"),
            true,
            true,
            true,
        ))
    } else if value >= dec!(8.5) {
        Some(loading(
            "Uncontrolled Diabetes (HbA1c 8.5-9.9%)",
            dec!(100),
            Severity::Severe,
            LoadingType::Medical,
            format!("HbA1c {value}% indicates uncontrolled diabetes"),
            true,
            true,
            true,
        ))
    } else if value >= dec!(7.0) {
        Some(loading(
            "Diabetes (HbA1c 7.0-8.4%)",
            dec!(75),
            Severity::Moderate,
            LoadingType::Medical,
            format!("HbA1c {value}% indicates diabetes requiring management"),
            true,
            true,
            true,
        ))
    } else {
        None
    }
}

fn bp_loading(systolic: i64, diastolic: i64) -> Option<MedicalLoading> {
    if systolic >= 180 || diastolic >= 110 {
        Some(loading(
            "Severe Hypertension",
            dec!(100),
            Severity::Severe,
            LoadingType::Medical,
            format!("Blood pressure {systolic}/{diastolic} indicates severe hypertension"),
            true,
            true,
            true,
        ))
    } else if systolic >= 160 || diastolic >= 100 {
        Some(loading(
            "Moderate Hypertension",
            dec!(50),
            Severity::Moderate,
            LoadingType::Medical,
            format!("Blood pressure {systolic}/{diastolic} indicates moderate hypertension"),
            true,
            true,
            true,
        ))
    } else {
        None
    }
}

fn process_critical_alert(alert: &str) -> Option<MedicalLoading> {
    let lower = alert.to_lowercase();

    if lower.contains("hba1c") || lower.contains("glycated hemoglobin") {
        if let Some(caps) = HBA1C_PATTERN.captures(alert) {
            if let Ok(value) = caps[1].parse::<Decimal>() {
                if let Some(result) = hba1c_loading(value) {
                    return Some(result);
                }
            }
        }
    }

    if lower.contains("blood pressure") || lower.contains("hypertension") {
        if let Some(caps) = BP_PATTERN.captures(alert) {
            let systolic: i64 = caps[1].parse().unwrap_or(0);
            let diastolic: i64 = caps[2].parse().unwrap_or(0);
            if let Some(result) = bp_loading(systolic, diastolic) {
                return Some(result);
            }
        }
    }

    if ["alt", "ast", "liver", "hepatic"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        return Some(loading(
            "Liver Function Abnormality",
            dec!(60),
            Severity::Moderate,
            LoadingType::Medical,
            "Critical liver function abnormality detected".to_string(),
            true,
            true,
            true,
        ));
    }

    if ["creatinine", "kidney", "renal", "urea"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        return Some(loading(
            "Kidney Function Abnormality",
            dec!(50),
            Severity::Moderate,
            LoadingType::Medical,
            "Critical kidney function abnormality detected".to_string(),
            true,
            true,
            true,
        ));
    }

    if ["cardiac", "heart", "ecg", "echo"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        return Some(loading(
            "Cardiac Abnormality",
            dec!(75),
            Severity::Moderate,
            LoadingType::Medical,
            "Critical cardiac abnormality detected".to_string(),
            true,
            true,
            true,
        ));
    }

    None
}

fn process_abnormal_value(abnormal: &str) -> Option<MedicalLoading> {
    let lower = abnormal.to_lowercase();

    if lower.contains("cholesterol") || lower.contains("ldl") {
        if let Some(caps) = CHOLESTEROL_PATTERN.captures(&lower) {
            if let Ok(value) = caps[1].parse::<i64>() {
                if lower.contains("total") && value > 300 {
                    return Some(loading(
                        "Very High Cholesterol",
                        dec!(40),
                        Severity::Moderate,
                        LoadingType::Medical,
                        format!("Total cholesterol {value} mg/dL is very high"),
                        true,
                        true,
                        false,
                    ));
                } else if lower.contains("total") && value > 240 {
                    return Some(loading(
                        "High Cholesterol",
                        dec!(20),
                        Severity::Mild,
                        LoadingType::Medical,
                        format!("Total cholesterol {value} mg/dL is high"),
                        true,
                        true,
                        false,
                    ));
                }
            }
        }
    }

    if lower.contains("hemoglobin") || lower.contains("hb") {
        if let Some(caps) = HEMOGLOBIN_PATTERN.captures(&lower) {
            if let Ok(value) = caps[1].parse::<Decimal>() {
                if value < dec!(10) {
                    return Some(loading(
                        "Moderate Anemia",
                        dec!(35),
                        Severity::Moderate,
                        LoadingType::Medical,
                        format!("Hemoglobin {value} g/dL indicates moderate anemia"),
                        true,
                        true,
                        true,
                    ));
                } else if value < dec!(12) {
                    return Some(loading(
                        "Mild Anemia",
                        dec!(15),
                        Severity::Mild,
                        LoadingType::Medical,
                        format!("Hemoglobin {value} g/dL indicates mild anemia"),
                        false,
                        true,
                        true,
                    ));
                }
            }
        }
    }

    if ["tsh", "t3", "t4", "thyroid"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        return Some(loading(
            "Thyroid Dysfunction",
            dec!(25),
            Severity::Mild,
            LoadingType::Medical,
            "Abnormal thyroid function detected".to_string(),
            false,
            true,
            true,
        ));
    }

    if ["glucose", "sugar", "metabolic"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        return Some(loading(
            "Metabolic Abnormality",
            dec!(30),
            Severity::Mild,
            LoadingType::Medical,
            "Metabolic parameter abnormality detected".to_string(),
            true,
            true,
            true,
        ));
    }

    None
}

fn process_lab_results(extracted: &ExtractedMedical, gender_is_female: bool) -> Vec<MedicalLoading> {
    let mut loadings = Vec::new();

    for report in extracted.reports.iter().filter(|r| r.extraction_successful) {
        for lab in &report.lab_results {
            let category = lab.category.to_lowercase();

            if category.contains("glucose") && category.contains("random") && lab.value > dec!(200)
            {
                loadings.push(loading(
                    "High Random Blood Sugar",
                    dec!(40),
                    Severity::Moderate,
                    LoadingType::Medical,
                    format!("Random blood sugar {} mg/dL is elevated", lab.value),
                    true,
                    true,
                    true,
                ));
            } else if category.contains("glucose") && category.contains("fasting") {
                if lab.value > dec!(126) {
                    loadings.push(loading(
                        "Diabetes (Fasting Glucose)",
                        dec!(75),
                        Severity::Moderate,
                        LoadingType::Medical,
                        format!("Fasting glucose {} mg/dL indicates diabetes", lab.value),
                        true,
                        true,
                        true,
                    ));
                } else if lab.value > dec!(110) {
                    loadings.push(loading(
                        "Prediabetes (Fasting Glucose)",
                        dec!(25),
                        Severity::Mild,
                        LoadingType::Medical,
                        format!("Fasting glucose {} mg/dL indicates prediabetes", lab.value),
                        true,
                        true,
                        false,
                    ));
                }
            }

            if category.contains("hemoglobin") {
                if lab.value < dec!(10) {
                    loadings.push(loading(
                        "Moderate Anemia",
                        dec!(35),
                        Severity::Moderate,
                        LoadingType::Medical,
                        format!("Hemoglobin {} g/dL indicates moderate anemia", lab.value),
                        true,
                        true,
                        true,
                    ));
                } else if (gender_is_female && lab.value < dec!(12))
                    || (!gender_is_female && lab.value < dec!(13))
                {
                    loadings.push(loading(
                        "Mild Anemia",
                        dec!(15),
                        Severity::Mild,
                        LoadingType::Medical,
                        format!("Hemoglobin {} g/dL indicates mild anemia", lab.value),
                        false,
                        true,
                        true,
                    ));
                }
            }

            if category.contains("wbc") || category.contains("white blood cell") {
                if lab.value > dec!(15000) {
                    loadings.push(loading(
                        "Elevated White Blood Cells",
                        dec!(30),
                        Severity::Moderate,
                        LoadingType::Medical,
                        format!(
                            "WBC count {} /cmm indicates possible infection or inflammation",
                            lab.value
                        ),
                        true,
                        false,
                        true,
                    ));
                } else if lab.value < dec!(4000) {
                    loadings.push(loading(
                        "Low White Blood Cells",
                        dec!(25),
                        Severity::Mild,
                        LoadingType::Medical,
                        format!("WBC count {} /cmm is below normal range", lab.value),
                        true,
                        false,
                        true,
                    ));
                }
            }

            for (enzyme, upper_limit) in [("alt", dec!(40)), ("ast", dec!(40)), ("alp", dec!(120))] {
                if category.contains(enzyme) {
                    if lab.value > upper_limit * dec!(3) {
                        loadings.push(loading(
                            &format!("Severely Elevated {}", enzyme.to_uppercase()),
                            dec!(80),
                            Severity::Severe,
                            LoadingType::Medical,
                            format!(
                                "{} {} U/L is severely elevated",
                                enzyme.to_uppercase(),
                                lab.value
                            ),
                            true,
                            true,
                            true,
                        ));
                    } else if lab.value > upper_limit * dec!(2) {
                        loadings.push(loading(
                            &format!("Moderately Elevated {}", enzyme.to_uppercase()),
                            dec!(40),
                            Severity::Moderate,
                            LoadingType::Medical,
                            format!(
                                "{} {} U/L is moderately elevated",
                                enzyme.to_uppercase(),
                                lab.value
                            ),
                            true,
                            true,
                            true,
                        ));
                    } else if lab.value > upper_limit {
                        loadings.push(loading(
                            &format!("Mildly Elevated {}", enzyme.to_uppercase()),
                            dec!(20),
                            Severity::Mild,
                            LoadingType::Medical,
                            format!(
                                "{} {} U/L is mildly elevated",
                                enzyme.to_uppercase(),
                                lab.value
                            ),
                            false,
                            true,
                            true,
                        ));
                    }
                }
            }
        }
    }

    loadings
}

fn process_lifestyle(applicant: &Applicant) -> Vec<MedicalLoading> {
    let mut loadings = Vec::new();
    let lifestyle = &applicant.lifestyle;

    if lifestyle.smoker {
        let cigarettes = lifestyle.cigarettes_per_day.unwrap_or(0);
        if cigarettes > 20 {
            loadings.push(loading(
                "Heavy Smoking",
                dec!(75),
                Severity::Severe,
                LoadingType::Lifestyle,
                format!("Heavy smoking ({cigarettes} cigarettes/day)"),
                true,
                true,
                true,
            ));
        } else if cigarettes > 10 {
            loadings.push(loading(
                "Moderate Smoking",
                dec!(50),
                Severity::Moderate,
                LoadingType::Lifestyle,
                format!("Moderate smoking ({cigarettes} cigarettes/day)"),
                true,
                true,
                true,
            ));
        } else {
            loadings.push(loading(
                "Light Smoking",
                dec!(25),
                Severity::Mild,
                LoadingType::Lifestyle,
                format!("Light smoking ({cigarettes} cigarettes/day)"),
                true,
                true,
                false,
            ));
        }
    }

    if let Some(units) = lifestyle.alcohol_units_per_week {
        if units > 21 {
            loadings.push(loading(
                "Heavy Alcohol Consumption",
                dec!(40),
                Severity::Moderate,
                LoadingType::Lifestyle,
                format!("Heavy alcohol consumption ({units} units/week)"),
                true,
                true,
                true,
            ));
        } else if units > 14 {
            loadings.push(loading(
                "Moderate Alcohol Consumption",
                dec!(15),
                Severity::Mild,
                LoadingType::Lifestyle,
                format!("Moderate alcohol consumption ({units} units/week)"),
                false,
                true,
                false,
            ));
        }
    }

    if let (Some(height_cm), Some(weight_kg)) = (applicant.physical.height_cm, applicant.physical.weight_kg)
    {
        if height_cm > Decimal::ZERO && weight_kg > Decimal::ZERO {
            let height_m = height_cm / dec!(100);
            let bmi = weight_kg / (height_m * height_m);
            if bmi >= dec!(35) {
                loadings.push(loading(
                    "Severe Obesity",
                    dec!(75),
                    Severity::Severe,
                    LoadingType::Lifestyle,
                    format!("BMI {bmi:.1} indicates severe obesity"),
                    true,
                    true,
                    true,
                ));
            } else if bmi >= dec!(30) {
                loadings.push(loading(
                    "Moderate Obesity",
                    dec!(35),
                    Severity::Moderate,
                    LoadingType::Lifestyle,
                    format!("BMI {bmi:.1} indicates moderate obesity"),
                    true,
                    true,
                    true,
                ));
            } else if bmi >= dec!(27) {
                loadings.push(loading(
                    "Mild Obesity",
                    dec!(15),
                    Severity::Mild,
                    LoadingType::Lifestyle,
                    format!("BMI {bmi:.1} indicates mild obesity"),
                    false,
                    true,
                    false,
                ));
            }
        }
    }

    loadings
}

/// The severity-weighted combiner (`spec.md` §4.C, CRITICAL aggregation rule).
fn combine(loadings: &[MedicalLoading], age: u32) -> Decimal {
    if loadings.is_empty() {
        return Decimal::ZERO;
    }

    let by_severity = |s: Severity| -> Vec<Decimal> {
        loadings
            .iter()
            .filter(|l| l.severity == s)
            .map(|l| l.loading_pct)
            .collect()
    };

    let critical = by_severity(Severity::Critical);
    let severe = by_severity(Severity::Severe);
    let moderate = by_severity(Severity::Moderate);
    let mild = by_severity(Severity::Mild);

    let mut total = Decimal::ZERO;

    if !critical.is_empty() {
        total += critical.iter().copied().max().unwrap();
        let rest: Decimal = critical.iter().skip(1).sum();
        total += rest * dec!(0.5);
    }

    if !severe.is_empty() {
        if critical.is_empty() {
            total += severe.iter().copied().max().unwrap();
            let rest: Decimal = severe.iter().skip(1).sum();
            total += rest * dec!(0.4);
        } else {
            let sum: Decimal = severe.iter().sum();
            total += sum * dec!(0.3);
        }
    }

    if !moderate.is_empty() {
        if critical.is_empty() && severe.is_empty() {
            total += moderate.iter().copied().max().unwrap();
            let rest: Decimal = moderate.iter().skip(1).sum();
            total += rest * dec!(0.3);
        } else {
            let sum: Decimal = moderate.iter().sum();
            total += sum * dec!(0.2);
        }
    }

    if !mild.is_empty() {
        let sum: Decimal = mild.iter().sum();
        total += sum * dec!(0.2);
    }

    let age_multiplier = match age {
        18..=25 => dec!(0.8),
        26..=35 => dec!(1.0),
        36..=45 => dec!(1.2),
        46..=55 => dec!(1.4),
        56..=65 => dec!(1.6),
        66..=75 => dec!(2.0),
        _ => dec!(1.0),
    };

    (total * age_multiplier).clamp(Decimal::ZERO, dec!(300))
}

fn health_score(normal: usize, abnormal: usize, critical: usize) -> Decimal {
    let total = normal + abnormal + critical;
    if total == 0 {
        return dec!(0.8);
    }
    let total = Decimal::from(total as u64);
    let normal_ratio = Decimal::from(normal as u64) / total;
    let abnormal_ratio = Decimal::from(abnormal as u64) / total;
    let critical_ratio = Decimal::from(critical as u64) / total;

    let base = normal_ratio * dec!(0.9) + dec!(0.1);
    let score = base - abnormal_ratio * dec!(0.3) - critical_ratio * dec!(0.6);
    score.clamp(Decimal::ZERO, Decimal::ONE)
}

fn risk_category(total_loading: Decimal, critical_count: usize) -> RiskCategory {
    if critical_count > 2 || total_loading > dec!(200) {
        RiskCategory::HighRisk
    } else if critical_count > 0 || total_loading > dec!(100) {
        RiskCategory::ModerateRisk
    } else if total_loading > dec!(50) {
        RiskCategory::StandardPlus
    } else if total_loading > Decimal::ZERO {
        RiskCategory::Standard
    } else {
        RiskCategory::Preferred
    }
}

fn recommendations_and_exclusions(
    loadings: &[MedicalLoading],
    critical_count: usize,
) -> (Vec<String>, Vec<String>, bool) {
    let mut recommendations = Vec::new();
    let mut exclusions = Vec::new();
    let mut requires_additional_tests = false;

    let contains = |l: &MedicalLoading, words: &[&str]| {
        let cond = l.condition.to_lowercase();
        words.iter().any(|w| cond.contains(w))
    };

    let diabetes: Vec<&MedicalLoading> = loadings
        .iter()
        .filter(|l| contains(l, &["diabetes"]))
        .collect();
    let cardiac: Vec<&MedicalLoading> = loadings
        .iter()
        .filter(|l| contains(l, &["cardiac", "heart", "hypertension"]))
        .collect();
    let liver: Vec<&MedicalLoading> = loadings
        .iter()
        .filter(|l| contains(l, &["liver", "alt", "ast"]))
        .collect();
    let kidney: Vec<&MedicalLoading> = loadings
        .iter()
        .filter(|l| contains(l, &["kidney", "creatinine"]))
        .collect();

    if !diabetes.is_empty() {
        let severe = diabetes
            .iter()
            .any(|l| matches!(l.severity, Severity::Severe | Severity::Critical));
        if severe {
            recommendations.push("Regular endocrinologist follow-up required".to_string());
            recommendations.push("HbA1c monitoring every 3 months".to_string());
            exclusions.push("Diabetes-related complications exclusion for Critical Illness coverage".to_string());
            requires_additional_tests = true;
        } else {
            recommendations.push("Annual diabetes screening recommended".to_string());
            recommendations.push("Lifestyle modification for diabetes management".to_string());
        }
    }

    if !cardiac.is_empty() {
        recommendations.push("Regular cardiology evaluation recommended".to_string());
        recommendations.push("Annual ECG and echocardiogram".to_string());
        if cardiac.iter().any(|l| l.severity == Severity::Critical) {
            exclusions.push("Pre-existing cardiac condition exclusion".to_string());
            requires_additional_tests = true;
        }
    }

    if !liver.is_empty() {
        recommendations.push("Regular liver function monitoring".to_string());
        recommendations.push("Hepatology consultation if enzymes remain elevated".to_string());
        if liver
            .iter()
            .any(|l| matches!(l.severity, Severity::Severe | Severity::Critical))
        {
            exclusions.push("Liver disease exclusion".to_string());
            requires_additional_tests = true;
        }
    }

    if !kidney.is_empty() {
        recommendations.push("Regular nephrology follow-up".to_string());
        recommendations.push("Quarterly kidney function monitoring".to_string());
        if kidney
            .iter()
            .any(|l| matches!(l.severity, Severity::Severe | Severity::Critical))
        {
            exclusions.push("Kidney disease exclusion".to_string());
            requires_additional_tests = true;
        }
    }

    if critical_count > 2 {
        recommendations.push("Comprehensive medical evaluation recommended".to_string());
        recommendations.push("Specialist consultations as appropriate".to_string());
        requires_additional_tests = true;
    } else if critical_count > 0 {
        recommendations.push("Follow-up with primary care physician".to_string());
        recommendations.push("Repeat testing in 3-6 months".to_string());
    }

    let lifestyle: Vec<&MedicalLoading> = loadings
        .iter()
        .filter(|l| l.loading_type == LoadingType::Lifestyle)
        .collect();
    if !lifestyle.is_empty() {
        if lifestyle.iter().any(|l| contains(l, &["smoking"])) {
            recommendations.push("Smoking cessation program recommended".to_string());
        }
        if lifestyle.iter().any(|l| contains(l, &["obesity"])) {
            recommendations.push("Weight management program recommended".to_string());
        }
        if lifestyle.iter().any(|l| contains(l, &["alcohol"])) {
            recommendations.push("Alcohol consumption reduction advised".to_string());
        }
    }

    (recommendations, exclusions, requires_additional_tests)
}

/// `calculate(Applicant, ExtractedMedical) -> LoadingResult` (`spec.md` §4.C).
pub fn calculate(applicant: &Applicant, extracted: &ExtractedMedical) -> LoadingResult {
    let mut loadings = Vec::new();

    let mut normal_count = 0;
    let mut abnormal_count = 0;
    let mut critical_count = 0;

    for report in extracted.reports.iter().filter(|r| r.extraction_successful) {
        normal_count += report.normal_values.len();
        abnormal_count += report.abnormal_values.len();
        critical_count += report.critical_alerts.len();

        for alert in &report.critical_alerts {
            if let Some(l) = process_critical_alert(alert) {
                loadings.push(l);
            }
        }
        for abnormal in &report.abnormal_values {
            if let Some(l) = process_abnormal_value(abnormal) {
                loadings.push(l);
            }
        }
    }

    let gender_is_female = matches!(applicant.gender, crate::types::Gender::Female);
    loadings.extend(process_lab_results(extracted, gender_is_female));
    loadings.extend(process_lifestyle(applicant));

    let total_loading_pct = combine(&loadings, applicant.age);
    let health_score = health_score(normal_count, abnormal_count, critical_count);
    let risk_category = risk_category(total_loading_pct, critical_count);
    let (recommendations, exclusions, requires_additional_tests) =
        recommendations_and_exclusions(&loadings, critical_count);

    LoadingResult {
        total_loading_pct,
        loadings,
        critical_count,
        abnormal_count,
        normal_count,
        health_score,
        risk_category,
        recommendations,
        exclusions,
        requires_additional_tests,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoverRequest, CoverType, Gender, Lifestyle, MedicalReport, Physical};

    fn applicant(age: u32) -> Applicant {
        Applicant {
            application_id: "APP001".into(),
            name: "Test".into(),
            age,
            gender: Gender::Male,
            occupation: None,
            annual_income: Some(dec!(1_000_000)),
            covers_requested: vec![CoverRequest {
                cover_type: CoverType::TermLifeInsurance,
                sum_assured: dec!(1_000_000),
                term: 10,
            }],
            lifestyle: Lifestyle::default(),
            physical: Physical::default(),
        }
    }

    fn report(critical: Vec<&str>, abnormal: Vec<&str>) -> MedicalReport {
        MedicalReport {
            extraction_successful: true,
            lab_results: vec![],
            normal_values: vec![],
            abnormal_values: abnormal.into_iter().map(String::from).collect(),
            critical_alerts: critical.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn no_findings_yields_zero_loading_and_preferred_category() {
        let extracted = ExtractedMedical {
            reports: vec![report(vec![], vec![])],
        };
        let result = calculate(&applicant(30), &extracted);
        assert_eq!(result.total_loading_pct, Decimal::ZERO);
        assert_eq!(result.risk_category, RiskCategory::Preferred);
    }

    #[test]
    fn hba1c_exactly_at_boundary_classifies_on_upper_side() {
        assert_eq!(hba1c_loading(dec!(8.5)).unwrap().loading_pct, dec!(100));
        assert_eq!(hba1c_loading(dec!(10.0)).unwrap().loading_pct, dec!(150));
        assert_eq!(hba1c_loading(dec!(7.0)).unwrap().loading_pct, dec!(75));
    }

    #[test]
    fn critical_hba1c_alert_drives_high_risk_category() {
        let extracted = ExtractedMedical {
            reports: vec![report(vec!["HbA1c 10.5%"], vec![])],
        };
        let mut applicant = applicant(52);
        applicant.gender = Gender::Female;
        let result = calculate(&applicant, &extracted);
        // 150 * age factor 1.4 = 210
        assert_eq!(result.total_loading_pct, dec!(210));
        assert_eq!(result.risk_category, RiskCategory::HighRisk);
        assert!(result
            .exclusions
            .iter()
            .any(|e| e.contains("Diabetes-related")));
    }

    #[test]
    fn total_loading_caps_at_300() {
        let extracted = ExtractedMedical {
            reports: vec![report(
                vec![
                    "HbA1c 11%",
                    "Blood pressure 190/120",
                    "Liver enzymes critical",
                    "Kidney function critical",
                    "Cardiac abnormality critical",
                ],
                vec![],
            )],
        };
        let result = calculate(&applicant(70), &extracted);
        assert!(result.total_loading_pct <= dec!(300));
    }

    #[test]
    fn bmi_boundary_obesity_is_inclusive_at_thirty() {
        let mut applicant = applicant(30);
        applicant.physical = Physical {
            height_cm: Some(dec!(170)),
            weight_kg: Some(dec!(86.7)), // bmi ~= 30.0
        };
        let extracted = ExtractedMedical {
            reports: vec![report(vec![], vec![])],
        };
        let result = calculate(&applicant, &extracted);
        assert!(result
            .loadings
            .iter()
            .any(|l| l.condition == "Moderate Obesity"));
    }
}
