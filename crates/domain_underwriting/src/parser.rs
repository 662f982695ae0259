//! Response Parser (`spec.md` §4.E).
//!
//! Recovers structured figures and a decision from the free-text the
//! Agent Runner returns. Never fails: an absent pattern match degrades
//! to a documented default rather than propagating an error (§7
//! `ParseDegraded`).

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::types::{DecisionDetails, ParsedPremiumInfo, UnderwritingDecision};

static TOTAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)=\s*₹([\d,]+)\s*$").unwrap(),
        Regex::new(r"(?i)\*\*=\s*₹([\d,]+)\*\*").unwrap(),
        Regex::new(r"(?i)Total Annual Premium.*?₹([\d,]+)").unwrap(),
        Regex::new(r"(?i)\*\*TOTAL\*\*.*?₹([\d,]+)").unwrap(),
        Regex::new(r"(?i)₹([\d,]+)\s*per annum").unwrap(),
        Regex::new(r"(?i)TOTAL.*?₹([\d,]+)").unwrap(),
    ]
});

static LOADING_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)%\s*loading").unwrap());

/// `parsePremium(text) -> {total, loadingPct}` (`spec.md` §4.E).
pub fn parse_premium(text: &str) -> ParsedPremiumInfo {
    let mut info = ParsedPremiumInfo::default();
    if text.is_empty() {
        return info;
    }

    for pattern in TOTAL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let digits: String = caps[1].chars().filter(|c| *c != ',').collect();
            if let Ok(value) = digits.parse::<Decimal>() {
                info.total = value;
                break;
            }
        }
    }

    let max_loading = LOADING_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<i64>().ok())
        .max();
    if let Some(pct) = max_loading {
        info.loading_pct = Decimal::from(pct);
    }

    info
}

/// `parseDecision(text, premiumInfo) -> (Decision, DecisionDetails)` (`spec.md` §4.E).
pub fn parse_decision(text: &str, premium_info: &ParsedPremiumInfo) -> DecisionDetails {
    let upper = text.to_uppercase();

    let (decision, processing_time_days) = if ["APPROVED WITH CONDITIONS", "APPROVED WITH", "APPROVED", "ACCEPT", "COVERAGE GRANTED"]
        .iter()
        .any(|p| upper.contains(p))
    {
        if ["CONDITIONS", "EXCLUSIONS", "ADDITIONAL REQUIREMENTS"]
            .iter()
            .any(|p| upper.contains(p))
        {
            let days = if text.contains("7–14") || text.contains("7-14") {
                10
            } else {
                7
            };
            (UnderwritingDecision::AdditionalRequirements, days)
        } else if ["MANUAL REVIEW", "MODERATE PREMIUM LOADING"]
            .iter()
            .any(|p| upper.contains(p))
        {
            (UnderwritingDecision::ManualReview, 3)
        } else {
            (UnderwritingDecision::AutoApproved, 1)
        }
    } else if ["MANUAL REVIEW", "MANUAL_REVIEW", "REQUIRES MANUAL", "MANUAL UNDERWRITING"]
        .iter()
        .any(|p| upper.contains(p))
    {
        (UnderwritingDecision::ManualReview, 3)
    } else if ["ADDITIONAL REQUIREMENTS", "MORE INFORMATION", "FURTHER TESTING"]
        .iter()
        .any(|p| upper.contains(p))
    {
        (UnderwritingDecision::AdditionalRequirements, 7)
    } else if ["DECLINE", "DECLINED", "REJECT", "UNACCEPTABLE", "DENY"]
        .iter()
        .any(|p| upper.contains(p))
    {
        (UnderwritingDecision::Declined, 2)
    } else {
        (UnderwritingDecision::ManualReview, 3)
    };

    let mut exclusions = Vec::new();
    let lower = text.to_lowercase();
    if lower.contains("diabetes") && lower.contains("exclusion") {
        exclusions.push("Diabetes-related complications exclusion for Critical Illness".to_string());
    }

    DecisionDetails {
        decision,
        processing_time_days,
        total_premium: premium_info.total,
        medical_loading_pct: Some(premium_info.loading_pct),
        conditions: Vec::new(),
        exclusions,
        reasoning: None,
    }
}

const REASONING_KEYWORDS: [&str; 4] = ["DECISION", "RECOMMENDATION", "CONCLUSION", "RATIONALE"];

/// Builds the human-readable reasoning list from the decision-maker
/// transcript, falling back to a templated summary when the text
/// carries no recognizable reasoning lines.
pub fn build_reasoning(
    decision_text: &str,
    decision: UnderwritingDecision,
    decision_details: &DecisionDetails,
    abnormal_count: usize,
    critical_count: usize,
) -> Vec<String> {
    let key_points: Vec<String> = decision_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let upper = line.to_uppercase();
            REASONING_KEYWORDS.iter().any(|kw| upper.contains(kw))
        })
        .take(2)
        .map(String::from)
        .collect();

    if !key_points.is_empty() {
        return key_points;
    }

    let decision_label = match decision {
        UnderwritingDecision::AutoApproved => "Auto Approved",
        UnderwritingDecision::ManualReview => "Manual Review",
        UnderwritingDecision::AdditionalRequirements => "Additional Requirements",
        UnderwritingDecision::Declined => "Declined",
    };

    let mut reasoning = vec![
        format!("Decision: {decision_label} (from Agent Analysis)"),
        format!(
            "Medical Findings: {abnormal_count} abnormal, {critical_count} critical"
        ),
        format!("Processing: {} days", decision_details.processing_time_days),
    ];

    if decision_details.total_premium > Decimal::ZERO {
        reasoning.push(format!(
            "Total Premium: {} (from Agent Calculation)",
            decision_details.total_premium
        ));
    }

    reasoning
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_bold_final_total() {
        let text = "Premium breakdown\n**= ₹16,770**\n35% loading applied";
        let info = parse_premium(text);
        assert_eq!(info.total, dec!(16770));
        assert_eq!(info.loading_pct, dec!(35));
    }

    #[test]
    fn absent_pattern_degrades_to_zero() {
        let info = parse_premium("no recognizable figures here");
        assert_eq!(info.total, Decimal::ZERO);
        assert_eq!(info.loading_pct, Decimal::ZERO);
    }

    #[test]
    fn loading_percentage_takes_the_maximum_match() {
        let text = "Base 20% loading, revised to 45% loading after review";
        let info = parse_premium(text);
        assert_eq!(info.loading_pct, dec!(45));
    }

    #[test]
    fn approved_with_conditions_maps_to_additional_requirements() {
        let details = parse_decision(
            "APPROVED WITH CONDITIONS: additional requirements apply",
            &ParsedPremiumInfo::default(),
        );
        assert_eq!(details.decision, UnderwritingDecision::AdditionalRequirements);
        assert_eq!(details.processing_time_days, 7);
    }

    #[test]
    fn seven_to_fourteen_day_range_pins_to_ten() {
        let details = parse_decision(
            "APPROVED WITH CONDITIONS, processing in 7-14 days",
            &ParsedPremiumInfo::default(),
        );
        assert_eq!(details.processing_time_days, 10);
    }

    #[test]
    fn bare_approved_maps_to_auto_approved() {
        let details = parse_decision("APPROVED for standard coverage", &ParsedPremiumInfo::default());
        assert_eq!(details.decision, UnderwritingDecision::AutoApproved);
        assert_eq!(details.processing_time_days, 1);
    }

    #[test]
    fn decline_keyword_maps_to_declined() {
        let details = parse_decision("This application is DECLINED", &ParsedPremiumInfo::default());
        assert_eq!(details.decision, UnderwritingDecision::Declined);
    }

    #[test]
    fn unrecognized_text_defaults_to_manual_review() {
        let details = parse_decision("Nothing recognizable here", &ParsedPremiumInfo::default());
        assert_eq!(details.decision, UnderwritingDecision::ManualReview);
    }

    #[test]
    fn diabetes_and_exclusion_keywords_infer_exclusion() {
        let details = parse_decision(
            "APPROVED WITH CONDITIONS. diabetes exclusion applies to critical illness cover",
            &ParsedPremiumInfo::default(),
        );
        assert!(details
            .exclusions
            .iter()
            .any(|e| e.contains("Diabetes-related")));
    }

    #[test]
    fn build_reasoning_extracts_key_lines() {
        let text = "Some preamble\nDECISION: approved with standard terms\nRECOMMENDATION: proceed\nfooter";
        let details = parse_decision(text, &ParsedPremiumInfo::default());
        let reasoning = build_reasoning(text, details.decision, &details, 0, 0);
        assert_eq!(reasoning.len(), 2);
    }

    #[test]
    fn build_reasoning_falls_back_to_template() {
        let details = parse_decision("no keywords", &ParsedPremiumInfo::default());
        let reasoning = build_reasoning("no keywords", details.decision, &details, 2, 1);
        assert!(reasoning[0].starts_with("Decision:"));
    }
}
