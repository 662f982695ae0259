//! Custom Test Assertions
//!
//! Specialized assertion helpers for `Money` values and for the
//! underwriting domain's quantified invariants (`spec.md` §8).

use agent_runtime::WorkflowEvent;
use core_kernel::{Currency, Money};
use domain_underwriting::{LoadingResult, UnderwritingDecision, UnderwritingReport};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Asserts that two `Money` values are approximately equal within a
/// tolerance.
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

pub fn assert_money_positive(money: &Money) {
    assert!(
        money.is_positive(),
        "Expected positive money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that a decimal value is approximately equal to another.
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Decimals differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// `spec.md` §8: `LoadingResult.total ∈ [0, 300]`.
pub fn assert_loading_total_in_range(loading: &LoadingResult) {
    assert!(
        loading.total_loading_pct >= Decimal::ZERO && loading.total_loading_pct <= dec!(300),
        "total_loading_pct {} out of the [0, 300] range",
        loading.total_loading_pct
    );
}

/// `spec.md` §8: `MedicalFindings.risk_score`/`RiskAssessment.*_risk ∈ [0, 1]`.
pub fn assert_unit_interval(value: Decimal, label: &str) {
    assert!(
        value >= Decimal::ZERO && value <= Decimal::ONE,
        "{label} {value} out of the [0, 1] unit interval"
    );
}

/// `spec.md` §8: "For all `DECLINED` decisions, the returned premium
/// list is empty."
pub fn assert_declined_report_has_no_premiums(report: &UnderwritingReport) {
    if report.final_decision == UnderwritingDecision::Declined {
        assert!(
            report.premiums.is_empty(),
            "declined report unexpectedly carries {} premium line(s)",
            report.premiums.len()
        );
    }
}

/// `spec.md` §8: "For every `PremiumCalculation` where coverType ==
/// 'Accidental Death Benefit', `finalPremium == basePremium` and
/// `totalLoadingPct == 0`."
pub fn assert_accidental_death_benefit_is_unloaded(report: &UnderwritingReport) {
    for premium in &report.premiums {
        if premium.cover_type == domain_underwriting::CoverType::AccidentalDeathBenefit {
            assert_eq!(premium.total_loading_pct, Decimal::ZERO);
            assert_eq!(premium.final_premium.amount(), premium.base_premium.amount());
        }
    }
}

/// `spec.md` §8: "For all events emitted by one workflow, `event_id`
/// counters are strictly increasing and timestamps are non-decreasing."
pub fn assert_events_strictly_increasing(events: &[WorkflowEvent]) {
    for pair in events.windows(2) {
        assert!(
            pair[0].event_id < pair[1].event_id,
            "event_id did not strictly increase: {} then {}",
            pair[0].event_id,
            pair[1].event_id
        );
        assert!(
            pair[0].timestamp <= pair[1].timestamp,
            "timestamp went backwards: {} then {}",
            pair[0].timestamp,
            pair[1].timestamp
        );
    }
}

/// `spec.md` §8: "the number of COMPLETED events whose agent_name ∈
/// {...} equals 8 on success."
pub fn assert_eight_completed_pipeline_events(events: &[WorkflowEvent]) {
    use agent_runtime::AgentStatus;
    const PIPELINE_AGENTS: [&str; 8] = [
        "MedicalAnalyzer",
        "RiskAssessmentML",
        "MedicalReviewer",
        "FraudDetector",
        "RiskAssessor",
        "PremiumCalculator",
        "DecisionMaker",
        "ReportGenerator",
    ];
    let completed: std::collections::HashSet<&str> = events
        .iter()
        .filter(|e| e.status == AgentStatus::Completed && PIPELINE_AGENTS.contains(&e.agent_name.as_str()))
        .map(|e| e.agent_name.as_str())
        .collect();
    assert_eq!(
        completed.len(),
        8,
        "expected 8 distinct completed pipeline agents, got {completed:?}"
    );
}

/// Asserts that a result is Ok and returns the value.
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that a result is Err and returns the error.
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => panic!("{}: got Ok({:?})", $msg, value),
            Err(e) => e,
        }
    };
}
