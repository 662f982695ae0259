//! Property-Based Test Generators
//!
//! `proptest` strategies for generating random `Applicant` data that
//! maintains the domain's invariants (`spec.md` §8 "For all inputs").

use domain_underwriting::{Applicant, CoverRequest, CoverType, Gender, Lifestyle, Physical};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for a plausible applicant age (18-80, matching the HTTP
/// boundary's validation).
pub fn age_strategy() -> impl Strategy<Value = u32> {
    18u32..=80u32
}

pub fn gender_strategy() -> impl Strategy<Value = Gender> {
    prop_oneof![
        Just(Gender::Male),
        Just(Gender::Female),
        Just(Gender::Other),
    ]
}

pub fn cover_type_strategy() -> impl Strategy<Value = CoverType> {
    prop_oneof![
        Just(CoverType::TermLifeInsurance),
        Just(CoverType::CriticalIllness),
        Just(CoverType::AccidentalDeathBenefit),
        Just(CoverType::DisabilityIncome),
    ]
}

/// Strategy for a positive sum-assured value in whole currency units.
pub fn sum_assured_strategy() -> impl Strategy<Value = Decimal> {
    (100_000i64..50_000_000i64).prop_map(Decimal::from)
}

pub fn term_strategy() -> impl Strategy<Value = u32> {
    5u32..=30u32
}

pub fn cover_request_strategy() -> impl Strategy<Value = CoverRequest> {
    (cover_type_strategy(), sum_assured_strategy(), term_strategy()).prop_map(
        |(cover_type, sum_assured, term)| CoverRequest {
            cover_type,
            sum_assured,
            term,
        },
    )
}

pub fn lifestyle_strategy() -> impl Strategy<Value = Lifestyle> {
    (any::<bool>(), 0u32..40u32, 0u32..30u32).prop_map(|(smoker, cigarettes, alcohol)| Lifestyle {
        smoker,
        cigarettes_per_day: if smoker { Some(cigarettes) } else { None },
        alcohol_units_per_week: Some(alcohol),
        exercise_frequency: None,
    })
}

/// Strategy for height/weight pairs spanning underweight to severely
/// obese BMI bands.
pub fn physical_strategy() -> impl Strategy<Value = Physical> {
    (140i64..210i64, 40i64..180i64).prop_map(|(height, weight)| Physical {
        height_cm: Some(Decimal::from(height)),
        weight_kg: Some(Decimal::from(weight)),
    })
}

/// Strategy for a fully-formed, internally-consistent `Applicant`.
pub fn applicant_strategy() -> impl Strategy<Value = Applicant> {
    (
        age_strategy(),
        gender_strategy(),
        proptest::collection::vec(cover_request_strategy(), 1..=3),
        lifestyle_strategy(),
        physical_strategy(),
    )
        .prop_map(|(age, gender, covers_requested, lifestyle, physical)| Applicant {
            application_id: format!("APP-PROPTEST-{age}-{:?}", gender).into(),
            name: "Proptest Applicant".to_string(),
            age,
            gender,
            occupation: Some("Unspecified".to_string()),
            annual_income: Some(Decimal::from(500_000)),
            covers_requested,
            lifestyle,
            physical,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_applicants_have_at_least_one_cover(applicant in applicant_strategy()) {
            prop_assert!(!applicant.covers_requested.is_empty());
        }

        #[test]
        fn generated_ages_stay_within_the_validated_band(applicant in applicant_strategy()) {
            prop_assert!((18..=80).contains(&applicant.age));
        }
    }
}
