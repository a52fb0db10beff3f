//! Property checks for the decision engine through its public API.
//!
//! Applicants are placed into segments through a validator that accepts any identifier,
//! so each case controls the credit modifier directly via a single-segment table.

use std::sync::Arc;

use chrono::NaiveDate;
use loan_decision::decision::{
    best_offer, CreditModifier, DecisionEngine, DecisionError, DecisionRequest,
    IdentifierValidator, LendingPolicy, LoanBounds, Segment, SegmentTable,
};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
struct AcceptAll;

impl IdentifierValidator for AcceptAll {
    fn is_valid(&self, _identifier: &str) -> bool {
        true
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

fn engine_for(modifier: i64) -> DecisionEngine<AcceptAll> {
    let policy = LendingPolicy {
        bounds: LoanBounds::standard(),
        segments: SegmentTable {
            key_digits: 1,
            segments: vec![Segment::new("flat", 0, 10, modifier)],
        },
        age_limits: None,
    };
    policy.validate().expect("generated policy is valid");
    DecisionEngine::with_validator(Arc::new(policy), AcceptAll)
}

fn scenario(modifier: i64, amount: i64, period: i32) -> Result<(i64, i32), DecisionError> {
    engine_for(modifier)
        .evaluate_on(&DecisionRequest::new("applicant-0", amount, period), today())
        .map(|decision| (decision.loan_amount, decision.loan_period))
}

#[test]
fn documented_scenarios() {
    assert_eq!(scenario(1000, 4000, 12), Ok((10_000, 12)));
    assert_eq!(scenario(100, 4000, 12), Ok((2000, 20)));
    assert_eq!(scenario(0, 4000, 12), Err(DecisionError::NoValidLoan));
    assert_eq!(scenario(300, 1999, 12), Err(DecisionError::InvalidAmount));
    assert_eq!(scenario(300, 9000, 12), Ok((3600, 12)));
}

proptest! {
    #[test]
    fn approvals_stay_within_bounds(
        modifier in 1i64..2_000,
        amount in 2_000i64..=10_000,
        period in 12i32..=60,
    ) {
        let bounds = LoanBounds::standard();
        if let Ok((approved_amount, approved_period)) = scenario(modifier, amount, period) {
            prop_assert!(bounds.contains_amount(approved_amount));
            prop_assert!(approved_period >= period);
            prop_assert!(approved_period <= bounds.max_period);
            prop_assert!(approved_amount <= modifier * i64::from(approved_period));
        }
    }

    #[test]
    fn limit_never_shrinks_with_longer_periods(
        modifier in 0i64..2_000,
        period in 12i32..60,
    ) {
        let bounds = LoanBounds::standard();
        let modifier = CreditModifier(modifier);
        prop_assert!(
            bounds.max_approvable(modifier, period) <= bounds.max_approvable(modifier, period + 1)
        );
    }

    #[test]
    fn longer_request_never_lowers_the_offer(
        modifier in 1i64..2_000,
        period in 12i32..60,
    ) {
        let bounds = LoanBounds::standard();
        let modifier = CreditModifier(modifier);
        let shorter = best_offer(&bounds, modifier, period).map(|offer| offer.loan_amount);
        let longer = best_offer(&bounds, modifier, period + 1).map(|offer| offer.loan_amount);
        if let (Some(shorter), Some(longer)) = (shorter, longer) {
            prop_assert!(longer >= shorter);
        }
    }

    #[test]
    fn offered_period_is_the_shortest_feasible_one(
        modifier in 1i64..2_000,
        period in 12i32..=60,
    ) {
        let bounds = LoanBounds::standard();
        let modifier = CreditModifier(modifier);
        let closed_form = {
            let needed = (bounds.min_amount + modifier.0 - 1) / modifier.0;
            let needed = i32::try_from(needed).unwrap_or(i32::MAX).max(period);
            (needed <= bounds.max_period).then_some(needed)
        };
        prop_assert_eq!(
            best_offer(&bounds, modifier, period).map(|offer| offer.loan_period),
            closed_form
        );
    }

    #[test]
    fn debt_segment_never_gets_a_loan(
        amount in 2_000i64..=10_000,
        period in 12i32..=60,
    ) {
        prop_assert_eq!(scenario(0, amount, period), Err(DecisionError::NoValidLoan));
    }

    #[test]
    fn evaluation_is_deterministic(
        modifier in 0i64..2_000,
        amount in 0i64..12_000,
        period in 0i32..70,
    ) {
        prop_assert_eq!(scenario(modifier, amount, period), scenario(modifier, amount, period));
    }
}
