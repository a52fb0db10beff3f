use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use super::domain::{Decision, DecisionRequest};
use super::error::DecisionError;
use super::identifier::{EstonianPersonalCodeValidator, IdentifierValidator};
use super::policy::{CreditModifier, LendingPolicy, LoanBounds, PolicyError};

/// Stateless evaluator applying a [`LendingPolicy`] to loan requests.
///
/// Holds only immutable data, so one engine can be shared across any number of callers.
#[derive(Debug, Clone)]
pub struct DecisionEngine<V = EstonianPersonalCodeValidator> {
    policy: Arc<LendingPolicy>,
    validator: V,
}

impl DecisionEngine {
    /// Engine over an already validated policy. Segment lookup assumes the table is
    /// sorted and contiguous; use [`DecisionEngine::try_new`] for untrusted policies.
    pub fn new(policy: Arc<LendingPolicy>) -> Self {
        Self::with_validator(policy, EstonianPersonalCodeValidator)
    }

    pub fn try_new(policy: Arc<LendingPolicy>) -> Result<Self, PolicyError> {
        Self::try_with_validator(policy, EstonianPersonalCodeValidator)
    }
}

impl<V> DecisionEngine<V>
where
    V: IdentifierValidator,
{
    /// Same precondition as [`DecisionEngine::new`]: the policy must already be valid.
    pub fn with_validator(policy: Arc<LendingPolicy>, validator: V) -> Self {
        Self { policy, validator }
    }

    /// Validate the policy before building the engine.
    pub fn try_with_validator(
        policy: Arc<LendingPolicy>,
        validator: V,
    ) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self::with_validator(policy, validator))
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    /// Evaluate a request against today's date.
    pub fn evaluate(&self, request: &DecisionRequest) -> Result<Decision, DecisionError> {
        self.evaluate_on(request, Local::now().date_naive())
    }

    /// Evaluate a request. `today` is only consulted when the policy carries age limits.
    pub fn evaluate_on(
        &self,
        request: &DecisionRequest,
        today: NaiveDate,
    ) -> Result<Decision, DecisionError> {
        self.verify_inputs(request, today)?;

        let modifier = self.credit_modifier(&request.personal_code);
        if modifier.is_debt() {
            info!(
                amount = request.loan_amount,
                period = request.loan_period,
                "applicant is in the debt segment"
            );
            return Err(DecisionError::NoValidLoan);
        }

        match best_offer(&self.policy.bounds, modifier, request.loan_period) {
            Some(decision) => {
                info!(
                    requested_amount = request.loan_amount,
                    requested_period = request.loan_period,
                    approved_amount = decision.loan_amount,
                    approved_period = decision.loan_period,
                    "loan approved"
                );
                Ok(decision)
            }
            None => {
                info!(
                    modifier = modifier.0,
                    requested_period = request.loan_period,
                    "no period within bounds reaches the minimum amount"
                );
                Err(DecisionError::NoValidLoan)
            }
        }
    }

    /// Modifier of the segment the identifier falls into. Unreadable keys score as debt.
    pub fn credit_modifier(&self, identifier: &str) -> CreditModifier {
        match self.policy.segments.segment_for(identifier) {
            Some(segment) => {
                debug!(segment = %segment.name, modifier = segment.credit_modifier.0, "segment resolved");
                segment.credit_modifier
            }
            None => {
                warn!("identifier carries no segment key");
                CreditModifier::DEBT
            }
        }
    }

    fn verify_inputs(
        &self,
        request: &DecisionRequest,
        today: NaiveDate,
    ) -> Result<(), DecisionError> {
        let bounds = &self.policy.bounds;

        if !self.validator.is_valid(&request.personal_code) {
            warn!("rejected request with malformed personal code");
            return Err(DecisionError::InvalidIdentifier);
        }
        if !bounds.contains_amount(request.loan_amount) {
            warn!(amount = request.loan_amount, "requested amount out of bounds");
            return Err(DecisionError::InvalidAmount);
        }
        if !bounds.contains_period(request.loan_period) {
            warn!(period = request.loan_period, "requested period out of bounds");
            return Err(DecisionError::InvalidPeriod);
        }

        if let Some(limits) = &self.policy.age_limits {
            if let Some(demographics) = self.validator.demographics(&request.personal_code) {
                if !limits.permits(&demographics, today) {
                    warn!("applicant age outside lending range");
                    return Err(DecisionError::InvalidAge);
                }
            }
        }

        Ok(())
    }
}

/// First period from `requested_period` up to `bounds.max_period` whose capped limit
/// reaches `bounds.min_amount`, paired with that limit.
///
/// The limit grows with the period for any positive modifier, so the first hit is also
/// the shortest feasible period. At the requested period itself the result is the
/// largest approvable amount even when it is below what was asked for.
pub fn best_offer(
    bounds: &LoanBounds,
    modifier: CreditModifier,
    requested_period: i32,
) -> Option<Decision> {
    (requested_period..=bounds.max_period).find_map(|period| {
        let amount = bounds.max_approvable(modifier, period);
        (amount >= bounds.min_amount).then_some(Decision {
            loan_amount: amount,
            loan_period: period,
        })
    })
}
