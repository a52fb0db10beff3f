//! Loan eligibility evaluation.
//!
//! A request carries a personal code, an amount, and a period. The engine validates the
//! request against the [`LendingPolicy`] bounds, scores the applicant by the credit segment
//! keyed on the trailing digits of their personal code, and then approves the largest amount
//! available for the requested period. When that amount would fall below the policy minimum
//! the engine walks forward through longer periods until one yields an approvable loan.

pub mod domain;
pub mod engine;
mod error;
pub mod identifier;
pub mod policy;
pub mod router;

#[cfg(test)]
mod tests;

pub use domain::{Decision, DecisionRequest, DecisionResponse};
pub use engine::{best_offer, DecisionEngine};
pub use error::DecisionError;
pub use identifier::{
    Demographics, EstonianPersonalCode, EstonianPersonalCodeValidator, Gender,
    IdentifierValidator, PersonalCodeError,
};
pub use policy::{
    AgeLimits, CreditModifier, LendingPolicy, LoanBounds, PolicyError, Segment, SegmentTable,
};
pub use router::decision_router;
