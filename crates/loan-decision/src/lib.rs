//! Loan decision engine.
//!
//! Scores an applicant by the credit segment derived from their personal code and
//! returns either the largest approvable loan for the requested period or the
//! nearest longer period that yields an approvable loan.

pub mod config;
pub mod decision;
pub mod error;
pub mod telemetry;

pub use decision::{
    decision_router, Decision, DecisionEngine, DecisionError, DecisionRequest, DecisionResponse,
    LendingPolicy,
};
