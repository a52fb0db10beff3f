use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::decision::identifier::IdentifierValidator;
use crate::decision::{DecisionEngine, DecisionRequest, LendingPolicy};

pub(super) const DEBTOR_CODE: &str = "37605030299";
pub(super) const SEGMENT_1_CODE: &str = "50307172740";
pub(super) const SEGMENT_2_CODE: &str = "38411266610";
pub(super) const SEGMENT_3_CODE: &str = "35006069515";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn engine() -> DecisionEngine {
    DecisionEngine::new(Arc::new(LendingPolicy::standard()))
}

pub(super) fn engine_with(policy: LendingPolicy) -> DecisionEngine {
    DecisionEngine::new(Arc::new(policy))
}

pub(super) fn request(code: &str, amount: i64, period: i32) -> DecisionRequest {
    DecisionRequest::new(code, amount, period)
}

/// Accepts any identifier so tests can place an applicant in a segment by key alone.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct AnyIdentifier;

impl IdentifierValidator for AnyIdentifier {
    fn is_valid(&self, _identifier: &str) -> bool {
        true
    }
}

pub(super) fn permissive_engine() -> DecisionEngine<AnyIdentifier> {
    DecisionEngine::with_validator(Arc::new(LendingPolicy::standard()), AnyIdentifier)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("body readable");
    serde_json::from_slice(&body).expect("body is json")
}
