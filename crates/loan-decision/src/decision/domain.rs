use serde::{Deserialize, Serialize};

/// Loan application as received from the transport boundary.
///
/// Amount and period are signed so that out-of-range values reach the bounds check
/// instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    #[serde(alias = "identifier")]
    pub personal_code: String,
    #[serde(alias = "amount")]
    pub loan_amount: i64,
    #[serde(alias = "period")]
    pub loan_period: i32,
}

impl DecisionRequest {
    pub fn new(personal_code: impl Into<String>, loan_amount: i64, loan_period: i32) -> Self {
        Self {
            personal_code: personal_code.into(),
            loan_amount,
            loan_period,
        }
    }
}

/// Approved loan offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub loan_amount: i64,
    pub loan_period: i32,
}

/// Wire body returned by `POST /loan/decision`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    pub loan_amount: Option<i64>,
    pub loan_period: Option<i32>,
    pub error_message: Option<String>,
}

impl DecisionResponse {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            loan_amount: None,
            loan_period: None,
            error_message: Some(message.into()),
        }
    }
}

impl From<Decision> for DecisionResponse {
    fn from(decision: Decision) -> Self {
        Self {
            loan_amount: Some(decision.loan_amount),
            loan_period: Some(decision.loan_period),
            error_message: None,
        }
    }
}
