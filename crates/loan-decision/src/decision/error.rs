/// Every way an evaluation can end without an approval.
///
/// The first four variants are caller-input failures reported before any scoring happens.
/// `NoValidLoan` is a scoring outcome: the applicant is in the debt segment or no period
/// within the policy bounds produces an amount at or above the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    #[error("Invalid personal ID code!")]
    InvalidIdentifier,
    #[error("Invalid loan amount!")]
    InvalidAmount,
    #[error("Invalid loan period!")]
    InvalidPeriod,
    #[error("Customer age is outside the lending range!")]
    InvalidAge,
    #[error("No valid loan found!")]
    NoValidLoan,
}

impl DecisionError {
    /// True for failures caused by the request itself rather than the scoring outcome.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, DecisionError::NoValidLoan)
    }
}
