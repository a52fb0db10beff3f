mod segments;

pub use segments::{CreditModifier, Segment, SegmentTable};

use super::identifier::{Demographics, Gender};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Static lending rules shared by every evaluation. Loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingPolicy {
    pub bounds: LoanBounds,
    pub segments: SegmentTable,
    #[serde(default)]
    pub age_limits: Option<AgeLimits>,
}

impl LendingPolicy {
    /// Bounds of 2000..=10000 over 12..=60 months with the four-bucket segment table.
    pub fn standard() -> Self {
        Self {
            bounds: LoanBounds::standard(),
            segments: SegmentTable::standard(),
            age_limits: None,
        }
    }

    pub fn with_age_limits(mut self, limits: AgeLimits) -> Self {
        self.age_limits = Some(limits);
        self
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        self.bounds.validate()?;
        self.segments.validate()?;
        if let Some(limits) = &self.age_limits {
            limits.validate()?;
        }
        Ok(())
    }
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Inclusive amount and period ranges a request must fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanBounds {
    pub min_amount: i64,
    pub max_amount: i64,
    pub min_period: i32,
    pub max_period: i32,
}

impl LoanBounds {
    pub fn standard() -> Self {
        Self {
            min_amount: 2_000,
            max_amount: 10_000,
            min_period: 12,
            max_period: 60,
        }
    }

    pub fn contains_amount(&self, amount: i64) -> bool {
        (self.min_amount..=self.max_amount).contains(&amount)
    }

    pub fn contains_period(&self, period: i32) -> bool {
        (self.min_period..=self.max_period).contains(&period)
    }

    /// Largest amount the modifier allows over `period`, capped at `max_amount`.
    pub fn max_approvable(&self, modifier: CreditModifier, period: i32) -> i64 {
        modifier.limit_for(period).min(self.max_amount)
    }

    fn validate(&self) -> Result<(), PolicyError> {
        if self.min_amount <= 0 || self.min_amount > self.max_amount {
            return Err(PolicyError::AmountBounds {
                min: self.min_amount,
                max: self.max_amount,
            });
        }
        if self.min_period <= 0 || self.min_period > self.max_period {
            return Err(PolicyError::PeriodBounds {
                min: self.min_period,
                max: self.max_period,
            });
        }
        Ok(())
    }
}

impl Default for LoanBounds {
    fn default() -> Self {
        Self::standard()
    }
}

/// Age window an applicant must satisfy over the whole repayment horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeLimits {
    pub minimum_age: u32,
    pub maximum_age_male: u32,
    pub maximum_age_female: u32,
    /// Months past today the applicant must stay under the maximum age.
    pub horizon_months: u32,
}

impl AgeLimits {
    pub fn standard() -> Self {
        Self {
            minimum_age: 18,
            maximum_age_male: 74,
            maximum_age_female: 82,
            horizon_months: 60,
        }
    }

    pub fn maximum_age(&self, gender: Gender) -> u32 {
        match gender {
            Gender::Male => self.maximum_age_male,
            Gender::Female => self.maximum_age_female,
        }
    }

    pub fn permits(&self, demographics: &Demographics, today: NaiveDate) -> bool {
        if age_on(demographics.date_of_birth, today) < i64::from(self.minimum_age) {
            return false;
        }

        let maximum = self.maximum_age(demographics.gender);
        let age_limit_reached = demographics
            .date_of_birth
            .checked_add_months(Months::new(maximum.saturating_mul(12)));
        let horizon_end = today.checked_add_months(Months::new(self.horizon_months));

        match (age_limit_reached, horizon_end) {
            (Some(limit), Some(end)) => limit >= end,
            _ => false,
        }
    }

    fn validate(&self) -> Result<(), PolicyError> {
        let youngest_maximum = self.maximum_age_male.min(self.maximum_age_female);
        if self.minimum_age >= youngest_maximum {
            return Err(PolicyError::AgeLimits {
                minimum: self.minimum_age,
                maximum: youngest_maximum,
            });
        }
        Ok(())
    }
}

/// Whole years between `date_of_birth` and `today`; negative for dates in the future.
pub(crate) fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i64 {
    let mut years = i64::from(today.year()) - i64::from(date_of_birth.year());
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    years
}

/// Reasons a lending policy is refused at load time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("amount bounds must satisfy 0 < min <= max (got {min}..={max})")]
    AmountBounds { min: i64, max: i64 },
    #[error("period bounds must satisfy 0 < min <= max (got {min}..={max})")]
    PeriodBounds { min: i32, max: i32 },
    #[error("segment key must use 1 to 9 digits (got {0})")]
    KeyDigits(u32),
    #[error("segment table is empty")]
    EmptySegmentTable,
    #[error("segment '{name}' has an empty range")]
    EmptySegment { name: String },
    #[error("segment '{name}' has a negative credit modifier")]
    NegativeModifier { name: String },
    #[error("segment '{name}' starts at {found}, expected {expected}")]
    SegmentGap {
        name: String,
        expected: u32,
        found: u32,
    },
    #[error("segment '{name}' overlaps the previous segment at {found}")]
    SegmentOverlap { name: String, found: u32 },
    #[error("segments cover keys up to {covered}, expected {key_space}")]
    IncompleteCoverage { covered: u32, key_space: u32 },
    #[error("minimum age {minimum} must be below maximum age {maximum}")]
    AgeLimits { minimum: u32, maximum: u32 },
}
