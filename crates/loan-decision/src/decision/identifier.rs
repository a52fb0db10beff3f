use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Structural check applied to the applicant identifier before any scoring.
pub trait IdentifierValidator: Send + Sync {
    fn is_valid(&self, identifier: &str) -> bool;

    /// Birth date and gender encoded in the identifier, when the format carries them.
    fn demographics(&self, _identifier: &str) -> Option<Demographics> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demographics {
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersonalCodeError {
    #[error("personal code must have 11 digits (got {0} characters)")]
    Length(usize),
    #[error("personal code may only contain digits")]
    NonDigit,
    #[error("unknown century marker {0}")]
    CenturyMarker(u8),
    #[error("personal code does not encode a calendar date")]
    BirthDate,
    #[error("check digit {found} does not match computed {expected}")]
    Checksum { expected: u8, found: u8 },
}

const CODE_LENGTH: usize = 11;
const PRIMARY_WEIGHTS: [u8; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 1];
const SECONDARY_WEIGHTS: [u8; 10] = [3, 4, 5, 6, 7, 8, 9, 1, 2, 3];

/// Parsed Estonian personal identification code (`GYYMMDDSSSC`).
///
/// `G` encodes century and gender, `YYMMDD` the birth date, `SSS` a serial number
/// and `C` the modulo-11 check digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstonianPersonalCode {
    code: String,
    demographics: Demographics,
}

impl EstonianPersonalCode {
    pub fn parse(raw: &str) -> Result<Self, PersonalCodeError> {
        if raw.chars().count() != CODE_LENGTH {
            return Err(PersonalCodeError::Length(raw.chars().count()));
        }
        if !raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(PersonalCodeError::NonDigit);
        }

        let digits: Vec<u8> = raw.bytes().map(|byte| byte - b'0').collect();
        let marker = digits[0];
        let (century, gender) = match marker {
            1 | 2 => (1800, gender_for(marker)),
            3 | 4 => (1900, gender_for(marker)),
            5 | 6 => (2000, gender_for(marker)),
            7 | 8 => (2100, gender_for(marker)),
            other => return Err(PersonalCodeError::CenturyMarker(other)),
        };

        let number = |from: usize| i32::from(digits[from]) * 10 + i32::from(digits[from + 1]);
        let year = century + number(1);
        let month = number(3) as u32;
        let day = number(5) as u32;
        let date_of_birth =
            NaiveDate::from_ymd_opt(year, month, day).ok_or(PersonalCodeError::BirthDate)?;

        let expected = check_digit(&digits[..10]);
        let found = digits[10];
        if expected != found {
            return Err(PersonalCodeError::Checksum { expected, found });
        }

        Ok(Self {
            code: raw.to_string(),
            demographics: Demographics {
                date_of_birth,
                gender,
            },
        })
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.demographics.date_of_birth
    }

    pub fn gender(&self) -> Gender {
        self.demographics.gender
    }

    pub fn demographics(&self) -> Demographics {
        self.demographics
    }

    /// Completed years of age on `today`.
    pub fn age_on(&self, today: NaiveDate) -> i64 {
        super::policy::age_on(self.demographics.date_of_birth, today)
    }

    /// The last `digits` digits of the code read as a number.
    pub fn segment_key(&self, digits: u32) -> Option<u32> {
        let digits = usize::try_from(digits).ok().filter(|digits| *digits > 0)?;
        let start = self.code.len().checked_sub(digits)?;
        self.code.get(start..)?.parse().ok()
    }
}

fn gender_for(marker: u8) -> Gender {
    if marker % 2 == 1 {
        Gender::Male
    } else {
        Gender::Female
    }
}

fn weighted_remainder(digits: &[u8], weights: &[u8; 10]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(digit, weight)| u32::from(*digit) * u32::from(*weight))
        .sum();
    (sum % 11) as u8
}

fn check_digit(digits: &[u8]) -> u8 {
    match weighted_remainder(digits, &PRIMARY_WEIGHTS) {
        10 => match weighted_remainder(digits, &SECONDARY_WEIGHTS) {
            10 => 0,
            remainder => remainder,
        },
        remainder => remainder,
    }
}

/// Default validator accepting well-formed Estonian personal codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstonianPersonalCodeValidator;

impl IdentifierValidator for EstonianPersonalCodeValidator {
    fn is_valid(&self, identifier: &str) -> bool {
        EstonianPersonalCode::parse(identifier).is_ok()
    }

    fn demographics(&self, identifier: &str) -> Option<Demographics> {
        EstonianPersonalCode::parse(identifier)
            .ok()
            .map(|code| code.demographics())
    }
}
