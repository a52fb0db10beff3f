use super::PolicyError;
use serde::{Deserialize, Serialize};

/// Per-segment multiplier in the approvable amount formula. Zero marks the debt segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditModifier(pub i64);

impl CreditModifier {
    pub const DEBT: Self = Self(0);

    pub fn is_debt(self) -> bool {
        self.0 == 0
    }

    /// `modifier * period`, before any policy cap.
    pub fn limit_for(self, period: i32) -> i64 {
        self.0.saturating_mul(i64::from(period))
    }
}

/// Half-open key range `[lower_inclusive, upper_exclusive)` sharing one modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub lower_inclusive: u32,
    pub upper_exclusive: u32,
    pub credit_modifier: CreditModifier,
}

impl Segment {
    pub fn new(
        name: impl Into<String>,
        lower_inclusive: u32,
        upper_exclusive: u32,
        credit_modifier: i64,
    ) -> Self {
        Self {
            name: name.into(),
            lower_inclusive,
            upper_exclusive,
            credit_modifier: CreditModifier(credit_modifier),
        }
    }

    pub fn contains(&self, key: u32) -> bool {
        (self.lower_inclusive..self.upper_exclusive).contains(&key)
    }
}

/// Ordered, contiguous segments covering every key of `key_digits` digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentTable {
    pub key_digits: u32,
    pub segments: Vec<Segment>,
}

impl SegmentTable {
    pub fn standard() -> Self {
        Self {
            key_digits: 4,
            segments: vec![
                Segment::new("debt", 0, 2_500, 0),
                Segment::new("segment-1", 2_500, 5_000, 100),
                Segment::new("segment-2", 5_000, 7_500, 300),
                Segment::new("segment-3", 7_500, 10_000, 1_000),
            ],
        }
    }

    pub fn key_space(&self) -> u32 {
        10u32.saturating_pow(self.key_digits)
    }

    /// Numeric key read from the trailing `key_digits` characters of the identifier.
    pub fn segment_key(&self, identifier: &str) -> Option<u32> {
        let digits = usize::try_from(self.key_digits).ok()?;
        let start = identifier.len().checked_sub(digits)?;
        let tail = identifier.get(start..)?;
        if tail.is_empty() || !tail.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        tail.parse().ok()
    }

    pub fn lookup(&self, key: u32) -> Option<&Segment> {
        let index = self
            .segments
            .partition_point(|segment| segment.upper_exclusive <= key);
        self.segments
            .get(index)
            .filter(|segment| segment.contains(key))
    }

    /// Segment owning the identifier, or `None` when no key can be read from it.
    pub fn segment_for(&self, identifier: &str) -> Option<&Segment> {
        self.segment_key(identifier).and_then(|key| self.lookup(key))
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if !(1..=9).contains(&self.key_digits) {
            return Err(PolicyError::KeyDigits(self.key_digits));
        }

        let mut expected_lower = 0;
        for segment in &self.segments {
            if segment.lower_inclusive >= segment.upper_exclusive {
                return Err(PolicyError::EmptySegment {
                    name: segment.name.clone(),
                });
            }
            if segment.credit_modifier.0 < 0 {
                return Err(PolicyError::NegativeModifier {
                    name: segment.name.clone(),
                });
            }
            if segment.lower_inclusive < expected_lower {
                return Err(PolicyError::SegmentOverlap {
                    name: segment.name.clone(),
                    found: segment.lower_inclusive,
                });
            }
            if segment.lower_inclusive > expected_lower {
                return Err(PolicyError::SegmentGap {
                    name: segment.name.clone(),
                    expected: expected_lower,
                    found: segment.lower_inclusive,
                });
            }
            expected_lower = segment.upper_exclusive;
        }

        if self.segments.is_empty() {
            return Err(PolicyError::EmptySegmentTable);
        }
        if expected_lower != self.key_space() {
            return Err(PolicyError::IncompleteCoverage {
                covered: expected_lower,
                key_space: self.key_space(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_maps_buckets() {
        let table = SegmentTable::standard();
        let modifier = |key| table.lookup(key).map(|segment| segment.credit_modifier.0);

        assert_eq!(modifier(0), Some(0));
        assert_eq!(modifier(2_499), Some(0));
        assert_eq!(modifier(2_500), Some(100));
        assert_eq!(modifier(4_999), Some(100));
        assert_eq!(modifier(5_000), Some(300));
        assert_eq!(modifier(7_500), Some(1_000));
        assert_eq!(modifier(9_999), Some(1_000));
        assert_eq!(modifier(10_000), None);
    }

    #[test]
    fn segment_key_reads_trailing_digits() {
        let table = SegmentTable::standard();
        assert_eq!(table.segment_key("37605030299"), Some(299));
        assert_eq!(table.segment_key("35006069515"), Some(9_515));
        assert_eq!(table.segment_key("123"), None);
        assert_eq!(table.segment_key("3760503x299"), None);
    }

    #[test]
    fn segment_key_ignores_multibyte_tails() {
        let table = SegmentTable::standard();
        assert_eq!(table.segment_key("1234ä56"), None);
    }

    #[test]
    fn standard_table_is_valid() {
        assert!(SegmentTable::standard().validate().is_ok());
    }

    #[test]
    fn limit_saturates_instead_of_overflowing() {
        assert_eq!(CreditModifier(i64::MAX).limit_for(60), i64::MAX);
        assert_eq!(CreditModifier::DEBT.limit_for(60), 0);
    }
}
