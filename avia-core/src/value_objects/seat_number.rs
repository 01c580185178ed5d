use crate::validation::{FieldError, ValidationErrors, ValidationResult};
use crate::value_objects::SeatClassMap;
use avia_shared::{SeatClass, SeatClassRegistry};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

static SEAT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][0-9]{2,3}$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SeatNumberError {
    #[error("Seat number cannot be empty")]
    Empty,
    #[error("Seat number must be a class code followed by 2-3 digits")]
    InvalidFormat,
    #[error("Seat class not found in aircraft layout")]
    InvalidSeatClass,
    #[error("Sequence number is outside the seats of its class")]
    InvalidSequenceNumber,
}

impl FieldError for SeatNumberError {
    fn field(&self) -> &'static str {
        "seat_number"
    }

    fn code(&self) -> &'static str {
        match self {
            SeatNumberError::Empty => "EMPTY_SEAT_NUMBER",
            SeatNumberError::InvalidFormat => "INVALID_FORMAT",
            SeatNumberError::InvalidSeatClass => "INVALID_SEAT_CLASS",
            SeatNumberError::InvalidSequenceNumber => "INVALID_SEQUENCE_NUMBER",
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// A seat identifier validated against one aircraft layout.
///
/// Equality, ordering and hashing use the seat string only; the layout is
/// carried so callers can inspect the class it belongs to.
#[derive(Clone)]
pub struct SeatNumber {
    value: String,
    class: SeatClass,
    sequence: u16,
    layout: Arc<SeatClassMap>,
}

impl SeatNumber {
    pub fn create(value: &str, layout: &Arc<SeatClassMap>) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();

        if value.is_empty() {
            errors.push(SeatNumberError::Empty);
            return Err(errors);
        }
        if !SEAT_NUMBER_RE.is_match(value) {
            errors.push(SeatNumberError::InvalidFormat);
            return Err(errors);
        }

        let code = value.chars().next().unwrap_or_default();
        let sequence: u16 = value[1..].parse().unwrap_or_default();

        let class = SeatClassRegistry::by_code(code).filter(|_| layout.has_seat_class(code));
        let Some(class) = class else {
            errors.push(SeatNumberError::InvalidSeatClass);
            return Err(errors);
        };

        let count = layout.seat_count(code).unwrap_or_default();
        if sequence == 0 || sequence > count {
            errors.push(SeatNumberError::InvalidSequenceNumber);
        }

        errors.into_result(Self {
            value: value.to_string(),
            class,
            sequence,
            layout: Arc::clone(layout),
        })
    }

    /// Every seat of `layout` in canonical form, class by class.
    pub fn all_for(layout: &Arc<SeatClassMap>) -> Vec<SeatNumber> {
        let mut seats = Vec::with_capacity(layout.total_seat_count() as usize);
        for (class, count) in layout.classes() {
            let width = SeatClassMap::sequence_width(count);
            for sequence in 1..=count {
                seats.push(Self {
                    value: format!("{}{:0width$}", class.code(), sequence, width = width),
                    class,
                    sequence,
                    layout: Arc::clone(layout),
                });
            }
        }
        seats
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn seat_class(&self) -> SeatClass {
        self.class
    }

    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    pub fn layout(&self) -> &Arc<SeatClassMap> {
        &self.layout
    }
}

impl PartialEq for SeatNumber {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for SeatNumber {}

impl Hash for SeatNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for SeatNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SeatNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Debug for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SeatNumber").field(&self.value).finish()
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Serialize for SeatNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout(s: &str) -> Arc<SeatClassMap> {
        Arc::new(SeatClassMap::create(s).unwrap())
    }

    #[test]
    fn test_valid_seat_numbers() {
        let layout = layout("E:100,B:20");
        let seat = SeatNumber::create("E001", &layout).unwrap();
        assert_eq!(seat.seat_class(), SeatClass::Economy);
        assert_eq!(seat.sequence(), 1);
        assert_eq!(seat.to_string(), "E001");

        assert!(SeatNumber::create("B20", &layout).is_ok());
        assert!(SeatNumber::create("E100", &layout).is_ok());
    }

    #[test]
    fn test_invalid_seat_numbers() {
        let layout = layout("E:100,B:20");
        let code = |s: &str| SeatNumber::create(s, &layout).unwrap_err().codes();

        assert_eq!(code(""), "EMPTY_SEAT_NUMBER");
        assert_eq!(code("E1"), "INVALID_FORMAT");
        assert_eq!(code("e01"), "INVALID_FORMAT");
        assert_eq!(code("F01"), "INVALID_SEAT_CLASS");
        assert_eq!(code("X01"), "INVALID_SEAT_CLASS");
        assert_eq!(code("B00"), "INVALID_SEQUENCE_NUMBER");
        assert_eq!(code("B21"), "INVALID_SEQUENCE_NUMBER");
    }

    #[test]
    fn test_all_for_uses_class_width() {
        let seats = SeatNumber::all_for(&layout("E:100,B:2"));
        assert_eq!(seats.len(), 102);
        assert_eq!(seats[0].as_str(), "B01");
        assert_eq!(seats[2].as_str(), "E001");
        assert_eq!(seats[101].as_str(), "E100");
    }

    proptest! {
        #[test]
        fn prop_sequence_space_matches_layout(count in 1u16..=999, seq in 0u16..=1200) {
            let layout = Arc::new(SeatClassMap::from_counts([(SeatClass::Economy, i64::from(count))]).unwrap());
            let width = SeatClassMap::sequence_width(count);
            let value = format!("E{:0width$}", seq, width = width);
            let result = SeatNumber::create(&value, &layout);

            if (1..=count).contains(&seq) {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(result.is_err());
            }
        }
    }
}
