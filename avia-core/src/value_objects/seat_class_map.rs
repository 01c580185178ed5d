use crate::validation::{FieldError, ValidationErrors, ValidationResult};
use avia_shared::{SeatClass, SeatClassRegistry};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Seat numbers carry at most three sequence digits.
pub const MAX_SEATS_PER_CLASS: u16 = 999;

static SEAT_CLASS_MAP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]+:-?[0-9]+(,[A-Za-z]+:-?[0-9]+)*$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SeatClassMapError {
    #[error("Seat class map cannot be empty")]
    Empty,
    #[error("Seat class map must be in format 'CLASS:COUNT,CLASS:COUNT'")]
    InvalidFormat,
    #[error("Seat class must be one of: B, E, F, BUSINESS, ECONOMY, FIRST")]
    InvalidSeatType,
    #[error("Seat count must be between 1 and 999")]
    InvalidSeatCount,
    #[error("Seat class name must be all uppercase or all lowercase")]
    InvalidCaseMixing,
    #[error("Seat class listed more than once")]
    DuplicateSeatClass,
}

impl FieldError for SeatClassMapError {
    fn field(&self) -> &'static str {
        "seat_class_map"
    }

    fn code(&self) -> &'static str {
        match self {
            SeatClassMapError::Empty => "EMPTY_SEAT_CLASS_MAP",
            SeatClassMapError::InvalidFormat => "INVALID_FORMAT",
            SeatClassMapError::InvalidSeatType => "INVALID_SEAT_TYPE",
            SeatClassMapError::InvalidSeatCount => "INVALID_SEAT_COUNT",
            SeatClassMapError::InvalidCaseMixing => "INVALID_CASE_MIXING",
            SeatClassMapError::DuplicateSeatClass => "DUPLICATE_SEAT_CLASS",
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// Cabin layout of an aircraft: how many seats each class has.
///
/// The layout defines the valid seat-number space. Class `C` with `N` seats
/// owns `C01..CN` when `N <= 99` and `C001..CN` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatClassMap {
    counts: BTreeMap<SeatClass, u16>,
}

impl SeatClassMap {
    /// Builds a layout from explicit class counts.
    pub fn from_counts<I>(entries: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = (SeatClass, i64)>,
    {
        let mut errors = ValidationErrors::new();
        let mut counts = BTreeMap::new();
        let mut seen_any = false;

        for (class, count) in entries {
            seen_any = true;
            Self::insert_entry(&mut counts, &mut errors, class, count);
        }

        if !seen_any {
            errors.push(SeatClassMapError::Empty);
        }

        errors.into_result(Self { counts })
    }

    /// Parses `"E:100,B:20"`; names (`ECONOMY:100`, `economy:100`) are accepted
    /// as well as codes.
    pub fn create(value: &str) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();

        if value.is_empty() {
            errors.push(SeatClassMapError::Empty);
            return Err(errors);
        }
        if !SEAT_CLASS_MAP_RE.is_match(value) {
            errors.push(SeatClassMapError::InvalidFormat);
            return Err(errors);
        }

        let mut counts = BTreeMap::new();
        for entry in value.split(',') {
            let Some((name, count)) = entry.split_once(':') else {
                errors.push(SeatClassMapError::InvalidFormat);
                continue;
            };

            let all_upper = name.chars().all(|c| c.is_ascii_uppercase());
            let all_lower = name.chars().all(|c| c.is_ascii_lowercase());
            if !all_upper && !all_lower {
                errors.push(SeatClassMapError::InvalidCaseMixing);
                continue;
            }

            let Some(class) = SeatClassRegistry::resolve(&name.to_ascii_uppercase()) else {
                errors.push(SeatClassMapError::InvalidSeatType);
                continue;
            };

            // Counts too long for i64 are out of range all the same.
            let count = count.parse::<i64>().unwrap_or(i64::MAX);
            Self::insert_entry(&mut counts, &mut errors, class, count);
        }

        errors.into_result(Self { counts })
    }

    fn insert_entry(
        counts: &mut BTreeMap<SeatClass, u16>,
        errors: &mut ValidationErrors,
        class: SeatClass,
        count: i64,
    ) {
        if counts.contains_key(&class) {
            errors.push(SeatClassMapError::DuplicateSeatClass);
            return;
        }
        match u16::try_from(count) {
            Ok(n) if (1..=MAX_SEATS_PER_CLASS).contains(&n) => {
                counts.insert(class, n);
            }
            _ => errors.push(SeatClassMapError::InvalidSeatCount),
        }
    }

    pub fn has_seat_class(&self, code: char) -> bool {
        self.seat_count(code).is_some()
    }

    pub fn seat_count(&self, code: char) -> Option<u16> {
        let class = SeatClassRegistry::by_code(code)?;
        self.counts.get(&class).copied()
    }

    pub fn total_seat_count(&self) -> u32 {
        self.counts.values().map(|&n| u32::from(n)).sum()
    }

    /// Classes in code order with their seat counts.
    pub fn classes(&self) -> impl Iterator<Item = (SeatClass, u16)> + '_ {
        self.counts.iter().map(|(&class, &count)| (class, count))
    }

    /// Zero-padding width of sequence numbers for a class with `count` seats.
    pub fn sequence_width(count: u16) -> usize {
        if count <= 99 {
            2
        } else {
            3
        }
    }
}

impl fmt::Display for SeatClassMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .classes()
            .map(|(class, count)| format!("{}:{}", class.code(), count))
            .collect();
        f.write_str(&parts.join(","))
    }
}

impl FromStr for SeatClassMap {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

impl TryFrom<String> for SeatClassMap {
    type Error = ValidationErrors;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(&value)
    }
}

impl From<SeatClassMap> for String {
    fn from(value: SeatClassMap) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes_and_names() {
        let layout = SeatClassMap::create("E:100,B:20,F:10").unwrap();
        assert_eq!(layout.to_string(), "B:20,E:100,F:10");
        assert_eq!(layout.total_seat_count(), 130);
        assert_eq!(layout.seat_count('E'), Some(100));
        assert!(!layout.has_seat_class('X'));

        let named = SeatClassMap::create("economy:2,BUSINESS:1").unwrap();
        assert_eq!(named.to_string(), "B:1,E:2");
    }

    #[test]
    fn test_format_errors_stop_early() {
        assert_eq!(SeatClassMap::create("").unwrap_err().codes(), "EMPTY_SEAT_CLASS_MAP");
        assert_eq!(SeatClassMap::create("E100").unwrap_err().codes(), "INVALID_FORMAT");
        assert_eq!(SeatClassMap::create("E:1,").unwrap_err().codes(), "INVALID_FORMAT");
    }

    #[test]
    fn test_entry_errors_are_collected() {
        let errors = SeatClassMap::create("Economy:10,X:5,B:0,F:1000,E:3,e:2").unwrap_err();
        assert_eq!(
            errors.codes(),
            "INVALID_CASE_MIXING;INVALID_SEAT_TYPE;INVALID_SEAT_COUNT;INVALID_SEAT_COUNT;DUPLICATE_SEAT_CLASS"
        );
    }

    #[test]
    fn test_from_counts() {
        let layout = SeatClassMap::from_counts([(SeatClass::Economy, 2), (SeatClass::Business, 1)]).unwrap();
        assert_eq!(layout.to_string(), "B:1,E:2");

        assert_eq!(
            SeatClassMap::from_counts([]).unwrap_err().codes(),
            "EMPTY_SEAT_CLASS_MAP"
        );
        assert_eq!(
            SeatClassMap::from_counts([(SeatClass::First, -1)]).unwrap_err().codes(),
            "INVALID_SEAT_COUNT"
        );
    }

    #[test]
    fn test_sequence_width() {
        assert_eq!(SeatClassMap::sequence_width(99), 2);
        assert_eq!(SeatClassMap::sequence_width(100), 3);
    }
}
