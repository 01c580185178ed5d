use crate::validation::{FieldError, ValidationErrors, ValidationResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static FLIGHT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}[1-9][0-9]{0,3}$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FlightNumberError {
    #[error("Flight number cannot be empty")]
    Empty,
    #[error("Flight number must be between 3 and 6 characters")]
    InvalidLength,
    #[error("Flight number must be 2 uppercase letters followed by 1-4 digits not starting with 0")]
    InvalidFormat,
}

impl FieldError for FlightNumberError {
    fn field(&self) -> &'static str {
        "flight_number"
    }

    fn code(&self) -> &'static str {
        match self {
            FlightNumberError::Empty => "EMPTY_FLIGHT_NUMBER",
            FlightNumberError::InvalidLength => "INVALID_LENGTH",
            FlightNumberError::InvalidFormat => "INVALID_FORMAT",
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// IATA-style flight designator, e.g. `VN123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlightNumber(String);

impl FlightNumber {
    pub fn create(value: &str) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();

        if value.is_empty() {
            errors.push(FlightNumberError::Empty);
            return Err(errors);
        }

        let len = value.chars().count();
        if !(3..=6).contains(&len) {
            errors.push(FlightNumberError::InvalidLength);
        }
        if !FLIGHT_NUMBER_RE.is_match(value) {
            errors.push(FlightNumberError::InvalidFormat);
        }

        errors.into_result(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two-letter airline designator.
    pub fn airline(&self) -> &str {
        &self.0[..2]
    }
}

impl fmt::Display for FlightNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FlightNumber {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

impl TryFrom<String> for FlightNumber {
    type Error = ValidationErrors;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(&value)
    }
}

impl From<FlightNumber> for String {
    fn from(value: FlightNumber) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_flight_numbers() {
        for value in ["VN1", "VN123", "AA9999", "QF10"] {
            let flight = FlightNumber::create(value).unwrap();
            assert_eq!(flight.to_string(), value);
        }
        assert_eq!(FlightNumber::create("VN123").unwrap().airline(), "VN");
    }

    #[test]
    fn test_empty_skips_other_checks() {
        let errors = FlightNumber::create("").unwrap_err();
        assert_eq!(errors.codes(), "EMPTY_FLIGHT_NUMBER");
    }

    #[test]
    fn test_invalid_flight_numbers() {
        assert_eq!(FlightNumber::create("VN0123").unwrap_err().codes(), "INVALID_FORMAT");
        assert_eq!(FlightNumber::create("vn123").unwrap_err().codes(), "INVALID_FORMAT");
        assert_eq!(
            FlightNumber::create("VN12345").unwrap_err().codes(),
            "INVALID_LENGTH;INVALID_FORMAT"
        );
    }

    #[test]
    fn test_serde_revalidates() {
        let flight: FlightNumber = serde_json::from_str("\"VN123\"").unwrap();
        assert_eq!(serde_json::to_string(&flight).unwrap(), "\"VN123\"");
        assert!(serde_json::from_str::<FlightNumber>("\"123\"").is_err());
    }
}
