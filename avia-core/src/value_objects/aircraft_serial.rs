use crate::validation::{FieldError, ValidationErrors, ValidationResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static AIRCRAFT_SERIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2,3}[0-9]{1,7}$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AircraftSerialError {
    #[error("Aircraft serial cannot be empty")]
    Empty,
    #[error("Aircraft serial must be between 3 and 10 characters")]
    InvalidLength,
    #[error("Aircraft serial must be 2-3 uppercase letters followed by 1-7 digits")]
    InvalidFormat,
}

impl FieldError for AircraftSerialError {
    fn field(&self) -> &'static str {
        "aircraft_serial"
    }

    fn code(&self) -> &'static str {
        match self {
            AircraftSerialError::Empty => "EMPTY_AIRCRAFT_SERIAL",
            AircraftSerialError::InvalidLength => "INVALID_LENGTH",
            AircraftSerialError::InvalidFormat => "INVALID_FORMAT",
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// Registration serial of an airframe, e.g. `VNA321`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AircraftSerial(String);

impl AircraftSerial {
    pub fn create(value: &str) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();

        if value.is_empty() {
            errors.push(AircraftSerialError::Empty);
            return Err(errors);
        }
        if !(3..=10).contains(&value.chars().count()) {
            errors.push(AircraftSerialError::InvalidLength);
        }
        if !AIRCRAFT_SERIAL_RE.is_match(value) {
            errors.push(AircraftSerialError::InvalidFormat);
        }

        errors.into_result(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AircraftSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AircraftSerial {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

impl TryFrom<String> for AircraftSerial {
    type Error = ValidationErrors;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(&value)
    }
}

impl From<AircraftSerial> for String {
    fn from(value: AircraftSerial) -> Self {
        value.0
    }
}
