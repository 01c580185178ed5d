use crate::validation::{FieldError, ValidationErrors, ValidationResult};
use avia_shared::{CountryRegistry, Masked};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static PASSPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<country>[A-Za-z]{2,3}):(?P<number>[0-9]+)$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PassportNumberError {
    #[error("Passport number cannot be empty")]
    Empty,
    #[error("Passport number must be in format 'COUNTRY:NUMBER'")]
    InvalidFormat,
    #[error("Issuing country is not supported")]
    InvalidIssuingCountry,
    #[error("Passport number must have 6 to 9 digits")]
    InvalidNumberLength,
}

impl FieldError for PassportNumberError {
    fn field(&self) -> &'static str {
        "passport_number"
    }

    fn code(&self) -> &'static str {
        match self {
            PassportNumberError::Empty => "EMPTY_PASSPORT_NUMBER",
            PassportNumberError::InvalidFormat => "INVALID_FORMAT",
            PassportNumberError::InvalidIssuingCountry => "INVALID_ISSUING_COUNTRY",
            PassportNumberError::InvalidNumberLength => "INVALID_NUMBER_LENGTH",
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// `COUNTRY:NUMBER`, e.g. `VN:12345678`. The digits are masked in `Debug`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PassportNumber {
    country: String,
    number: Masked<String>,
}

impl PassportNumber {
    pub fn create(value: &str) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();

        if value.is_empty() {
            errors.push(PassportNumberError::Empty);
            return Err(errors);
        }
        let Some(caps) = PASSPORT_RE.captures(value) else {
            errors.push(PassportNumberError::InvalidFormat);
            return Err(errors);
        };

        Self::from_parts(&caps["country"], &caps["number"])
    }

    pub fn from_parts(country: &str, number: &str) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();

        if country.is_empty() || number.is_empty() {
            errors.push(PassportNumberError::Empty);
            return Err(errors);
        }
        if !CountryRegistry::is_valid(country) {
            errors.push(PassportNumberError::InvalidIssuingCountry);
        }
        if !(6..=9).contains(&number.len()) || !number.chars().all(|c| c.is_ascii_digit()) {
            errors.push(PassportNumberError::InvalidNumberLength);
        }

        errors.into_result(Self {
            country: country.to_ascii_uppercase(),
            number: Masked(number.to_string()),
        })
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// The unmasked digits.
    pub fn number(&self) -> &str {
        self.number.expose()
    }
}

impl fmt::Display for PassportNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.country, self.number.expose())
    }
}

impl FromStr for PassportNumber {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

impl TryFrom<String> for PassportNumber {
    type Error = ValidationErrors;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(&value)
    }
}

impl From<PassportNumber> for String {
    fn from(value: PassportNumber) -> Self {
        value.to_string()
    }
}
