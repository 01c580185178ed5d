use crate::validation::{FieldError, ValidationErrors, ValidationResult};
use crate::value_objects::FlightNumber;
use chrono::NaiveDate;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static TICKET_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<carrier>[A-Z]{2}[0-9]{1,4})-(?P<date>[0-9]{8})-(?P<seq>[0-9]{4})$")
        .expect("valid regex")
});

const DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TicketNumberError {
    #[error("Ticket number cannot be empty")]
    Empty,
    #[error("Ticket number must be in format 'CARRIER-YYYYMMDD-NNNN'")]
    InvalidFormat,
}

impl FieldError for TicketNumberError {
    fn field(&self) -> &'static str {
        "ticket_number"
    }

    fn code(&self) -> &'static str {
        match self {
            TicketNumberError::Empty => "EMPTY_TICKET_NUMBER",
            TicketNumberError::InvalidFormat => "INVALID_FORMAT",
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// Ticket identifier `CARRIER-YYYYMMDD-NNNN`, e.g. `VN123-20250101-0042`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketNumber(String);

impl TicketNumber {
    pub fn create(value: &str) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();

        if value.is_empty() {
            errors.push(TicketNumberError::Empty);
        } else if !TICKET_NUMBER_RE.is_match(value) {
            errors.push(TicketNumberError::InvalidFormat);
        }

        errors.into_result(Self(value.to_string()))
    }

    /// Composes a ticket number for `flight` issued on `date`.
    pub fn issue(flight: &FlightNumber, date: NaiveDate, sequence: u16) -> ValidationResult<Self> {
        Self::create(&format!(
            "{}-{}-{:04}",
            flight,
            date.format(DATE_FORMAT),
            sequence
        ))
    }

    /// Like [`TicketNumber::issue`] with a random sequence in `1..=9999`.
    pub fn generate(flight: &FlightNumber, date: NaiveDate) -> ValidationResult<Self> {
        let sequence = rand::thread_rng().gen_range(1..=9999);
        Self::issue(flight, date, sequence)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn carrier(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }

    /// `None` when the eight digits do not form a calendar date.
    pub fn issue_date(&self) -> Option<NaiveDate> {
        let date = self.0.split('-').nth(1)?;
        NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
    }

    pub fn sequence(&self) -> u16 {
        self.0
            .rsplit('-')
            .next()
            .and_then(|seq| seq.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TicketNumber {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

impl TryFrom<String> for TicketNumber {
    type Error = ValidationErrors;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(&value)
    }
}

impl From<TicketNumber> for String {
    fn from(value: TicketNumber) -> Self {
        value.0
    }
}
