use crate::validation::{FieldError, ValidationErrors, ValidationResult};
use chrono::{NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minute-resolution timestamp format used in schedule strings.
pub const SCHEDULE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Schedule cannot be empty")]
    Empty,
    #[error("Schedule must be in format 'YYYY-MM-DD HH:mm|YYYY-MM-DD HH:mm'")]
    InvalidFormat,
    #[error("Invalid departure time")]
    InvalidDepartureTime,
    #[error("Invalid arrival time")]
    InvalidArrivalTime,
    #[error("Arrival time must be after departure time")]
    ArrivalBeforeDeparture,
}

impl FieldError for ScheduleError {
    fn field(&self) -> &'static str {
        "schedule"
    }

    fn code(&self) -> &'static str {
        match self {
            ScheduleError::Empty => "EMPTY_SCHEDULE",
            ScheduleError::InvalidFormat => "INVALID_FORMAT",
            ScheduleError::InvalidDepartureTime => "INVALID_DEPARTURE_TIME",
            ScheduleError::InvalidArrivalTime => "INVALID_ARRIVAL_TIME",
            ScheduleError::ArrivalBeforeDeparture => "ARRIVAL_BEFORE_DEPARTURE",
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// Departure and arrival of a flight; arrival is strictly after departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Schedule {
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
}

fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(value)
}

impl Schedule {
    /// Seconds are dropped so the value round-trips through its string form.
    pub fn new(departure: NaiveDateTime, arrival: NaiveDateTime) -> ValidationResult<Self> {
        let departure = truncate_to_minute(departure);
        let arrival = truncate_to_minute(arrival);

        let mut errors = ValidationErrors::new();
        if arrival <= departure {
            errors.push(ScheduleError::ArrivalBeforeDeparture);
        }
        errors.into_result(Self { departure, arrival })
    }

    pub fn from_parts(departure: &str, arrival: &str) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();

        if departure.trim().is_empty() && arrival.trim().is_empty() {
            errors.push(ScheduleError::Empty);
            return Err(errors);
        }

        let departure = NaiveDateTime::parse_from_str(departure.trim(), SCHEDULE_TIME_FORMAT).ok();
        if departure.is_none() {
            errors.push(ScheduleError::InvalidDepartureTime);
        }
        let arrival = NaiveDateTime::parse_from_str(arrival.trim(), SCHEDULE_TIME_FORMAT).ok();
        if arrival.is_none() {
            errors.push(ScheduleError::InvalidArrivalTime);
        }

        match (departure, arrival) {
            (Some(departure), Some(arrival)) => Self::new(departure, arrival),
            _ => Err(errors),
        }
    }

    /// Parses `"YYYY-MM-DD HH:mm|YYYY-MM-DD HH:mm"`.
    pub fn create(value: &str) -> ValidationResult<Self> {
        if value.trim().is_empty() {
            let mut errors = ValidationErrors::new();
            errors.push(ScheduleError::Empty);
            return Err(errors);
        }

        let parts: Vec<&str> = value.split('|').collect();
        match parts.as_slice() {
            [departure, arrival] => Self::from_parts(departure, arrival),
            _ => {
                let mut errors = ValidationErrors::new();
                errors.push(ScheduleError::InvalidFormat);
                Err(errors)
            }
        }
    }

    pub fn departure(&self) -> NaiveDateTime {
        self.departure
    }

    pub fn arrival(&self) -> NaiveDateTime {
        self.arrival
    }

    pub fn duration(&self) -> TimeDelta {
        self.arrival - self.departure
    }

    /// Half-open interval overlap; back-to-back schedules do not overlap.
    pub fn overlaps_with(&self, other: &Schedule) -> bool {
        self.departure < other.arrival && other.departure < self.arrival
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}",
            self.departure.format(SCHEDULE_TIME_FORMAT),
            self.arrival.format(SCHEDULE_TIME_FORMAT)
        )
    }
}

impl FromStr for Schedule {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

impl TryFrom<String> for Schedule {
    type Error = ValidationErrors;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(&value)
    }
}

impl From<Schedule> for String {
    fn from(value: Schedule) -> Self {
        value.to_string()
    }
}
