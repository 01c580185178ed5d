use crate::validation::{FieldError, ValidationErrors, ValidationResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static ROUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<origin>[^()]+)\((?P<origin_code>[^()]*)\)-(?P<destination>[^()]+)\((?P<destination_code>[^()]*)\)$")
        .expect("valid regex")
});

static IATA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("Route cannot be empty")]
    Empty,
    #[error("Route must be in format 'Origin(CODE)-Destination(CODE)'")]
    InvalidFormat,
    #[error("Origin code must be a 3-letter IATA code")]
    InvalidOriginCode,
    #[error("Destination code must be a 3-letter IATA code")]
    InvalidDestinationCode,
    #[error("Origin and destination cannot be the same")]
    SameOriginDestination,
}

impl FieldError for RouteError {
    fn field(&self) -> &'static str {
        "route"
    }

    fn code(&self) -> &'static str {
        match self {
            RouteError::Empty => "EMPTY_ROUTE",
            RouteError::InvalidFormat => "INVALID_FORMAT",
            RouteError::InvalidOriginCode => "INVALID_ORIGIN_CODE",
            RouteError::InvalidDestinationCode => "INVALID_DESTINATION_CODE",
            RouteError::SameOriginDestination => "SAME_ORIGIN_DESTINATION",
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Route {
    origin: String,
    origin_code: String,
    destination: String,
    destination_code: String,
}

impl Route {
    pub fn new(
        origin: &str,
        origin_code: &str,
        destination: &str,
        destination_code: &str,
    ) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();

        let (origin, destination) = (origin.trim(), destination.trim());
        if origin.is_empty() || destination.is_empty() {
            errors.push(RouteError::Empty);
            return Err(errors);
        }

        let origin_ok = IATA_RE.is_match(origin_code);
        let destination_ok = IATA_RE.is_match(destination_code);
        if !origin_ok {
            errors.push(RouteError::InvalidOriginCode);
        }
        if !destination_ok {
            errors.push(RouteError::InvalidDestinationCode);
        }
        if origin_ok && destination_ok && origin_code == destination_code {
            errors.push(RouteError::SameOriginDestination);
        }

        errors.into_result(Self {
            origin: origin.to_string(),
            origin_code: origin_code.to_string(),
            destination: destination.to_string(),
            destination_code: destination_code.to_string(),
        })
    }

    /// Parses `"Ha Noi(HAN)-Ho Chi Minh(SGN)"`.
    pub fn create(value: &str) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();

        if value.trim().is_empty() {
            errors.push(RouteError::Empty);
            return Err(errors);
        }
        let Some(caps) = ROUTE_RE.captures(value.trim()) else {
            errors.push(RouteError::InvalidFormat);
            return Err(errors);
        };
        if caps["origin"].trim().is_empty() || caps["destination"].trim().is_empty() {
            errors.push(RouteError::InvalidFormat);
            return Err(errors);
        }

        Self::new(
            &caps["origin"],
            &caps["origin_code"],
            &caps["destination"],
            &caps["destination_code"],
        )
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn origin_code(&self) -> &str {
        &self.origin_code
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn destination_code(&self) -> &str {
        &self.destination_code
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})-{}({})",
            self.origin, self.origin_code, self.destination, self.destination_code
        )
    }
}

impl FromStr for Route {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

impl TryFrom<String> for Route {
    type Error = ValidationErrors;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(&value)
    }
}

impl From<Route> for String {
    fn from(value: Route) -> Self {
        value.to_string()
    }
}
