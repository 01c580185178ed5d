pub mod validation;
pub mod value_objects;

pub use validation::{FieldError, ValidationError, ValidationErrors, ValidationResult};
pub use value_objects::{
    AircraftSerial, ContactInfo, FlightNumber, PassportNumber, Price, Route, Schedule,
    SeatClassMap, SeatNumber, TicketNumber,
};

/// Domain and persistence errors shared by every crate in the workspace.
///
/// Each variant carries a human message (its `Display`) and a machine code
/// (`code()`), so callers can branch on the code without parsing text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Invalid aircraft: {0}")]
    InvalidAircraft(String),

    #[error("Invalid seat number: {0}")]
    InvalidSeatNumber(String),

    #[error("Seat is not available: {seat} on flight {flight}")]
    SeatNotAvailable { flight: String, seat: String },

    #[error("Seat is not reserved: {seat} on flight {flight}")]
    SeatNotReserved { flight: String, seat: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Duplicate {entity}: {id}")]
    Duplicate { entity: &'static str, id: String },

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Ticket belongs to flight {expected}, got flight {actual}")]
    FlightMismatch { expected: String, actual: String },

    #[error("Failed to prepare statement: {0}")]
    PrepareFailed(String),

    #[error("Failed to bind parameter: {0}")]
    ParamFailed(String),

    #[error("Failed to execute query: {0}")]
    QueryFailed(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn seat_not_available(flight: impl Into<String>, seat: impl Into<String>) -> Self {
        Self::SeatNotAvailable {
            flight: flight.into(),
            seat: seat.into(),
        }
    }

    /// Machine-readable code. Validation failures report the `;`-joined codes
    /// of every collected field error.
    pub fn code(&self) -> String {
        match self {
            CoreError::Validation(errors) => errors.codes(),
            CoreError::InvalidAircraft(_) => "INVALID_AIRCRAFT".into(),
            CoreError::InvalidSeatNumber(_) => "INVALID_SEAT_NUMBER".into(),
            CoreError::SeatNotAvailable { .. } => "SEAT_NOT_AVAILABLE".into(),
            CoreError::SeatNotReserved { .. } => "SEAT_NOT_RESERVED".into(),
            CoreError::NotFound { .. } => "NOT_FOUND".into(),
            CoreError::Duplicate { .. } => "DUPLICATE".into(),
            CoreError::InvalidTransition { .. } => "INVALID_TRANSITION".into(),
            CoreError::FlightMismatch { .. } => "FLIGHT_MISMATCH".into(),
            CoreError::PrepareFailed(_) => "PREPARE_FAILED".into(),
            CoreError::ParamFailed(_) => "PARAM_FAILED".into(),
            CoreError::QueryFailed(_) => "QUERY_FAILED".into(),
            CoreError::Database(_) => "DB_ERROR".into(),
        }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::Validation(errors)
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Returned by the `FromStr` impls of the status enums.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} status: {value}")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}
