use avia_catalog::{Flight, FlightStatus};
use avia_core::value_objects::SCHEDULE_TIME_FORMAT;
use avia_core::{CoreError, CoreResult, FlightNumber, ParseStatusError, Price, SeatNumber, TicketNumber};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Ticket status in the booking lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Pending,
    Confirmed,
    CheckedIn,
    Boarded,
    Completed,
    Cancelled,
    Refunded,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 7] = [
        TicketStatus::Pending,
        TicketStatus::Confirmed,
        TicketStatus::CheckedIn,
        TicketStatus::Boarded,
        TicketStatus::Completed,
        TicketStatus::Cancelled,
        TicketStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "PENDING",
            TicketStatus::Confirmed => "CONFIRMED",
            TicketStatus::CheckedIn => "CHECKED_IN",
            TicketStatus::Boarded => "BOARDED",
            TicketStatus::Completed => "COMPLETED",
            TicketStatus::Cancelled => "CANCELLED",
            TicketStatus::Refunded => "REFUNDED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "Pending",
            TicketStatus::Confirmed => "Confirmed",
            TicketStatus::CheckedIn => "Checked in",
            TicketStatus::Boarded => "Boarded",
            TicketStatus::Completed => "Completed",
            TicketStatus::Cancelled => "Cancelled",
            TicketStatus::Refunded => "Refunded",
        }
    }

    /// Statuses that still hold a seat on the flight.
    pub fn holds_seat(&self) -> bool {
        !matches!(self, TicketStatus::Cancelled | TicketStatus::Refunded)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError {
                kind: "ticket",
                value: s.to_string(),
            })
    }
}

/// A booked seat: passenger and flight by reference, seat and price owned.
#[derive(Debug, Clone, Serialize)]
pub struct Ticket {
    ticket_number: TicketNumber,
    passenger_id: Uuid,
    flight_number: FlightNumber,
    departure: NaiveDateTime,
    seat: SeatNumber,
    price: Price,
    status: TicketStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Ticket {
    /// A new `PENDING` ticket. `seat` is validated against the flight's
    /// aircraft layout; seat availability is the booking service's concern.
    pub fn new(
        ticket_number: TicketNumber,
        passenger_id: Uuid,
        flight: &Flight,
        seat: &str,
        price: Price,
    ) -> CoreResult<Self> {
        let seat = SeatNumber::create(seat, flight.aircraft().layout())
            .map_err(|e| CoreError::InvalidSeatNumber(format!("{}: {}", seat, e.messages())))?;
        let now = Utc::now();
        Ok(Self {
            ticket_number,
            passenger_id,
            flight_number: flight.flight_number().clone(),
            departure: flight.schedule().departure(),
            seat,
            price,
            status: TicketStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a stored ticket, keeping its status and timestamps.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        ticket_number: TicketNumber,
        passenger_id: Uuid,
        flight_number: FlightNumber,
        departure: NaiveDateTime,
        seat: SeatNumber,
        price: Price,
        status: TicketStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ticket_number,
            passenger_id,
            flight_number,
            departure,
            seat,
            price,
            status,
            created_at,
            updated_at,
        }
    }

    pub fn ticket_number(&self) -> &TicketNumber {
        &self.ticket_number
    }

    pub fn passenger_id(&self) -> Uuid {
        self.passenger_id
    }

    pub fn flight_number(&self) -> &FlightNumber {
        &self.flight_number
    }

    /// Departure of the flight the ticket was issued for. Together with the
    /// flight number it identifies that flight.
    pub fn departure(&self) -> NaiveDateTime {
        self.departure
    }

    /// Whether `flight` is the departure this ticket was issued for.
    pub fn is_for(&self, flight: &Flight) -> bool {
        self.flight_number == *flight.flight_number()
            && self.departure == flight.schedule().departure()
    }

    /// `"VN123 2025-06-01 08:00"`
    pub fn flight_key(&self) -> String {
        flight_key(&self.flight_number, self.departure)
    }

    pub fn seat(&self) -> &SeatNumber {
        &self.seat
    }

    pub fn price(&self) -> &Price {
        &self.price
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Administrative override; accepts any status. Regular flows go
    /// through [`Ticket::apply`].
    pub fn set_status(&mut self, status: TicketStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn can_be_cancelled(&self) -> bool {
        matches!(self.status, TicketStatus::Pending | TicketStatus::Confirmed)
    }

    pub fn can_be_refunded(&self, flight_status: FlightStatus) -> bool {
        self.status == TicketStatus::Confirmed && !flight_status.blocks_seat_changes()
    }

    pub fn can_be_checked_in(&self, flight_status: FlightStatus) -> bool {
        self.status == TicketStatus::Confirmed && flight_status == FlightStatus::Boarding
    }

    pub fn can_be_boarded(&self, flight_status: FlightStatus) -> bool {
        self.status == TicketStatus::CheckedIn && flight_status == FlightStatus::Boarding
    }

    pub fn can_be_completed(&self, flight_status: FlightStatus) -> bool {
        self.status == TicketStatus::Boarded && flight_status == FlightStatus::Landed
    }
}

pub(crate) fn flight_key(flight_number: &FlightNumber, departure: NaiveDateTime) -> String {
    format!("{} {}", flight_number, departure.format(SCHEDULE_TIME_FORMAT))
}
