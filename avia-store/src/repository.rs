use async_trait::async_trait;
use avia_catalog::{Aircraft, Flight, FlightStatus};
use avia_core::value_objects::SCHEDULE_TIME_FORMAT;
use avia_core::{CoreError, CoreResult};
use avia_order::{Passenger, Ticket};
use chrono::NaiveDateTime;
use uuid::Uuid;

// ============================================================================
// Persisted rows
// ============================================================================

/// Row of `aircraft`; the layout is stored as one count per class.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AircraftRecord {
    pub serial_number: String,
    pub model: String,
    pub economy_seats: i32,
    pub business_seats: i32,
    pub first_seats: i32,
}

impl From<&Aircraft> for AircraftRecord {
    fn from(aircraft: &Aircraft) -> Self {
        let count = |code: char| i32::from(aircraft.layout().seat_count(code).unwrap_or(0));
        Self {
            serial_number: aircraft.serial().to_string(),
            model: aircraft.model().to_string(),
            economy_seats: count('E'),
            business_seats: count('B'),
            first_seats: count('F'),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FlightRecord {
    pub flight_number: String,
    pub route: String,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub aircraft_serial: String,
    pub status: String,
}

impl From<&Flight> for FlightRecord {
    fn from(flight: &Flight) -> Self {
        Self {
            flight_number: flight.flight_number().to_string(),
            route: flight.route().to_string(),
            departure: flight.schedule().departure(),
            arrival: flight.schedule().arrival(),
            aircraft_serial: flight.aircraft().serial().to_string(),
            status: flight.status().to_string(),
        }
    }
}

impl FlightRecord {
    pub fn flight_status(&self) -> CoreResult<FlightStatus> {
        self.status
            .parse()
            .map_err(|e: avia_core::ParseStatusError| CoreError::QueryFailed(e.to_string()))
    }

    /// Same flight number and departure as the ticket was issued for.
    pub fn is_for(&self, ticket: &Ticket) -> bool {
        self.flight_number == ticket.flight_number().as_str() && self.departure == ticket.departure()
    }

    pub fn key(&self) -> String {
        format!("{} {}", self.flight_number, self.departure.format(SCHEDULE_TIME_FORMAT))
    }
}

/// Flight statuses under which seat rows are frozen.
pub fn blocked_statuses() -> Vec<String> {
    FlightStatus::ALL
        .iter()
        .filter(|status| status.blocks_seat_changes())
        .map(|status| status.as_str().to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PassengerRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub passport: String,
}

impl From<&Passenger> for PassengerRecord {
    fn from(passenger: &Passenger) -> Self {
        Self {
            id: passenger.id,
            name: passenger.name().to_string(),
            email: passenger.contact().email().to_string(),
            phone: passenger.contact().phone().to_string(),
            address: passenger.contact().address().map(str::to_string),
            passport: passenger.passport().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TicketRecord {
    pub ticket_number: String,
    pub passenger_id: Uuid,
    pub flight_id: i64,
    pub seat_number: String,
    pub price_amount: i64,
    pub price_currency: String,
    pub status: String,
}

impl TicketRecord {
    pub fn new(flight_id: i64, ticket: &Ticket) -> Self {
        Self {
            ticket_number: ticket.ticket_number().to_string(),
            passenger_id: ticket.passenger_id(),
            flight_id,
            seat_number: ticket.seat().to_string(),
            price_amount: ticket.price().amount_minor(),
            price_currency: ticket.price().currency().to_string(),
            status: ticket.status().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SeatRow {
    pub seat_number: String,
    pub is_available: bool,
}

// ============================================================================
// Store traits
// ============================================================================

/// A datastore that can run several writes as one unit.
#[async_trait]
pub trait TransactionalStore: Send + Sync {
    async fn begin(&self) -> CoreResult<Box<dyn StoreTransaction>>;

    /// Seats of a flight ordered by seat number.
    async fn seat_map(&self, flight_id: i64) -> CoreResult<Vec<SeatRow>>;

    async fn find_ticket(&self, ticket_number: &str) -> CoreResult<Option<TicketRecord>>;
}

/// One open transaction. Dropping it without `commit` discards its writes.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Inserts the aircraft unless its serial is already stored.
    async fn upsert_aircraft(&mut self, aircraft: &AircraftRecord) -> CoreResult<u64>;

    /// Returns the generated flight id.
    async fn insert_flight(&mut self, flight: &FlightRecord) -> CoreResult<i64>;

    /// Reads a flight row; the row stays locked against status changes
    /// until the transaction ends.
    async fn find_flight(&mut self, flight_id: i64) -> CoreResult<Option<FlightRecord>>;

    /// Returns the affected rows; 0 when the flight does not exist.
    async fn update_flight_status(&mut self, flight_id: i64, status: &str) -> CoreResult<u64>;

    /// Inserts one available row per seat.
    async fn seed_seats(&mut self, flight_id: i64, seats: &[String]) -> CoreResult<u64>;

    /// Check-and-set on one seat: flips `is_available` to `available` only
    /// if it currently holds the opposite value and the flight's status
    /// still allows seat changes. Returns the affected rows.
    async fn set_seat_availability(
        &mut self,
        flight_id: i64,
        seat_number: &str,
        available: bool,
    ) -> CoreResult<u64>;

    async fn insert_passenger(&mut self, passenger: &PassengerRecord) -> CoreResult<u64>;

    /// Returns the generated ticket id.
    async fn insert_ticket(&mut self, ticket: &TicketRecord) -> CoreResult<i64>;

    /// Moves a ticket from `from` to `to`; 0 rows when it is not in `from`.
    async fn update_ticket_status(
        &mut self,
        ticket_number: &str,
        from: &str,
        to: &str,
    ) -> CoreResult<u64>;

    async fn commit(self: Box<Self>) -> CoreResult<()>;

    async fn rollback(self: Box<Self>) -> CoreResult<()>;
}
