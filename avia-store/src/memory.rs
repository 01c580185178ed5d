use crate::repository::{
    blocked_statuses, AircraftRecord, FlightRecord, PassengerRecord, SeatRow, StoreTransaction,
    TicketRecord, TransactionalStore,
};
use async_trait::async_trait;
use avia_core::{CoreError, CoreResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    aircraft: BTreeMap<String, AircraftRecord>,
    flights: BTreeMap<i64, FlightRecord>,
    seats: BTreeMap<(i64, String), bool>,
    passengers: HashMap<Uuid, PassengerRecord>,
    tickets: BTreeMap<String, TicketRecord>,
    next_flight_id: i64,
    next_ticket_id: i64,
}

/// In-process store with the same transactional contract as Postgres.
///
/// A transaction holds the state lock from `begin` until `commit` or
/// `rollback`, so transactions are serialized. Writes go to a staged copy
/// that replaces the shared state on commit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionalStore for MemoryStore {
    async fn begin(&self) -> CoreResult<Box<dyn StoreTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, staged }))
    }

    async fn seat_map(&self, flight_id: i64) -> CoreResult<Vec<SeatRow>> {
        let state = self.state.lock().await;
        Ok(state
            .seats
            .iter()
            .filter(|((id, _), _)| *id == flight_id)
            .map(|((_, seat), available)| SeatRow {
                seat_number: seat.clone(),
                is_available: *available,
            })
            .collect())
    }

    async fn find_ticket(&self, ticket_number: &str) -> CoreResult<Option<TicketRecord>> {
        let state = self.state.lock().await;
        Ok(state.tickets.get(ticket_number).cloned())
    }
}

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

impl MemoryTransaction {
    fn require_flight(&self, flight_id: i64) -> CoreResult<()> {
        if self.staged.flights.contains_key(&flight_id) {
            Ok(())
        } else {
            Err(CoreError::QueryFailed(format!(
                "foreign key violation: flight {} does not exist",
                flight_id
            )))
        }
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn upsert_aircraft(&mut self, aircraft: &AircraftRecord) -> CoreResult<u64> {
        if self.staged.aircraft.contains_key(&aircraft.serial_number) {
            return Ok(0);
        }
        self.staged
            .aircraft
            .insert(aircraft.serial_number.clone(), aircraft.clone());
        Ok(1)
    }

    async fn insert_flight(&mut self, flight: &FlightRecord) -> CoreResult<i64> {
        if !self.staged.aircraft.contains_key(&flight.aircraft_serial) {
            return Err(CoreError::QueryFailed(format!(
                "foreign key violation: aircraft {} does not exist",
                flight.aircraft_serial
            )));
        }
        let duplicate = self.staged.flights.values().any(|f| {
            f.flight_number == flight.flight_number && f.departure == flight.departure
        });
        if duplicate {
            return Err(CoreError::Duplicate {
                entity: "Flight",
                id: flight.flight_number.clone(),
            });
        }

        self.staged.next_flight_id += 1;
        let id = self.staged.next_flight_id;
        self.staged.flights.insert(id, flight.clone());
        Ok(id)
    }

    async fn find_flight(&mut self, flight_id: i64) -> CoreResult<Option<FlightRecord>> {
        Ok(self.staged.flights.get(&flight_id).cloned())
    }

    async fn update_flight_status(&mut self, flight_id: i64, status: &str) -> CoreResult<u64> {
        match self.staged.flights.get_mut(&flight_id) {
            Some(flight) => {
                flight.status = status.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn seed_seats(&mut self, flight_id: i64, seats: &[String]) -> CoreResult<u64> {
        self.require_flight(flight_id)?;
        for seat in seats {
            let key = (flight_id, seat.clone());
            if self.staged.seats.contains_key(&key) {
                return Err(CoreError::Duplicate {
                    entity: "Seat",
                    id: seat.clone(),
                });
            }
            self.staged.seats.insert(key, true);
        }
        Ok(seats.len() as u64)
    }

    async fn set_seat_availability(
        &mut self,
        flight_id: i64,
        seat_number: &str,
        available: bool,
    ) -> CoreResult<u64> {
        let frozen = self
            .staged
            .flights
            .get(&flight_id)
            .map_or(true, |flight| blocked_statuses().contains(&flight.status));
        if frozen {
            return Ok(0);
        }
        match self
            .staged
            .seats
            .get_mut(&(flight_id, seat_number.to_string()))
        {
            Some(current) if *current != available => {
                *current = available;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn insert_passenger(&mut self, passenger: &PassengerRecord) -> CoreResult<u64> {
        if self.staged.passengers.contains_key(&passenger.id) {
            return Err(CoreError::Duplicate {
                entity: "Passenger",
                id: passenger.id.to_string(),
            });
        }
        self.staged.passengers.insert(passenger.id, passenger.clone());
        Ok(1)
    }

    async fn insert_ticket(&mut self, ticket: &TicketRecord) -> CoreResult<i64> {
        self.require_flight(ticket.flight_id)?;
        if !self.staged.passengers.contains_key(&ticket.passenger_id) {
            return Err(CoreError::QueryFailed(format!(
                "foreign key violation: passenger {} does not exist",
                ticket.passenger_id
            )));
        }
        if !self
            .staged
            .seats
            .contains_key(&(ticket.flight_id, ticket.seat_number.clone()))
        {
            return Err(CoreError::QueryFailed(format!(
                "foreign key violation: seat {} does not exist",
                ticket.seat_number
            )));
        }
        if self.staged.tickets.contains_key(&ticket.ticket_number) {
            return Err(CoreError::Duplicate {
                entity: "Ticket",
                id: ticket.ticket_number.clone(),
            });
        }

        self.staged.next_ticket_id += 1;
        self.staged
            .tickets
            .insert(ticket.ticket_number.clone(), ticket.clone());
        Ok(self.staged.next_ticket_id)
    }

    async fn update_ticket_status(
        &mut self,
        ticket_number: &str,
        from: &str,
        to: &str,
    ) -> CoreResult<u64> {
        match self.staged.tickets.get_mut(ticket_number) {
            Some(ticket) if ticket.status == from => {
                ticket.status = to.to_string();
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn commit(self: Box<Self>) -> CoreResult<()> {
        let MemoryTransaction { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> CoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aircraft() -> AircraftRecord {
        AircraftRecord {
            serial_number: "VNA321".into(),
            model: "Airbus A321".into(),
            economy_seats: 2,
            business_seats: 1,
            first_seats: 0,
        }
    }

    fn flight() -> FlightRecord {
        let departure = chrono::NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        FlightRecord {
            flight_number: "VN123".into(),
            route: "Ha Noi(HAN)-Ho Chi Minh(SGN)".into(),
            departure,
            arrival: departure + chrono::TimeDelta::hours(2),
            aircraft_serial: "VNA321".into(),
            status: "SCHEDULED".into(),
        }
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_discarded() {
        let store = MemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        tx.upsert_aircraft(&aircraft()).await.unwrap();
        let id = tx.insert_flight(&flight()).await.unwrap();
        tx.seed_seats(id, &["E01".into()]).await.unwrap();
        tx.rollback().await.unwrap();
        assert!(store.seat_map(id).await.unwrap().is_empty());

        let mut tx = store.begin().await.unwrap();
        tx.upsert_aircraft(&aircraft()).await.unwrap();
        let id = tx.insert_flight(&flight()).await.unwrap();
        tx.seed_seats(id, &["E01".into(), "E02".into()]).await.unwrap();
        drop(tx);
        assert!(store.seat_map(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conditional_flip_and_foreign_keys() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        assert_eq!(tx.upsert_aircraft(&aircraft()).await.unwrap(), 1);
        assert_eq!(tx.upsert_aircraft(&aircraft()).await.unwrap(), 0);
        let id = tx.insert_flight(&flight()).await.unwrap();
        assert_eq!(tx.insert_flight(&flight()).await.unwrap_err().code(), "DUPLICATE");
        assert_eq!(tx.seed_seats(id + 1, &["E01".into()]).await.unwrap_err().code(), "QUERY_FAILED");

        tx.seed_seats(id, &["E01".into()]).await.unwrap();
        assert_eq!(tx.set_seat_availability(id, "E01", false).await.unwrap(), 1);
        assert_eq!(tx.set_seat_availability(id, "E01", false).await.unwrap(), 0);
        assert_eq!(tx.set_seat_availability(id, "E99", false).await.unwrap(), 0);
        assert_eq!(tx.set_seat_availability(id, "E01", true).await.unwrap(), 1);

        // Seat rows are frozen while the flight is cancelled
        assert_eq!(tx.update_flight_status(id, "CANCELLED").await.unwrap(), 1);
        assert_eq!(tx.set_seat_availability(id, "E01", false).await.unwrap(), 0);
        assert_eq!(tx.update_flight_status(id, "DELAYED").await.unwrap(), 1);
        assert_eq!(tx.update_flight_status(id + 1, "DELAYED").await.unwrap(), 0);
        assert_eq!(tx.find_flight(id).await.unwrap().unwrap().status, "DELAYED");
        tx.commit().await.unwrap();

        let seats = store.seat_map(id).await.unwrap();
        assert_eq!(
            seats,
            vec![SeatRow {
                seat_number: "E01".into(),
                is_available: true
            }]
        );
    }
}
