use crate::flight::{Flight, FlightStatus};
use avia_core::{FlightNumber, SeatNumber};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

/// A flight shared between tasks. Each seat operation holds the write lock
/// for its whole check-and-flip, so two tasks cannot both win one seat.
#[derive(Debug, Clone)]
pub struct SharedFlight {
    inner: Arc<RwLock<Flight>>,
    flight_number: FlightNumber,
}

impl SharedFlight {
    pub fn new(flight: Flight) -> Self {
        Self {
            flight_number: flight.flight_number().clone(),
            inner: Arc::new(RwLock::new(flight)),
        }
    }

    pub fn flight_number(&self) -> &FlightNumber {
        &self.flight_number
    }

    pub async fn reserve_seat(&self, seat: &str) -> bool {
        self.inner.write().await.reserve_seat(seat)
    }

    pub async fn release_seat(&self, seat: &str) -> bool {
        self.inner.write().await.release_seat(seat)
    }

    pub async fn is_seat_available(&self, seat: &str) -> bool {
        self.inner.read().await.is_seat_available(seat)
    }

    pub async fn status(&self) -> FlightStatus {
        self.inner.read().await.status()
    }

    pub async fn set_status(&self, status: FlightStatus) {
        self.inner.write().await.set_status(status);
    }

    pub async fn seat_map(&self) -> Vec<(SeatNumber, bool)> {
        self.inner.read().await.seat_map()
    }

    /// Read access for guards that need the whole flight.
    pub async fn read(&self) -> RwLockReadGuard<'_, Flight> {
        self.inner.read().await
    }
}
