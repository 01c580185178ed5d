use crate::repository::{
    AircraftRecord, FlightRecord, PassengerRecord, SeatRow, StoreTransaction, TicketRecord,
    TransactionalStore,
};
use avia_catalog::{Flight, FlightStatus};
use avia_core::{CoreError, CoreResult, SeatNumber};
use avia_order::{Passenger, Ticket, TicketAction, TicketStatus};
use tracing::{debug, error, info, warn};

/// Runs bookings against a transactional store.
///
/// Every operation opens one transaction and either commits all of its
/// writes or rolls all of them back. Seat changes are check-and-set
/// updates, so a lost race shows up as zero affected rows.
pub struct BookingService<S: TransactionalStore> {
    store: S,
}

impl<S: TransactionalStore> BookingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn register_passenger(&self, passenger: &Passenger) -> CoreResult<()> {
        let mut tx = self.store.begin().await?;
        let result = tx
            .insert_passenger(&PassengerRecord::from(passenger))
            .await
            .map(|_| ());
        finish(tx, result).await?;
        info!("Passenger registered: {}", passenger.id);
        Ok(())
    }

    /// Stores the flight (and its aircraft if new) with one available row
    /// per seat of the layout. Returns the flight id.
    pub async fn schedule_flight(&self, flight: &Flight) -> CoreResult<i64> {
        let seats: Vec<String> = flight
            .seat_map()
            .into_iter()
            .map(|(seat, _)| seat.to_string())
            .collect();

        let mut tx = self.store.begin().await?;
        let result = async {
            tx.upsert_aircraft(&AircraftRecord::from(flight.aircraft().as_ref()))
                .await?;
            let flight_id = tx.insert_flight(&FlightRecord::from(flight)).await?;
            tx.seed_seats(flight_id, &seats).await?;
            Ok::<_, CoreError>(flight_id)
        }
        .await;

        let flight_id = finish(tx, result).await?;
        info!(
            "Flight scheduled: {} (id {}, {} seats)",
            flight.flight_number(),
            flight_id,
            seats.len()
        );
        Ok(flight_id)
    }

    /// Persists a flight status change. Once the status blocks seat changes
    /// the flight's seat rows are frozen.
    pub async fn set_flight_status(&self, flight_id: i64, status: FlightStatus) -> CoreResult<()> {
        let mut tx = self.store.begin().await?;
        let result = async {
            let rows = tx.update_flight_status(flight_id, status.as_str()).await?;
            if rows == 0 {
                return Err(CoreError::not_found("Flight", flight_id.to_string()));
            }
            Ok::<_, CoreError>(())
        }
        .await;

        finish(tx, result).await?;
        info!("Flight {} status set to {}", flight_id, status);
        Ok(())
    }

    pub async fn reserve_seat(&self, flight_id: i64, seat: &SeatNumber) -> CoreResult<()> {
        let mut tx = self.store.begin().await?;
        let result = take_seat(tx.as_mut(), flight_id, seat.as_str()).await;
        finish(tx, result).await
    }

    pub async fn release_seat(&self, flight_id: i64, seat: &SeatNumber) -> CoreResult<()> {
        let mut tx = self.store.begin().await?;
        let result = give_back_seat(tx.as_mut(), flight_id, seat.as_str()).await;
        finish(tx, result).await
    }

    /// Takes the ticket's seat and stores the ticket. `flight_id` must be
    /// the stored flight the ticket was issued for. Returns the ticket id.
    pub async fn book_ticket(&self, flight_id: i64, ticket: &Ticket) -> CoreResult<i64> {
        let record = TicketRecord::new(flight_id, ticket);

        let mut tx = self.store.begin().await?;
        let result = async {
            let stored = load_flight(tx.as_mut(), flight_id).await?;
            if !stored.is_for(ticket) {
                return Err(CoreError::FlightMismatch {
                    expected: ticket.flight_key(),
                    actual: stored.key(),
                });
            }
            take_seat(tx.as_mut(), flight_id, &record.seat_number).await?;
            tx.insert_ticket(&record).await
        }
        .await;

        let ticket_id = finish(tx, result).await?;
        info!(
            "Ticket booked: {} seat {} on flight {}",
            record.ticket_number, record.seat_number, flight_id
        );
        Ok(ticket_id)
    }

    pub async fn cancel_ticket(&self, ticket: &mut Ticket, flight: &Flight) -> CoreResult<TicketStatus> {
        self.apply_action(ticket, flight, TicketAction::Cancel).await
    }

    pub async fn refund_ticket(&self, ticket: &mut Ticket, flight: &Flight) -> CoreResult<TicketStatus> {
        self.apply_action(ticket, flight, TicketAction::Refund).await
    }

    /// Moves a stored ticket through `action`. Guards see the stored flight
    /// status, not the one carried by `flight`. The status update and, for
    /// cancel and refund, the seat release share one transaction. `ticket`
    /// is only updated after the commit succeeds.
    pub async fn apply_action(
        &self,
        ticket: &mut Ticket,
        flight: &Flight,
        action: TicketAction,
    ) -> CoreResult<TicketStatus> {
        let from = ticket.status();
        let number = ticket.ticket_number().to_string();
        let stored = self
            .store
            .find_ticket(&number)
            .await?
            .ok_or_else(|| CoreError::not_found("Ticket", number.clone()))?;

        let mut tx = self.store.begin().await?;
        let result = async {
            let flight_status = load_flight(tx.as_mut(), stored.flight_id)
                .await?
                .flight_status()?;
            let mut current = flight.clone();
            if current.status() != flight_status {
                debug!(
                    "Flight {} is {} in the store, {} in memory",
                    flight.flight_number(),
                    flight_status,
                    flight.status()
                );
                current.set_status(flight_status);
            }

            let mut next = ticket.clone();
            let to = next.apply(action, &current)?;

            let rows = tx
                .update_ticket_status(&number, from.as_str(), to.as_str())
                .await?;
            if rows == 0 {
                return Err(CoreError::InvalidTransition {
                    from: stored.status.clone(),
                    to: to.to_string(),
                });
            }
            if action.releases_seat() && from.holds_seat() {
                if flight_status.blocks_seat_changes() {
                    debug!(
                        "Flight {} is {}, seat {} stays as is",
                        stored.flight_id, flight_status, stored.seat_number
                    );
                } else {
                    give_back_seat(tx.as_mut(), stored.flight_id, &stored.seat_number).await?;
                }
            }
            Ok::<_, CoreError>((next, to))
        }
        .await;

        let (next, to) = finish(tx, result).await?;
        *ticket = next;
        Ok(to)
    }

    pub async fn seat_map(&self, flight_id: i64) -> CoreResult<Vec<SeatRow>> {
        self.store.seat_map(flight_id).await
    }

    pub async fn find_ticket(&self, ticket_number: &str) -> CoreResult<Option<TicketRecord>> {
        self.store.find_ticket(ticket_number).await
    }
}

async fn load_flight(tx: &mut dyn StoreTransaction, flight_id: i64) -> CoreResult<FlightRecord> {
    tx.find_flight(flight_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Flight", flight_id.to_string()))
}

/// Flips the seat to taken. Zero affected rows means someone else holds it
/// or the flight no longer allows seat changes.
async fn take_seat(tx: &mut dyn StoreTransaction, flight_id: i64, seat: &str) -> CoreResult<()> {
    let rows = tx.set_seat_availability(flight_id, seat, false).await?;
    if rows == 0 {
        warn!("Seat {} on flight {} not available", seat, flight_id);
        return Err(CoreError::seat_not_available(flight_id.to_string(), seat));
    }
    info!("Seat {} on flight {} reserved", seat, flight_id);
    Ok(())
}

async fn give_back_seat(tx: &mut dyn StoreTransaction, flight_id: i64, seat: &str) -> CoreResult<()> {
    let rows = tx.set_seat_availability(flight_id, seat, true).await?;
    if rows == 0 {
        warn!("Seat {} on flight {} was not reserved", seat, flight_id);
        return Err(CoreError::SeatNotReserved {
            flight: flight_id.to_string(),
            seat: seat.to_string(),
        });
    }
    info!("Seat {} on flight {} released", seat, flight_id);
    Ok(())
}

/// Commits on success, rolls back on failure and returns the original error.
async fn finish<T>(tx: Box<dyn StoreTransaction>, result: CoreResult<T>) -> CoreResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            warn!(code = %e.code(), "Rolling back transaction: {}", e);
            if let Err(rollback_err) = tx.rollback().await {
                error!(code = %rollback_err.code(), "Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
