use crate::database::DbClient;
use crate::repository::{
    blocked_statuses, AircraftRecord, FlightRecord, PassengerRecord, SeatRow, StoreTransaction,
    TicketRecord, TransactionalStore,
};
use async_trait::async_trait;
use avia_core::{CoreError, CoreResult};
use sqlx::{PgPool, Postgres, Transaction};

/// Maps sqlx failures onto the persistence error codes.
pub fn map_sqlx_error(err: sqlx::Error) -> CoreError {
    match err {
        sqlx::Error::Encode(e) => CoreError::ParamFailed(e.to_string()),
        sqlx::Error::Protocol(msg) => CoreError::PrepareFailed(msg),
        sqlx::Error::Database(e) => CoreError::QueryFailed(e.to_string()),
        sqlx::Error::RowNotFound => CoreError::QueryFailed("no rows returned".into()),
        e @ (sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::TypeNotFound { .. }) => CoreError::QueryFailed(e.to_string()),
        other => CoreError::Database(other.to_string()),
    }
}

fn map_insert_error(err: sqlx::Error, entity: &'static str, id: &str) -> CoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => CoreError::Duplicate {
            entity,
            id: id.to_string(),
        },
        _ => map_sqlx_error(err),
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<&DbClient> for PgStore {
    fn from(client: &DbClient) -> Self {
        Self::new(client.pool.clone())
    }
}

#[async_trait]
impl TransactionalStore for PgStore {
    async fn begin(&self) -> CoreResult<Box<dyn StoreTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(PgTransaction { tx }))
    }

    async fn seat_map(&self, flight_id: i64) -> CoreResult<Vec<SeatRow>> {
        sqlx::query_as::<_, SeatRow>(
            r#"
            SELECT seat_number, is_available
            FROM flight_seats
            WHERE flight_id = $1
            ORDER BY seat_number
            "#,
        )
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn find_ticket(&self, ticket_number: &str) -> CoreResult<Option<TicketRecord>> {
        sqlx::query_as::<_, TicketRecord>(
            r#"
            SELECT ticket_number, passenger_id, flight_id, seat_number,
                   price_amount, price_currency, status
            FROM tickets
            WHERE ticket_number = $1
            "#,
        )
        .bind(ticket_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }
}

pub struct PgTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PgTransaction {
    async fn upsert_aircraft(&mut self, aircraft: &AircraftRecord) -> CoreResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO aircraft (serial_number, model, economy_seats, business_seats, first_seats)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (serial_number) DO NOTHING
            "#,
        )
        .bind(&aircraft.serial_number)
        .bind(&aircraft.model)
        .bind(aircraft.economy_seats)
        .bind(aircraft.business_seats)
        .bind(aircraft.first_seats)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn insert_flight(&mut self, flight: &FlightRecord) -> CoreResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO flights (flight_number, route, departure, arrival, aircraft_serial, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&flight.flight_number)
        .bind(&flight.route)
        .bind(flight.departure)
        .bind(flight.arrival)
        .bind(&flight.aircraft_serial)
        .bind(&flight.status)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_insert_error(e, "Flight", &flight.flight_number))
    }

    async fn find_flight(&mut self, flight_id: i64) -> CoreResult<Option<FlightRecord>> {
        sqlx::query_as::<_, FlightRecord>(
            r#"
            SELECT flight_number, route, departure, arrival, aircraft_serial, status
            FROM flights
            WHERE id = $1
            FOR SHARE
            "#,
        )
        .bind(flight_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)
    }

    async fn update_flight_status(&mut self, flight_id: i64, status: &str) -> CoreResult<u64> {
        let result = sqlx::query("UPDATE flights SET status = $2 WHERE id = $1")
            .bind(flight_id)
            .bind(status)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn seed_seats(&mut self, flight_id: i64, seats: &[String]) -> CoreResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO flight_seats (flight_id, seat_number, is_available)
            SELECT $1, seat, TRUE FROM UNNEST($2::text[]) AS seat
            "#,
        )
        .bind(flight_id)
        .bind(seats)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_insert_error(e, "Seat", &flight_id.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn set_seat_availability(
        &mut self,
        flight_id: i64,
        seat_number: &str,
        available: bool,
    ) -> CoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE flight_seats AS s
            SET is_available = $3
            FROM flights AS f
            WHERE f.id = s.flight_id
              AND s.flight_id = $1
              AND s.seat_number = $2
              AND s.is_available = NOT $3
              AND f.status <> ALL($4::text[])
            "#,
        )
        .bind(flight_id)
        .bind(seat_number)
        .bind(available)
        .bind(blocked_statuses())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn insert_passenger(&mut self, passenger: &PassengerRecord) -> CoreResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO passengers (id, name, email, phone, address, passport)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(passenger.id)
        .bind(&passenger.name)
        .bind(&passenger.email)
        .bind(&passenger.phone)
        .bind(&passenger.address)
        .bind(&passenger.passport)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_insert_error(e, "Passenger", &passenger.id.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn insert_ticket(&mut self, ticket: &TicketRecord) -> CoreResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO tickets (ticket_number, passenger_id, flight_id, seat_number,
                                 price_amount, price_currency, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&ticket.ticket_number)
        .bind(ticket.passenger_id)
        .bind(ticket.flight_id)
        .bind(&ticket.seat_number)
        .bind(ticket.price_amount)
        .bind(&ticket.price_currency)
        .bind(&ticket.status)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_insert_error(e, "Ticket", &ticket.ticket_number))
    }

    async fn update_ticket_status(
        &mut self,
        ticket_number: &str,
        from: &str,
        to: &str,
    ) -> CoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE tickets
            SET status = $3, updated_at = NOW()
            WHERE ticket_number = $1 AND status = $2
            "#,
        )
        .bind(ticket_number)
        .bind(from)
        .bind(to)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> CoreResult<()> {
        let PgTransaction { tx } = *self;
        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn rollback(self: Box<Self>) -> CoreResult<()> {
        let PgTransaction { tx } = *self;
        tx.rollback().await.map_err(map_sqlx_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_error_mapping() {
        assert_eq!(map_sqlx_error(sqlx::Error::RowNotFound).code(), "QUERY_FAILED");
        assert_eq!(
            map_sqlx_error(sqlx::Error::Protocol("bad message".into())).code(),
            "PREPARE_FAILED"
        );
        assert_eq!(map_sqlx_error(sqlx::Error::PoolTimedOut).code(), "DB_ERROR");
        assert_eq!(
            map_sqlx_error(sqlx::Error::Encode("overflow".into())).code(),
            "PARAM_FAILED"
        );
    }
}
