//! Runs against a live database only when `AVIA_TEST_DATABASE_URL` is set.

use avia_catalog::{Aircraft, Fleet, Flight, FlightStatus};
use avia_core::{Price, SeatNumber, TicketNumber};
use avia_order::{Passenger, Ticket, TicketStatus};
use avia_store::{BookingService, DatabaseConfig, DbClient, PgStore};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

async fn connect() -> Option<DbClient> {
    let url = std::env::var("AVIA_TEST_DATABASE_URL").ok()?;
    let config = DatabaseConfig {
        url,
        max_connections: 5,
        acquire_timeout_seconds: 3,
        run_migrations: true,
    };
    Some(DbClient::from_config(&config).await.unwrap())
}

// Unique flight per run so reruns don't collide on (flight_number, departure)
fn flight() -> Flight {
    let mut fleet = Fleet::new();
    fleet
        .register(Aircraft::create("VNA350", "Airbus A350", "E:3,B:1").unwrap())
        .unwrap();
    let minute = Utc::now().timestamp() / 60 % 500_000;
    let departure = NaiveDate::from_ymd_opt(2030, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + chrono::TimeDelta::minutes(minute);
    let arrival = departure + chrono::TimeDelta::hours(2);
    let schedule = format!(
        "{}|{}",
        departure.format("%Y-%m-%d %H:%M"),
        arrival.format("%Y-%m-%d %H:%M")
    );
    Flight::create_from_parts(
        "VN350",
        "Ha Noi(HAN)-Da Nang(DAD)",
        &schedule,
        "VNA350",
        &fleet,
    )
    .unwrap()
}

#[tokio::test]
async fn test_postgres_booking_protocol() {
    let Some(client) = connect().await else {
        return;
    };
    let service = Arc::new(BookingService::new(PgStore::from(&client)));
    let flight = flight();
    let flight_id = service.schedule_flight(&flight).await.unwrap();
    assert_eq!(service.seat_map(flight_id).await.unwrap().len(), 4);

    let e01 = SeatNumber::create("E01", flight.aircraft().layout()).unwrap();
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let service = service.clone();
            let seat = e01.clone();
            tokio::spawn(async move { service.reserve_seat(flight_id, &seat).await })
        })
        .collect();
    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        outcomes.into_iter().find_map(Result::err).unwrap().code(),
        "SEAT_NOT_AVAILABLE"
    );
    service.release_seat(flight_id, &e01).await.unwrap();

    let passenger = Passenger::create(
        "Tran Thi B",
        "b.tran@example.com",
        "+84912345678",
        None,
        "VN:87654321",
    )
    .unwrap();
    service.register_passenger(&passenger).await.unwrap();

    let number = TicketNumber::generate(flight.flight_number(), Utc::now().date_naive()).unwrap();
    let mut ticket = Ticket::new(
        number,
        passenger.id,
        &flight,
        "E02",
        Price::create("120.50 USD").unwrap(),
    )
    .unwrap();
    service.book_ticket(flight_id, &ticket).await.unwrap();

    let status = service.cancel_ticket(&mut ticket, &flight).await.unwrap();
    assert_eq!(status, TicketStatus::Cancelled);
    let seats = service.seat_map(flight_id).await.unwrap();
    assert!(seats.iter().all(|row| row.is_available));

    service
        .set_flight_status(flight_id, FlightStatus::Cancelled)
        .await
        .unwrap();
    let err = service.reserve_seat(flight_id, &e01).await.unwrap_err();
    assert_eq!(err.code(), "SEAT_NOT_AVAILABLE");
}
