use crate::aircraft::{Aircraft, Fleet};
use crate::inventory::{InventoryError, SeatInventory};
use avia_core::{
    CoreError, CoreResult, FlightNumber, ParseStatusError, Route, Schedule, SeatNumber,
    ValidationErrors,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    Scheduled,
    Boarding,
    Departed,
    InFlight,
    Landed,
    Cancelled,
    Delayed,
}

impl FlightStatus {
    pub const ALL: [FlightStatus; 7] = [
        FlightStatus::Scheduled,
        FlightStatus::Boarding,
        FlightStatus::Departed,
        FlightStatus::InFlight,
        FlightStatus::Landed,
        FlightStatus::Cancelled,
        FlightStatus::Delayed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "SCHEDULED",
            FlightStatus::Boarding => "BOARDING",
            FlightStatus::Departed => "DEPARTED",
            FlightStatus::InFlight => "IN_FLIGHT",
            FlightStatus::Landed => "LANDED",
            FlightStatus::Cancelled => "CANCELLED",
            FlightStatus::Delayed => "DELAYED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "Scheduled",
            FlightStatus::Boarding => "Boarding",
            FlightStatus::Departed => "Departed",
            FlightStatus::InFlight => "In flight",
            FlightStatus::Landed => "Landed",
            FlightStatus::Cancelled => "Cancelled",
            FlightStatus::Delayed => "Delayed",
        }
    }

    /// Seats can no longer be reserved or released, and tickets can no
    /// longer be confirmed or refunded.
    pub fn blocks_seat_changes(&self) -> bool {
        matches!(
            self,
            FlightStatus::Cancelled
                | FlightStatus::Departed
                | FlightStatus::InFlight
                | FlightStatus::Landed
        )
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError {
                kind: "flight",
                value: s.to_string(),
            })
    }
}

/// A scheduled flight with its own seat inventory.
///
/// Status can be set to any value; what it gates is which seat operations
/// succeed.
#[derive(Debug, Clone)]
pub struct Flight {
    flight_number: FlightNumber,
    route: Route,
    schedule: Schedule,
    aircraft: Arc<Aircraft>,
    seats: SeatInventory,
    status: FlightStatus,
}

impl Flight {
    pub fn new(
        flight_number: FlightNumber,
        route: Route,
        schedule: Schedule,
        aircraft: Arc<Aircraft>,
    ) -> Self {
        let seats = SeatInventory::initialize(aircraft.layout());
        tracing::info!(
            "Created flight {} ({}) on aircraft {} with {} seats",
            flight_number,
            route,
            aircraft.serial(),
            seats.len()
        );
        Self {
            flight_number,
            route,
            schedule,
            aircraft,
            seats,
            status: FlightStatus::Scheduled,
        }
    }

    /// Builds a flight from canonical strings, resolving the aircraft in
    /// `fleet`. Validation problems of all three strings are reported together.
    pub fn create_from_parts(
        flight_number: &str,
        route: &str,
        schedule: &str,
        aircraft_serial: &str,
        fleet: &Fleet,
    ) -> CoreResult<Self> {
        let mut errors = ValidationErrors::new();
        let flight_number = errors.absorb(FlightNumber::create(flight_number));
        let route = errors.absorb(Route::create(route));
        let schedule = errors.absorb(Schedule::create(schedule));

        let (Some(flight_number), Some(route), Some(schedule)) = (flight_number, route, schedule)
        else {
            return Err(errors.into());
        };

        let aircraft = fleet
            .get(aircraft_serial)
            .ok_or_else(|| CoreError::InvalidAircraft(aircraft_serial.to_string()))?;

        Ok(Self::new(flight_number, route, schedule, aircraft))
    }

    pub fn flight_number(&self) -> &FlightNumber {
        &self.flight_number
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn aircraft(&self) -> &Arc<Aircraft> {
        &self.aircraft
    }

    pub fn status(&self) -> FlightStatus {
        self.status
    }

    pub fn set_status(&mut self, status: FlightStatus) {
        debug!("Flight {} status {} -> {}", self.flight_number, self.status, status);
        self.status = status;
    }

    fn seat(&self, seat: &str) -> Option<SeatNumber> {
        SeatNumber::create(seat, self.aircraft.layout()).ok()
    }

    pub fn is_seat_available(&self, seat: &str) -> bool {
        if self.status == FlightStatus::Cancelled {
            return false;
        }
        self.seat(seat)
            .and_then(|seat| self.seats.is_available(&seat))
            .unwrap_or(false)
    }

    /// Reserves `seat`. Returns `false` without touching state when the
    /// flight no longer accepts seat changes or the seat is unknown or taken.
    pub fn reserve_seat(&mut self, seat: &str) -> bool {
        self.change_seat(seat, SeatInventory::reserve)
    }

    /// Symmetric to [`Flight::reserve_seat`].
    pub fn release_seat(&mut self, seat: &str) -> bool {
        self.change_seat(seat, SeatInventory::release)
    }

    fn change_seat(
        &mut self,
        seat: &str,
        op: fn(&mut SeatInventory, &SeatNumber) -> Result<(), InventoryError>,
    ) -> bool {
        if self.status.blocks_seat_changes() {
            debug!("Flight {} is {}, seat {} unchanged", self.flight_number, self.status, seat);
            return false;
        }
        let Some(seat) = self.seat(seat) else {
            return false;
        };
        match op(&mut self.seats, &seat) {
            Ok(()) => true,
            Err(e) => {
                debug!("Flight {}: {}", self.flight_number, e);
                false
            }
        }
    }

    pub fn available_seats(&self) -> impl Iterator<Item = &SeatNumber> {
        self.seats.available()
    }

    pub fn available_seat_count(&self) -> usize {
        self.seats.available_count()
    }

    pub fn total_seat_count(&self) -> usize {
        self.seats.len()
    }

    /// Ordered snapshot of every seat and whether it is available.
    pub fn seat_map(&self) -> Vec<(SeatNumber, bool)> {
        self.seats
            .iter()
            .map(|(seat, available)| (seat.clone(), available))
            .collect()
    }

    /// Same airframe in the air at overlapping times.
    pub fn conflicts_with(&self, other: &Flight) -> bool {
        self.aircraft.serial() == other.aircraft.serial()
            && self.schedule.overlaps_with(&other.schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fleet() -> Fleet {
        let mut fleet = Fleet::new();
        fleet
            .register(Aircraft::create("VNA321", "Airbus A321", "E:2,B:1").unwrap())
            .unwrap();
        fleet
            .register(Aircraft::create("VNB787", "Boeing 787", "E:120,B:20,F:4").unwrap())
            .unwrap();
        fleet
    }

    fn flight(schedule: &str, serial: &str) -> Flight {
        Flight::create_from_parts("VN123", "Ha Noi(HAN)-Ho Chi Minh(SGN)", schedule, serial, &fleet())
            .unwrap()
    }

    fn small_flight() -> Flight {
        flight("2025-06-01 08:00|2025-06-01 10:00", "VNA321")
    }

    #[test]
    fn test_seat_lifecycle_end_to_end() {
        let mut flight = small_flight();
        assert_eq!(flight.total_seat_count(), 3);
        assert_eq!(flight.available_seat_count(), 3);
        assert!(["E01", "E02", "B01"].iter().all(|s| flight.is_seat_available(s)));

        assert!(flight.reserve_seat("E01"));
        assert!(!flight.is_seat_available("E01"));
        assert!(!flight.reserve_seat("E01"));
        assert!(flight.release_seat("E01"));
        assert!(flight.is_seat_available("E01"));
        assert!(flight.reserve_seat("B01"));
        assert!(!flight.is_seat_available("F01"));
    }

    #[test]
    fn test_failed_operations_leave_state_unchanged() {
        let mut flight = small_flight();
        assert!(!flight.release_seat("E02"));
        assert!(!flight.reserve_seat("E03"));
        assert!(!flight.reserve_seat("garbage"));
        assert_eq!(flight.available_seat_count(), 3);

        assert!(flight.reserve_seat("E02"));
        let before = flight.seat_map();
        assert!(!flight.reserve_seat("E02"));
        assert_eq!(flight.seat_map(), before);
    }

    #[test]
    fn test_blocked_statuses_reject_seat_changes() {
        for status in FlightStatus::ALL {
            let mut flight = small_flight();
            assert!(flight.reserve_seat("E02"));
            flight.set_status(status);

            let blocked = status.blocks_seat_changes();
            assert_eq!(flight.reserve_seat("E01"), !blocked, "{status}");
            assert_eq!(flight.release_seat("E02"), !blocked, "{status}");
        }
    }

    #[test]
    fn test_cancelled_flight_has_no_available_seats() {
        let mut flight = small_flight();
        flight.set_status(FlightStatus::Cancelled);
        assert!(!flight.is_seat_available("E01"));

        flight.set_status(FlightStatus::Landed);
        assert!(flight.is_seat_available("E01"));
    }

    #[test]
    fn test_seat_map_is_ordered() {
        let mut flight = small_flight();
        flight.reserve_seat("E02");
        let map: Vec<(String, bool)> = flight
            .seat_map()
            .into_iter()
            .map(|(seat, available)| (seat.to_string(), available))
            .collect();
        assert_eq!(
            map,
            vec![("B01".into(), true), ("E01".into(), true), ("E02".into(), false)]
        );
        let available: Vec<String> = flight.available_seats().map(|s| s.to_string()).collect();
        assert_eq!(available, vec!["B01", "E01"]);
    }

    #[test]
    fn test_wide_layout_uses_three_digits() {
        let mut flight = flight("2025-06-01 08:00|2025-06-01 10:00", "VNB787");
        assert_eq!(flight.total_seat_count(), 144);
        assert!(flight.reserve_seat("E001"));
        assert!(!flight.reserve_seat("E01"));
        assert!(flight.reserve_seat("F04"));
    }

    #[test]
    fn test_create_from_parts_errors() {
        let err = Flight::create_from_parts("vn1", "HAN-SGN", "soon", "VNA321", &fleet()).unwrap_err();
        assert_eq!(err.code(), "INVALID_FORMAT;INVALID_FORMAT;INVALID_FORMAT");

        let err = Flight::create_from_parts(
            "VN123",
            "Ha Noi(HAN)-Ho Chi Minh(SGN)",
            "2025-06-01 08:00|2025-06-01 10:00",
            "VNA999",
            &fleet(),
        )
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_AIRCRAFT");
    }

    #[test]
    fn test_conflicts_with() {
        let a = flight("2025-06-01 08:00|2025-06-01 10:00", "VNA321");
        let b = flight("2025-06-01 09:30|2025-06-01 11:00", "VNA321");
        let c = flight("2025-06-01 09:30|2025-06-01 11:00", "VNB787");
        assert!(a.conflicts_with(&b));
        assert!(!a.conflicts_with(&c));
    }

    proptest! {
        #[test]
        fn prop_seat_operations_follow_model(ops in prop::collection::vec((any::<bool>(), 0usize..3), 0..40)) {
            let mut flight = small_flight();
            let seats = ["B01", "E01", "E02"];
            let mut model = [true; 3];

            for (reserve, idx) in ops {
                if reserve {
                    prop_assert_eq!(flight.reserve_seat(seats[idx]), model[idx]);
                    model[idx] = false;
                } else {
                    prop_assert_eq!(flight.release_seat(seats[idx]), !model[idx]);
                    model[idx] = true;
                }
            }

            for (idx, seat) in seats.iter().enumerate() {
                prop_assert_eq!(flight.is_seat_available(seat), model[idx]);
            }
            prop_assert_eq!(flight.available_seat_count(), model.iter().filter(|&&a| a).count());
        }
    }

    #[test]
    fn test_status_text_forms() {
        assert_eq!(FlightStatus::InFlight.to_string(), "IN_FLIGHT");
        assert_eq!("IN_FLIGHT".parse::<FlightStatus>(), Ok(FlightStatus::InFlight));
        assert!("in_flight".parse::<FlightStatus>().is_err());
        assert_eq!(FlightStatus::InFlight.label(), "In flight");
        assert_eq!(
            serde_json::to_string(&FlightStatus::InFlight).unwrap(),
            "\"IN_FLIGHT\""
        );
    }
}
