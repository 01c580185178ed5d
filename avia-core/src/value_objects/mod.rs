//! Validated, immutable value types.
//!
//! Every type here is only constructible through a validating factory, and
//! compares/hashes on its canonical string form.

mod aircraft_serial;
mod contact_info;
mod flight_number;
mod passport_number;
mod price;
mod route;
mod schedule;
mod seat_class_map;
mod seat_number;
mod ticket_number;

pub use aircraft_serial::{AircraftSerial, AircraftSerialError};
pub use contact_info::{ContactInfo, ContactInfoError};
pub use flight_number::{FlightNumber, FlightNumberError};
pub use passport_number::{PassportNumber, PassportNumberError};
pub use price::{Price, PriceError};
pub use route::{Route, RouteError};
pub use schedule::{Schedule, ScheduleError, SCHEDULE_TIME_FORMAT};
pub use seat_class_map::{SeatClassMap, SeatClassMapError, MAX_SEATS_PER_CLASS};
pub use seat_number::{SeatNumber, SeatNumberError};
pub use ticket_number::{TicketNumber, TicketNumberError};
