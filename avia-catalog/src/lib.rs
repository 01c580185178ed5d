pub mod aircraft;
pub mod flight;
pub mod inventory;
pub mod shared;

pub use aircraft::{Aircraft, Fleet};
pub use flight::{Flight, FlightStatus};
pub use inventory::{InventoryError, SeatInventory};
pub use shared::SharedFlight;
