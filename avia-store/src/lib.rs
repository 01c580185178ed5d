pub mod app_config;
pub mod booking;
pub mod database;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use app_config::{Config, DatabaseConfig};
pub use booking::BookingService;
pub use database::DbClient;
pub use memory::MemoryStore;
pub use postgres::{map_sqlx_error, PgStore};
pub use repository::{
    AircraftRecord, FlightRecord, PassengerRecord, SeatRow, StoreTransaction, TicketRecord,
    TransactionalStore,
};
