pub mod pii;
pub mod registry;

pub use pii::Masked;
pub use registry::{CountryRegistry, CurrencyRegistry, SeatClass, SeatClassRegistry};
