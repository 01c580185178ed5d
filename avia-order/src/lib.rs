pub mod lifecycle;
pub mod passenger;
pub mod ticket;

pub use lifecycle::TicketAction;
pub use passenger::Passenger;
pub use ticket::{Ticket, TicketStatus};
