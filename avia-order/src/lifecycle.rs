use crate::ticket::{flight_key, Ticket, TicketStatus};
use avia_catalog::Flight;
use avia_core::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything that can happen to a ticket after booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketAction {
    Confirm,
    Cancel,
    Refund,
    CheckIn,
    Board,
    Complete,
}

impl TicketAction {
    pub const ALL: [TicketAction; 6] = [
        TicketAction::Confirm,
        TicketAction::Cancel,
        TicketAction::Refund,
        TicketAction::CheckIn,
        TicketAction::Board,
        TicketAction::Complete,
    ];

    /// Status the ticket ends up in when the action succeeds.
    pub fn target(&self) -> TicketStatus {
        match self {
            TicketAction::Confirm => TicketStatus::Confirmed,
            TicketAction::Cancel => TicketStatus::Cancelled,
            TicketAction::Refund => TicketStatus::Refunded,
            TicketAction::CheckIn => TicketStatus::CheckedIn,
            TicketAction::Board => TicketStatus::Boarded,
            TicketAction::Complete => TicketStatus::Completed,
        }
    }

    /// Cancelling or refunding gives the seat back.
    pub fn releases_seat(&self) -> bool {
        matches!(self, TicketAction::Cancel | TicketAction::Refund)
    }
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TicketAction::Confirm => "CONFIRM",
            TicketAction::Cancel => "CANCEL",
            TicketAction::Refund => "REFUND",
            TicketAction::CheckIn => "CHECK_IN",
            TicketAction::Board => "BOARD",
            TicketAction::Complete => "COMPLETE",
        };
        f.write_str(name)
    }
}

impl Ticket {
    /// Whether `action` is legal right now against `flight`.
    pub fn can_apply(&self, action: TicketAction, flight: &Flight) -> bool {
        let flight_status = flight.status();
        match action {
            TicketAction::Confirm => {
                self.status() == TicketStatus::Pending && !flight_status.blocks_seat_changes()
            }
            TicketAction::Cancel => self.can_be_cancelled(),
            TicketAction::Refund => self.can_be_refunded(flight_status),
            TicketAction::CheckIn => self.can_be_checked_in(flight_status),
            TicketAction::Board => self.can_be_boarded(flight_status),
            TicketAction::Complete => self.can_be_completed(flight_status),
        }
    }

    /// Runs `action` through its guard and moves the ticket to the target
    /// status. The ticket is untouched on error.
    pub fn apply(&mut self, action: TicketAction, flight: &Flight) -> CoreResult<TicketStatus> {
        if !self.is_for(flight) {
            return Err(CoreError::FlightMismatch {
                expected: self.flight_key(),
                actual: flight_key(flight.flight_number(), flight.schedule().departure()),
            });
        }

        let target = action.target();
        if !self.can_apply(action, flight) {
            return Err(CoreError::InvalidTransition {
                from: self.status().to_string(),
                to: target.to_string(),
            });
        }

        tracing::info!(
            "Ticket {} {} -> {} ({})",
            self.ticket_number(),
            self.status(),
            target,
            action
        );
        self.set_status(target);
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::tests::{flight, ticket};
    use avia_catalog::FlightStatus;

    #[test]
    fn test_ticket_lifecycle() {
        let mut flight = flight();
        let mut ticket = ticket(&flight);

        // Pending → Confirmed
        assert_eq!(ticket.apply(TicketAction::Confirm, &flight).unwrap(), TicketStatus::Confirmed);

        // Confirmed → CheckedIn → Boarded once boarding opens
        assert!(ticket.apply(TicketAction::CheckIn, &flight).is_err());
        flight.set_status(FlightStatus::Boarding);
        ticket.apply(TicketAction::CheckIn, &flight).unwrap();
        ticket.apply(TicketAction::Board, &flight).unwrap();

        // Boarded → Completed after landing
        flight.set_status(FlightStatus::Landed);
        ticket.apply(TicketAction::Complete, &flight).unwrap();
        assert_eq!(ticket.status(), TicketStatus::Completed);
    }

    #[test]
    fn test_invalid_transition_leaves_ticket_unchanged() {
        let flight = flight();
        let mut ticket = ticket(&flight);

        let err = ticket.apply(TicketAction::Refund, &flight).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidTransition {
                from: "PENDING".into(),
                to: "REFUNDED".into()
            }
        );
        assert_eq!(ticket.status(), TicketStatus::Pending);
    }

    #[test]
    fn test_confirm_blocked_by_closed_flight() {
        let mut flight = flight();
        let mut ticket = ticket(&flight);
        flight.set_status(FlightStatus::Cancelled);

        assert_eq!(
            ticket.apply(TicketAction::Confirm, &flight).unwrap_err().code(),
            "INVALID_TRANSITION"
        );
        // Cancelling is still possible.
        assert_eq!(ticket.apply(TicketAction::Cancel, &flight).unwrap(), TicketStatus::Cancelled);
        assert!(ticket.apply(TicketAction::Cancel, &flight).is_err());
    }

    #[test]
    fn test_flight_mismatch() {
        let flight = flight();
        let mut ticket = ticket(&flight);

        let mut fleet = avia_catalog::Fleet::new();
        fleet
            .register(avia_catalog::Aircraft::create("VNA350", "Airbus A350", "E:2,B:1").unwrap())
            .unwrap();
        let other = Flight::create_from_parts(
            "VN456",
            "Ha Noi(HAN)-Da Nang(DAD)",
            "2025-06-02 08:00|2025-06-02 09:00",
            "VNA350",
            &fleet,
        )
        .unwrap();

        assert_eq!(
            ticket.apply(TicketAction::Confirm, &other).unwrap_err().code(),
            "FLIGHT_MISMATCH"
        );
        assert_eq!(ticket.status(), TicketStatus::Pending);
    }

    #[test]
    fn test_same_number_other_departure_is_a_different_flight() {
        let mut day1 = flight();
        let mut ticket = ticket(&day1);
        ticket.apply(TicketAction::Confirm, &day1).unwrap();

        let mut fleet = avia_catalog::Fleet::new();
        fleet.register(day1.aircraft().as_ref().clone()).unwrap();
        let mut day2 = Flight::create_from_parts(
            "VN123",
            "Ha Noi(HAN)-Ho Chi Minh(SGN)",
            "2025-06-02 08:00|2025-06-02 10:00",
            "VNA321",
            &fleet,
        )
        .unwrap();
        day2.set_status(FlightStatus::Boarding);

        let err = ticket.apply(TicketAction::CheckIn, &day2).unwrap_err();
        assert_eq!(
            err,
            CoreError::FlightMismatch {
                expected: "VN123 2025-06-01 08:00".into(),
                actual: "VN123 2025-06-02 08:00".into(),
            }
        );
        assert_eq!(ticket.status(), TicketStatus::Confirmed);
        assert!(!ticket.is_for(&day2));

        day1.set_status(FlightStatus::Boarding);
        assert_eq!(ticket.apply(TicketAction::CheckIn, &day1).unwrap(), TicketStatus::CheckedIn);
    }

    #[test]
    fn test_apply_agrees_with_guards() {
        let mut flight = flight();
        for flight_status in FlightStatus::ALL {
            flight.set_status(flight_status);
            for ticket_status in TicketStatus::ALL {
                for action in TicketAction::ALL {
                    let mut ticket = ticket(&flight);
                    ticket.set_status(ticket_status);
                    let allowed = ticket.can_apply(action, &flight);
                    let result = ticket.apply(action, &flight);

                    assert_eq!(result.is_ok(), allowed, "{ticket_status} {action} on {flight_status}");
                    let expected = if allowed { action.target() } else { ticket_status };
                    assert_eq!(ticket.status(), expected);
                }
            }
        }
    }
}
