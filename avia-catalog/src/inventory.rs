use avia_core::{SeatClassMap, SeatNumber};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-flight seat availability, keyed by seat number in canonical order.
///
/// Owned exclusively by one [`crate::Flight`]; callers only ever get
/// snapshots or shared iterators.
#[derive(Debug, Clone)]
pub struct SeatInventory {
    seats: BTreeMap<SeatNumber, bool>,
}

impl SeatInventory {
    /// Every seat of the layout, all available.
    pub fn initialize(layout: &Arc<SeatClassMap>) -> Self {
        Self {
            seats: SeatNumber::all_for(layout)
                .into_iter()
                .map(|seat| (seat, true))
                .collect(),
        }
    }

    pub fn is_available(&self, seat: &SeatNumber) -> Option<bool> {
        self.seats.get(seat).copied()
    }

    /// Flip an available seat to reserved.
    pub fn reserve(&mut self, seat: &SeatNumber) -> Result<(), InventoryError> {
        let available = self
            .seats
            .get_mut(seat)
            .ok_or_else(|| InventoryError::NotFound(seat.to_string()))?;

        if !*available {
            return Err(InventoryError::AlreadyReserved(seat.to_string()));
        }
        *available = false;
        Ok(())
    }

    /// Flip a reserved seat back to available.
    pub fn release(&mut self, seat: &SeatNumber) -> Result<(), InventoryError> {
        let available = self
            .seats
            .get_mut(seat)
            .ok_or_else(|| InventoryError::NotFound(seat.to_string()))?;

        if *available {
            return Err(InventoryError::NotReserved(seat.to_string()));
        }
        *available = true;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SeatNumber, bool)> {
        self.seats.iter().map(|(seat, &available)| (seat, available))
    }

    pub fn available(&self) -> impl Iterator<Item = &SeatNumber> {
        self.iter()
            .filter_map(|(seat, available)| available.then_some(seat))
    }

    pub fn available_count(&self) -> usize {
        self.seats.values().filter(|&&available| available).count()
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Share of seats reserved, in `[0, 1]`.
    pub fn utilization(&self) -> f64 {
        if self.seats.is_empty() {
            0.0
        } else {
            1.0 - (self.available_count() as f64 / self.seats.len() as f64)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("Seat not found: {0}")]
    NotFound(String),

    #[error("Seat already reserved: {0}")]
    AlreadyReserved(String),

    #[error("Seat is not reserved: {0}")]
    NotReserved(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_lifecycle() {
        let layout = Arc::new(SeatClassMap::create("E:8,B:2").unwrap());
        let mut inventory = SeatInventory::initialize(&layout);
        let seat = SeatNumber::create("E01", &layout).unwrap();

        assert_eq!(inventory.len(), 10);
        assert_eq!(inventory.available_count(), 10);

        inventory.reserve(&seat).unwrap();
        assert_eq!(inventory.is_available(&seat), Some(false));
        assert_eq!(
            inventory.reserve(&seat),
            Err(InventoryError::AlreadyReserved("E01".into()))
        );
        assert!((inventory.utilization() - 0.1).abs() < 0.01);

        inventory.release(&seat).unwrap();
        assert_eq!(
            inventory.release(&seat),
            Err(InventoryError::NotReserved("E01".into()))
        );
        assert_eq!(inventory.available_count(), 10);
    }

    #[test]
    fn test_unknown_seat_width() {
        let layout = Arc::new(SeatClassMap::create("E:8").unwrap());
        let mut inventory = SeatInventory::initialize(&layout);
        // Valid against the layout, but not in the canonical two-digit space.
        let seat = SeatNumber::create("E001", &layout).unwrap();

        assert_eq!(inventory.is_available(&seat), None);
        assert_eq!(inventory.reserve(&seat), Err(InventoryError::NotFound("E001".into())));
    }
}
