//! Slot identifiers and per-slot occupancy.

use serde::{Deserialize, Serialize};

use crate::vehicle::Vehicle;

/// Slot number within a level, in `1..=capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(u32);

impl SlotId {
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Zero-based position in a level's slot table.
    pub(crate) fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Occupancy of one slot. A slot holds at most one vehicle and owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Slot {
    #[default]
    Free,
    Occupied(Vehicle),
}

impl Slot {
    pub fn is_free(&self) -> bool {
        matches!(self, Slot::Free)
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        match self {
            Slot::Free => None,
            Slot::Occupied(v) => Some(v),
        }
    }

    /// Empty the slot, handing back whatever was parked in it.
    pub fn vacate(&mut self) -> Option<Vehicle> {
        match std::mem::take(self) {
            Slot::Free => None,
            Slot::Occupied(v) => Some(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_id_orders_numerically() {
        assert!(SlotId::new(2) < SlotId::new(10));
        assert_eq!(SlotId::new(7).to_string(), "7");
        assert_eq!(SlotId::new(1).index(), 0);
    }

    #[test]
    fn vacate_returns_vehicle_and_frees_slot() {
        let mut slot = Slot::Occupied(Vehicle::new("KA-01-HH-1234", "White"));
        assert!(!slot.is_free());

        let vehicle = slot.vacate().expect("slot was occupied");
        assert_eq!(vehicle.registration(), "KA-01-HH-1234");
        assert!(slot.is_free());
        assert!(slot.vacate().is_none());
    }

    #[test]
    fn slot_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&SlotId::new(3)).unwrap(), "3");
    }
}
