//! Level engine: slot occupancy and business rules for one parking level.
//!
//! A level starts closed. `create` opens it with a fixed number of slots;
//! `teardown` closes it again and it must be re-created before reuse.
//!
//! Invariants while open:
//! - `available` equals the number of `Slot::Free` entries
//! - a registration (compared case-insensitively) occupies at most one slot
//! - a slot number is in the pool's free set iff its entry is `Slot::Free`

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::{ParkingError, Result};
use crate::fee::{Fee, FeeSchedule, billable_hours};
use crate::pool::{AllocationStrategy, NearestFirst, Slot, SlotId, SlotPool};
use crate::vehicle::{Vehicle, registration_key};

/// Largest number of slots a single level can be created with.
pub const MAX_CAPACITY: usize = 1 << 20;

/// Identifier of a parking level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(u32);

impl LevelId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for LevelId {
    fn default() -> Self {
        Self(1)
    }
}

impl std::fmt::Display for LevelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the status table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub slot: SlotId,
    pub registration: String,
    pub color: String,
}

/// Outcome of a vehicle leaving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub slot: SlotId,
    pub vehicle: Vehicle,
    pub hours: u64,
    pub fee: Fee,
}

/// Occupancy summary of one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotSnapshot {
    pub level: LevelId,
    pub capacity: usize,
    pub available: usize,
    pub occupied: usize,
    pub strategy: &'static str,
}

#[derive(Debug)]
struct Lot {
    pool: SlotPool,
    slots: Vec<Slot>,
    available: usize,
    by_registration: HashMap<String, SlotId>,
}

impl Lot {
    fn occupied(&self) -> impl Iterator<Item = (SlotId, &Vehicle)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.vehicle().map(|v| (SlotId::new(i as u32 + 1), v)))
    }
}

pub struct LevelEngine {
    id: LevelId,
    clock: Arc<dyn Clock>,
    fees: FeeSchedule,
    lot: Option<Lot>,
    /// Strategy waiting for the next `create`; handed to the pool while open.
    idle_strategy: Option<Box<dyn AllocationStrategy>>,
}

impl std::fmt::Debug for LevelEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelEngine")
            .field("id", &self.id)
            .field("fees", &self.fees)
            .field("lot", &self.lot)
            .finish_non_exhaustive()
    }
}

impl LevelEngine {
    pub fn new(
        id: LevelId,
        strategy: Box<dyn AllocationStrategy>,
        clock: Arc<dyn Clock>,
        fees: FeeSchedule,
    ) -> Self {
        Self {
            id,
            clock,
            fees,
            lot: None,
            idle_strategy: Some(strategy),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.lot.is_some()
    }

    /// Open the level with `capacity` free slots.
    pub fn create(&mut self, capacity: usize) -> Result<()> {
        if self.lot.is_some() {
            return Err(ParkingError::AlreadyExists);
        }
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(ParkingError::InvalidCapacity(capacity));
        }
        let slot_count =
            u32::try_from(capacity).map_err(|_| ParkingError::InvalidCapacity(capacity))?;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| ParkingError::InvalidCapacity(capacity))?;
        slots.resize(capacity, Slot::Free);

        let strategy = self
            .idle_strategy
            .take()
            .unwrap_or_else(|| Box::new(NearestFirst::new()));

        self.lot = Some(Lot {
            pool: SlotPool::new(slot_count, strategy),
            slots,
            available: capacity,
            by_registration: HashMap::with_capacity(capacity),
        });
        info!(level = %self.id, capacity, "Level created");
        Ok(())
    }

    /// Park `vehicle` in the slot chosen by the allocation strategy.
    ///
    /// All checks run before anything is mutated, so a rejected vehicle
    /// leaves the level untouched.
    pub fn park(&mut self, vehicle: Vehicle) -> Result<SlotId> {
        let lot = self.lot.as_mut().ok_or(ParkingError::NotInitialized)?;
        if lot.available == 0 {
            return Err(ParkingError::LotFull);
        }

        let key = vehicle.registration_key();
        if lot.by_registration.contains_key(&key) {
            return Err(ParkingError::DuplicateVehicle {
                registration: vehicle.registration().to_string(),
            });
        }

        let slot = lot.pool.allocate().ok_or(ParkingError::LotFull)?;
        debug!(
            level = %self.id,
            slot = %slot,
            registration = vehicle.registration(),
            "Vehicle parked"
        );
        lot.slots[slot.index()] = Slot::Occupied(vehicle);
        lot.by_registration.insert(key, slot);
        lot.available -= 1;
        Ok(slot)
    }

    /// Release `slot`, billing the time since the vehicle entered.
    pub fn unpark(&mut self, slot: SlotId) -> Result<Departure> {
        let now = self.clock.now();
        let vehicle = self.vacate(slot)?;
        let hours = billable_hours(now - vehicle.parked_at());
        Ok(self.depart(slot, vehicle, hours))
    }

    /// Release `slot`, billing an explicitly stated number of hours.
    pub fn unpark_for_hours(&mut self, slot: SlotId, hours: u64) -> Result<Departure> {
        let vehicle = self.vacate(slot)?;
        Ok(self.depart(slot, vehicle, hours))
    }

    fn vacate(&mut self, slot: SlotId) -> Result<Vehicle> {
        let lot = self.lot.as_mut().ok_or(ParkingError::NotInitialized)?;
        if !lot.pool.in_range(slot) {
            return Err(ParkingError::InvalidSlot(slot));
        }
        let vehicle = lot.slots[slot.index()]
            .vacate()
            .ok_or(ParkingError::SlotAlreadyEmpty(slot))?;

        lot.pool.release(slot)?;
        lot.by_registration.remove(&vehicle.registration_key());
        lot.available += 1;
        Ok(vehicle)
    }

    fn depart(&self, slot: SlotId, vehicle: Vehicle, hours: u64) -> Departure {
        let fee = self.fees.fee_for_hours(hours);
        debug!(
            level = %self.id,
            slot = %slot,
            registration = vehicle.registration(),
            hours,
            fee = %fee,
            "Vehicle left"
        );
        Departure {
            slot,
            vehicle,
            hours,
            fee,
        }
    }

    /// Occupied slots in ascending slot order.
    pub fn status(&self) -> Result<Vec<SlotStatus>> {
        let lot = self.open()?;
        Ok(lot
            .occupied()
            .map(|(slot, v)| SlotStatus {
                slot,
                registration: v.registration().to_string(),
                color: v.color().to_string(),
            })
            .collect())
    }

    pub fn registrations_by_color(&self, color: &str) -> Result<Vec<String>> {
        let lot = self.open()?;
        Ok(lot
            .occupied()
            .filter(|(_, v)| v.has_color(color))
            .map(|(_, v)| v.registration().to_string())
            .collect())
    }

    pub fn slots_by_color(&self, color: &str) -> Result<Vec<SlotId>> {
        let lot = self.open()?;
        Ok(lot
            .occupied()
            .filter(|(_, v)| v.has_color(color))
            .map(|(slot, _)| slot)
            .collect())
    }

    pub fn slot_for_registration(&self, registration: &str) -> Result<Option<SlotId>> {
        let lot = self.open()?;
        Ok(lot
            .by_registration
            .get(&registration_key(registration))
            .copied())
    }

    pub fn available(&self) -> Result<usize> {
        Ok(self.open()?.available)
    }

    pub fn capacity(&self) -> usize {
        self.lot.as_ref().map_or(0, |lot| lot.slots.len())
    }

    pub fn occupied(&self) -> usize {
        self.lot
            .as_ref()
            .map_or(0, |lot| lot.slots.len() - lot.available)
    }

    pub fn snapshot(&self) -> Result<LotSnapshot> {
        let lot = self.open()?;
        Ok(LotSnapshot {
            level: self.id,
            capacity: lot.slots.len(),
            available: lot.available,
            occupied: lot.slots.len() - lot.available,
            strategy: lot.pool.strategy_name(),
        })
    }

    /// Drop all slot state. Parked vehicles are discarded.
    pub fn teardown(&mut self) {
        if let Some(lot) = self.lot.take() {
            info!(level = %self.id, occupied = lot.slots.len() - lot.available, "Level torn down");
            self.idle_strategy = Some(lot.pool.into_strategy());
        }
    }

    fn open(&self) -> Result<&Lot> {
        self.lot.as_ref().ok_or(ParkingError::NotInitialized)
    }
}
