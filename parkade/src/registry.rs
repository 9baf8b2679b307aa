//! Facility registry: the set of levels and routing of level-scoped calls.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::error::{ParkingError, Result};
use crate::fee::FeeSchedule;
use crate::level::{Departure, LevelEngine, LevelId, LotSnapshot, SlotStatus};
use crate::pool::{AllocationStrategy, SlotId};
use crate::vehicle::Vehicle;

/// Owns every level of one facility.
///
/// Levels share the facility's clock and fee schedule. Levels are added with
/// `provision` while the facility is being built; the service never exposes a
/// built registry for provisioning, so the level count stays fixed until
/// `teardown_all`.
#[derive(Debug)]
pub struct FacilityRegistry {
    levels: BTreeMap<LevelId, LevelEngine>,
    clock: Arc<dyn Clock>,
    fees: FeeSchedule,
}

impl Default for FacilityRegistry {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), FeeSchedule::default())
    }
}

impl FacilityRegistry {
    pub fn new(clock: Arc<dyn Clock>, fees: FeeSchedule) -> Self {
        Self {
            levels: BTreeMap::new(),
            clock,
            fees,
        }
    }

    /// Create and open a level. A level id can only be provisioned once.
    pub fn provision(
        &mut self,
        level: LevelId,
        capacity: usize,
        strategy: Box<dyn AllocationStrategy>,
    ) -> Result<()> {
        if self.levels.contains_key(&level) {
            return Err(ParkingError::AlreadyExists);
        }

        let mut engine = LevelEngine::new(level, strategy, Arc::clone(&self.clock), self.fees);
        engine.create(capacity)?;
        self.levels.insert(level, engine);
        info!(level = %level, capacity, "Level provisioned");
        Ok(())
    }

    pub fn park(&mut self, level: LevelId, vehicle: Vehicle) -> Result<SlotId> {
        self.level_mut(level)?.park(vehicle)
    }

    pub fn unpark(&mut self, level: LevelId, slot: SlotId) -> Result<Departure> {
        self.level_mut(level)?.unpark(slot)
    }

    pub fn unpark_for_hours(
        &mut self,
        level: LevelId,
        slot: SlotId,
        hours: u64,
    ) -> Result<Departure> {
        self.level_mut(level)?.unpark_for_hours(slot, hours)
    }

    pub fn status(&self, level: LevelId) -> Result<Vec<SlotStatus>> {
        self.level(level)?.status()
    }

    pub fn registrations_by_color(&self, level: LevelId, color: &str) -> Result<Vec<String>> {
        self.level(level)?.registrations_by_color(color)
    }

    pub fn slots_by_color(&self, level: LevelId, color: &str) -> Result<Vec<SlotId>> {
        self.level(level)?.slots_by_color(color)
    }

    pub fn slot_for_registration(
        &self,
        level: LevelId,
        registration: &str,
    ) -> Result<Option<SlotId>> {
        self.level(level)?.slot_for_registration(registration)
    }

    pub fn available(&self, level: LevelId) -> Result<usize> {
        self.level(level)?.available()
    }

    /// Provisioned level ids, ascending.
    pub fn levels(&self) -> Vec<LevelId> {
        self.levels.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn snapshot(&self) -> Result<Vec<LotSnapshot>> {
        self.levels.values().map(LevelEngine::snapshot).collect()
    }

    pub fn teardown_all(&mut self) {
        for engine in self.levels.values_mut() {
            engine.teardown();
        }
        self.levels.clear();
    }

    fn level(&self, level: LevelId) -> Result<&LevelEngine> {
        self.levels
            .get(&level)
            .ok_or(ParkingError::UnknownLevel(level))
    }

    fn level_mut(&mut self, level: LevelId) -> Result<&mut LevelEngine> {
        self.levels
            .get_mut(&level)
            .ok_or(ParkingError::UnknownLevel(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::NearestFirst;

    const GROUND: LevelId = LevelId::new(1);
    const FIRST: LevelId = LevelId::new(2);

    fn nearest() -> Box<dyn AllocationStrategy> {
        Box::new(NearestFirst::new())
    }

    #[test]
    fn provision_twice_fails() {
        let mut registry = FacilityRegistry::default();
        registry.provision(GROUND, 2, nearest()).unwrap();
        assert_eq!(
            registry.provision(GROUND, 4, nearest()),
            Err(ParkingError::AlreadyExists)
        );
        assert_eq!(registry.available(GROUND), Ok(2));
    }

    #[test]
    fn failed_provision_registers_nothing() {
        let mut registry = FacilityRegistry::default();
        assert_eq!(
            registry.provision(GROUND, 0, nearest()),
            Err(ParkingError::InvalidCapacity(0))
        );
        assert!(registry.is_empty());
        registry.provision(GROUND, 1, nearest()).unwrap();
    }

    #[test]
    fn unknown_level_is_reported() {
        let mut registry = FacilityRegistry::default();
        registry.provision(GROUND, 2, nearest()).unwrap();

        assert_eq!(
            registry.park(FIRST, Vehicle::new("KA-01", "White")),
            Err(ParkingError::UnknownLevel(FIRST))
        );
        assert_eq!(
            registry.unpark(FIRST, SlotId::new(1)),
            Err(ParkingError::UnknownLevel(FIRST))
        );
        assert_eq!(
            registry.status(FIRST),
            Err(ParkingError::UnknownLevel(FIRST))
        );
        assert_eq!(
            registry.slot_for_registration(FIRST, "KA-01"),
            Err(ParkingError::UnknownLevel(FIRST))
        );
    }

    #[test]
    fn levels_are_independent() {
        let mut registry = FacilityRegistry::default();
        registry.provision(GROUND, 1, nearest()).unwrap();
        registry.provision(FIRST, 2, nearest()).unwrap();
        assert_eq!(registry.levels(), vec![GROUND, FIRST]);

        assert_eq!(
            registry.park(GROUND, Vehicle::new("KA-01", "Red")),
            Ok(SlotId::new(1))
        );
        assert_eq!(
            registry.park(GROUND, Vehicle::new("KA-02", "Red")),
            Err(ParkingError::LotFull)
        );
        assert_eq!(
            registry.park(FIRST, Vehicle::new("KA-02", "Red")),
            Ok(SlotId::new(1))
        );

        assert_eq!(
            registry.registrations_by_color(FIRST, "red"),
            Ok(vec!["KA-02".to_string()])
        );
        assert_eq!(registry.slots_by_color(GROUND, "RED"), Ok(vec![SlotId::new(1)]));

        let departure = registry.unpark_for_hours(FIRST, SlotId::new(1), 4).unwrap();
        assert_eq!(departure.fee.amount(), 30);
        assert_eq!(registry.available(FIRST), Ok(2));
        assert_eq!(registry.available(GROUND), Ok(0));
    }

    #[test]
    fn teardown_all_clears_levels() {
        let mut registry = FacilityRegistry::default();
        registry.provision(GROUND, 2, nearest()).unwrap();
        registry
            .park(GROUND, Vehicle::new("KA-01", "White"))
            .unwrap();

        registry.teardown_all();
        assert!(registry.is_empty());
        assert_eq!(
            registry.status(GROUND),
            Err(ParkingError::UnknownLevel(GROUND))
        );

        registry.provision(GROUND, 3, nearest()).unwrap();
        assert_eq!(registry.status(GROUND), Ok(vec![]));
    }

    #[test]
    fn snapshot_lists_levels_in_order() {
        let mut registry = FacilityRegistry::default();
        registry.provision(FIRST, 4, nearest()).unwrap();
        registry.provision(GROUND, 2, nearest()).unwrap();
        registry
            .park(FIRST, Vehicle::new("KA-01", "White"))
            .unwrap();

        insta::assert_json_snapshot!(registry.snapshot().unwrap(), @r###"
        [
          {
            "level": 1,
            "capacity": 2,
            "available": 2,
            "occupied": 0,
            "strategy": "nearest_first"
          },
          {
            "level": 2,
            "capacity": 4,
            "available": 3,
            "occupied": 1,
            "strategy": "nearest_first"
          }
        ]
        "###);
    }
}
