//! ParkingService: concurrency boundary around the facility registry.
//!
//! Every command runs under one facility-wide reader/writer lock:
//! - park, leave, create and teardown take the write lock
//! - status and lookups take the read lock
//!
//! The lock is held for validation, computation and mutation together, so
//! each command is atomic from the caller's point of view.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::ParkadeConfig;
use crate::error::{ParkingError, Result};
use crate::level::{Departure, LevelId, LotSnapshot, SlotStatus};
use crate::pool::{AllocationStrategy, NearestFirst, SlotId};
use crate::registry::FacilityRegistry;
use crate::vehicle::Vehicle;

/// One level of a facility under construction.
pub struct LevelPlan {
    pub level: LevelId,
    pub capacity: usize,
    pub strategy: Box<dyn AllocationStrategy>,
}

impl LevelPlan {
    pub fn nearest_first(level: LevelId, capacity: usize) -> Self {
        Self {
            level,
            capacity,
            strategy: Box::new(NearestFirst::new()),
        }
    }
}

/// Shared entry point for all callers of one facility.
///
/// The registry is `None` until `create_parking_lot` (or `create_facility`)
/// succeeds; commands issued before that fail with `NotInitialized`.
pub struct ParkingService {
    registry: RwLock<Option<FacilityRegistry>>,
    clock: Arc<dyn Clock>,
    config: ParkadeConfig,
}

impl Default for ParkingService {
    fn default() -> Self {
        Self::new()
    }
}

impl ParkingService {
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(None),
            clock: Arc::new(SystemClock),
            config: ParkadeConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: ParkadeConfig) -> Self {
        self.config = config;
        self
    }

    /// Level the single-lot command surface operates on.
    pub fn default_level(&self) -> LevelId {
        self.config.level
    }

    /// Create the lot on the configured level with nearest-first allocation.
    pub async fn create_parking_lot(&self, capacity: usize) -> Result<()> {
        self.create_facility(vec![LevelPlan::nearest_first(self.config.level, capacity)])
            .await
    }

    /// Build the facility with every level it will ever have.
    ///
    /// Either all levels are provisioned or none are. Once built, the level
    /// count is fixed until `teardown`.
    pub async fn create_facility(&self, plans: Vec<LevelPlan>) -> Result<()> {
        let mut guard = self.registry.write().await;
        if guard.is_some() {
            debug!(levels = plans.len(), "Parking facility already created");
            return Err(ParkingError::AlreadyExists);
        }
        if plans.is_empty() {
            return Err(ParkingError::InvalidCapacity(0));
        }

        let mut registry = FacilityRegistry::new(Arc::clone(&self.clock), self.config.fees);
        for plan in plans {
            let (level, capacity) = (plan.level, plan.capacity);
            registry
                .provision(level, capacity, plan.strategy)
                .inspect_err(|e| debug!(level = %level, error = %e, "Level rejected"))?;
        }
        info!(levels = registry.levels().len(), "Parking facility created");
        *guard = Some(registry);
        Ok(())
    }

    /// Park a vehicle entering now.
    pub async fn park(&self, level: LevelId, registration: &str, color: &str) -> Result<SlotId> {
        let vehicle = Vehicle::arrived_at(registration, color, self.clock.now());
        self.park_vehicle(level, vehicle).await
    }

    pub async fn park_vehicle(&self, level: LevelId, vehicle: Vehicle) -> Result<SlotId> {
        self.write("park", |registry| registry.park(level, vehicle)).await
    }

    /// Release a slot. With `hours` the stated duration is billed, otherwise
    /// the time since the vehicle entered.
    pub async fn leave(&self, level: LevelId, slot: SlotId, hours: Option<u64>) -> Result<Departure> {
        self.write("leave", |registry| match hours {
            Some(hours) => registry.unpark_for_hours(level, slot, hours),
            None => registry.unpark(level, slot),
        })
        .await
    }

    pub async fn status(&self, level: LevelId) -> Result<Vec<SlotStatus>> {
        self.read("status", |registry| registry.status(level)).await
    }

    pub async fn registrations_by_color(&self, level: LevelId, color: &str) -> Result<Vec<String>> {
        self.read("registrations_by_color", |registry| {
            registry.registrations_by_color(level, color)
        })
        .await
    }

    pub async fn slots_by_color(&self, level: LevelId, color: &str) -> Result<Vec<SlotId>> {
        self.read("slots_by_color", |registry| registry.slots_by_color(level, color))
            .await
    }

    pub async fn slot_for_registration(
        &self,
        level: LevelId,
        registration: &str,
    ) -> Result<Option<SlotId>> {
        self.read("slot_for_registration", |registry| {
            registry.slot_for_registration(level, registration)
        })
        .await
    }

    pub async fn available(&self, level: LevelId) -> Result<usize> {
        self.read("available", |registry| registry.available(level)).await
    }

    pub async fn snapshot(&self) -> Result<Vec<LotSnapshot>> {
        self.read("snapshot", FacilityRegistry::snapshot).await
    }

    pub async fn is_created(&self) -> bool {
        self.registry.read().await.is_some()
    }

    /// Tear down every level. A new lot can be created afterwards.
    pub async fn teardown(&self) {
        if let Some(mut registry) = self.registry.write().await.take() {
            registry.teardown_all();
            info!("Parking facility torn down");
        }
    }

    async fn read<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&FacilityRegistry) -> Result<T>,
    ) -> Result<T> {
        let guard = self.registry.read().await;
        let registry = guard.as_ref().ok_or(ParkingError::NotInitialized)?;
        f(registry).inspect_err(|e| debug!(op, error = %e, "Query rejected"))
    }

    async fn write<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut FacilityRegistry) -> Result<T>,
    ) -> Result<T> {
        let mut guard = self.registry.write().await;
        let registry = guard.as_mut().ok_or(ParkingError::NotInitialized)?;
        f(registry).inspect_err(|e| debug!(op, error = %e, "Command rejected"))
    }
}
