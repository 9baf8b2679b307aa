use tracing::debug;

use super::{AllocationStrategy, SlotId};
use crate::error::{ParkingError, Result};

/// Fixed-size pool of slot numbers `1..=capacity`.
///
/// The pool never grows or shrinks after construction; only membership of
/// the free set changes.
#[derive(Debug)]
pub struct SlotPool {
    capacity: u32,
    strategy: Box<dyn AllocationStrategy>,
}

impl SlotPool {
    /// Build a pool with every slot free. Any state the strategy carried
    /// from a previous pool is discarded.
    pub fn new(capacity: u32, mut strategy: Box<dyn AllocationStrategy>) -> Self {
        strategy.clear();
        for n in 1..=capacity {
            strategy.add(SlotId::new(n));
        }
        Self { capacity, strategy }
    }

    pub fn allocate(&mut self) -> Option<SlotId> {
        let slot = self.strategy.take()?;
        debug!(slot = %slot, strategy = self.strategy.name(), "Slot allocated");
        Some(slot)
    }

    /// Return a slot to the free set. Releasing an already-free slot is a no-op.
    pub fn release(&mut self, slot: SlotId) -> Result<()> {
        if !self.in_range(slot) {
            return Err(ParkingError::InvalidSlot(slot));
        }
        self.strategy.add(slot);
        debug!(slot = %slot, "Slot released");
        Ok(())
    }

    pub fn in_range(&self, slot: SlotId) -> bool {
        (1..=self.capacity).contains(&slot.get())
    }

    pub fn is_free(&self, slot: SlotId) -> bool {
        self.strategy.contains(slot)
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.strategy.len()
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Give the strategy back so a later pool can reuse it.
    pub fn into_strategy(self) -> Box<dyn AllocationStrategy> {
        self.strategy
    }
}
