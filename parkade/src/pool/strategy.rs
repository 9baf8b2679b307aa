//! Allocation strategies: which free slot does the next vehicle get?

use std::collections::BTreeSet;

use super::SlotId;

/// Selection policy over the set of free slots.
///
/// Implementations hold the free set themselves so each policy can pick the
/// structure that makes its own selection cheap.
pub trait AllocationStrategy: std::fmt::Debug + Send + Sync {
    /// Short name used in logs and snapshots.
    fn name(&self) -> &'static str;

    /// Mark `slot` free. Adding a slot that is already free is a no-op.
    fn add(&mut self, slot: SlotId);

    /// Choose the next slot and remove it from the free set.
    fn take(&mut self) -> Option<SlotId>;

    fn contains(&self, slot: SlotId) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

/// Always hands out the smallest free slot number (closest to the entrance).
#[derive(Debug, Default)]
pub struct NearestFirst {
    free: BTreeSet<SlotId>,
}

impl NearestFirst {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AllocationStrategy for NearestFirst {
    fn name(&self) -> &'static str {
        "nearest_first"
    }

    fn add(&mut self, slot: SlotId) {
        self.free.insert(slot);
    }

    fn take(&mut self) -> Option<SlotId> {
        self.free.pop_first()
    }

    fn contains(&self, slot: SlotId) -> bool {
        self.free.contains(&slot)
    }

    fn len(&self) -> usize {
        self.free.len()
    }

    fn clear(&mut self) {
        self.free.clear();
    }
}
