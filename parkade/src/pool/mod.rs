//! Slot pool for a single parking level.
//!
//! The pool only knows which slot numbers are free. Which free slot a new
//! vehicle receives is decided by an [`AllocationStrategy`]:
//! - `NearestFirst` hands out the smallest free slot number
//! - other policies plug in through the same trait without touching the level

mod slot;
mod slot_pool;
mod strategy;

pub use slot::{Slot, SlotId};
pub use slot_pool::SlotPool;
pub use strategy::{AllocationStrategy, NearestFirst};
