//! parkade: slot-allocation engine for a multi-level parking facility.

mod clock;
mod config;
mod error;
mod fee;
mod level;
mod registry;
mod vehicle;
mod version;

pub mod command;
pub mod pool;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{Command, Outcome, dispatch, execute};
pub use config::ParkadeConfig;
pub use error::{ParkingError, Result};
pub use fee::{Fee, FeeSchedule, billable_hours};
pub use level::{Departure, LevelEngine, LevelId, LotSnapshot, MAX_CAPACITY, SlotStatus};
pub use pool::{AllocationStrategy, NearestFirst, Slot, SlotId, SlotPool};
pub use registry::FacilityRegistry;
pub use service::{LevelPlan, ParkingService};
pub use vehicle::Vehicle;
pub use version::PARKADE_VERSION;
