//! Domain errors for the parking engine.
//!
//! Every variant is recoverable: the command boundary prints the message and
//! moves on to the next command.

use thiserror::Error;

use crate::level::LevelId;
use crate::pool::SlotId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParkingError {
    #[error("Sorry, parking lot is not created")]
    NotInitialized,

    #[error("Sorry, parking lot is already created")]
    AlreadyExists,

    #[error("Invalid capacity {0}: a parking lot needs between 1 and {max} slots", max = crate::level::MAX_CAPACITY)]
    InvalidCapacity(usize),

    #[error("Sorry, parking lot is full")]
    LotFull,

    #[error("Sorry, vehicle {registration} is already parked.")]
    DuplicateVehicle { registration: String },

    #[error("Invalid slot number {0}")]
    InvalidSlot(SlotId),

    #[error("Slot number {0} is Empty Already.")]
    SlotAlreadyEmpty(SlotId),

    #[error("Unknown parking level {0}")]
    UnknownLevel(LevelId),

    #[error("Invalid value for {field}")]
    InvalidValue { field: &'static str },

    #[error("Missing argument {field} for '{verb}'")]
    MissingArgument {
        verb: &'static str,
        field: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ParkingError>;
