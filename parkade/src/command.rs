//! Text command surface: parse a line, run it against the service, render
//! the outcome.
//!
//! Verbs are case-sensitive and arguments are whitespace-separated. Unknown
//! verbs are ignored rather than reported.

use tracing::debug;

use crate::error::{ParkingError, Result};
use crate::level::{Departure, SlotStatus};
use crate::pool::SlotId;
use crate::service::ParkingService;

pub const CREATE_PARKING_LOT: &str = "create_parking_lot";
pub const PARK: &str = "park";
pub const LEAVE: &str = "leave";
pub const STATUS: &str = "status";
pub const REGISTRATION_NUMBERS_FOR_COLOR: &str = "registration_numbers_for_cars_with_color";
pub const SLOT_NUMBERS_FOR_COLOR: &str = "slot_numbers_for_cars_with_color";
pub const SLOT_NUMBER_FOR_REGISTRATION: &str = "slot_number_for_registration_number";

const NOT_FOUND: &str = "Not Found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateParkingLot { capacity: usize },
    Park { registration: String, color: String },
    Leave { slot: SlotId, hours: Option<u64> },
    Status,
    RegistrationNumbersForColor { color: String },
    SlotNumbersForColor { color: String },
    SlotNumberForRegistration { registration: String },
}

impl Command {
    /// Parse one input line.
    ///
    /// Blank lines and unknown verbs yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut tokens = line.split_whitespace();
        let Some(verb) = tokens.next() else {
            return Ok(None);
        };

        let command = match verb {
            CREATE_PARKING_LOT => Command::CreateParkingLot {
                capacity: number(arg(&mut tokens, CREATE_PARKING_LOT, "capacity")?, "capacity")?,
            },
            PARK => Command::Park {
                registration: arg(&mut tokens, PARK, "registration_number")?.to_string(),
                color: arg(&mut tokens, PARK, "color")?.to_string(),
            },
            LEAVE => {
                let slot = number(arg(&mut tokens, LEAVE, "slot_number")?, "slot_number")?;
                let hours = tokens.next().map(|raw| number(raw, "hours")).transpose()?;
                Command::Leave {
                    slot: SlotId::new(slot),
                    hours,
                }
            }
            STATUS => Command::Status,
            REGISTRATION_NUMBERS_FOR_COLOR => Command::RegistrationNumbersForColor {
                color: arg(&mut tokens, REGISTRATION_NUMBERS_FOR_COLOR, "color")?.to_string(),
            },
            SLOT_NUMBERS_FOR_COLOR => Command::SlotNumbersForColor {
                color: arg(&mut tokens, SLOT_NUMBERS_FOR_COLOR, "color")?.to_string(),
            },
            SLOT_NUMBER_FOR_REGISTRATION => Command::SlotNumberForRegistration {
                registration: arg(&mut tokens, SLOT_NUMBER_FOR_REGISTRATION, "registration_number")?
                    .to_string(),
            },
            other => {
                debug!(verb = other, "Ignoring unknown command");
                return Ok(None);
            }
        };
        Ok(Some(command))
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Command::CreateParkingLot { .. } => CREATE_PARKING_LOT,
            Command::Park { .. } => PARK,
            Command::Leave { .. } => LEAVE,
            Command::Status => STATUS,
            Command::RegistrationNumbersForColor { .. } => REGISTRATION_NUMBERS_FOR_COLOR,
            Command::SlotNumbersForColor { .. } => SLOT_NUMBERS_FOR_COLOR,
            Command::SlotNumberForRegistration { .. } => SLOT_NUMBER_FOR_REGISTRATION,
        }
    }
}

fn arg<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    verb: &'static str,
    field: &'static str,
) -> Result<&'a str> {
    tokens
        .next()
        .ok_or(ParkingError::MissingArgument { verb, field })
}

fn number<T: std::str::FromStr>(raw: &str, field: &'static str) -> Result<T> {
    raw.parse().map_err(|_| ParkingError::InvalidValue { field })
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created { capacity: usize },
    Parked { slot: SlotId },
    Left(Departure),
    Status(Vec<SlotStatus>),
    Registrations(Vec<String>),
    Slots(Vec<SlotId>),
    Slot(Option<SlotId>),
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Created { capacity } => {
                write!(f, "Created parking lot with {capacity} slots")
            }
            Outcome::Parked { slot } => write!(f, "Allocated slot number: {slot}"),
            Outcome::Left(departure) => write!(
                f,
                "Slot number {} is free with charge {}",
                departure.slot, departure.fee
            ),
            Outcome::Status(rows) => {
                write!(f, "Slot No.\tRegistration No.\tColor")?;
                if rows.is_empty() {
                    return write!(f, "\nSorry, parking lot is empty.");
                }
                for row in rows {
                    write!(f, "\n{}\t\t{}\t\t{}", row.slot, row.registration, row.color)?;
                }
                Ok(())
            }
            Outcome::Registrations(registrations) => {
                if registrations.is_empty() {
                    f.write_str(NOT_FOUND)
                } else {
                    f.write_str(&registrations.join(","))
                }
            }
            Outcome::Slots(slots) => {
                if slots.is_empty() {
                    return f.write_str(NOT_FOUND);
                }
                let joined: Vec<String> = slots.iter().map(SlotId::to_string).collect();
                f.write_str(&joined.join(","))
            }
            Outcome::Slot(Some(slot)) => write!(f, "{slot}"),
            Outcome::Slot(None) => f.write_str(NOT_FOUND),
        }
    }
}

/// Run a parsed command against the service's configured level.
pub async fn dispatch(service: &ParkingService, command: Command) -> Result<Outcome> {
    let level = service.default_level();
    match command {
        Command::CreateParkingLot { capacity } => {
            service.create_parking_lot(capacity).await?;
            Ok(Outcome::Created { capacity })
        }
        Command::Park {
            registration,
            color,
        } => {
            let slot = service.park(level, &registration, &color).await?;
            Ok(Outcome::Parked { slot })
        }
        Command::Leave { slot, hours } => {
            let departure = service.leave(level, slot, hours).await?;
            Ok(Outcome::Left(departure))
        }
        Command::Status => Ok(Outcome::Status(service.status(level).await?)),
        Command::RegistrationNumbersForColor { color } => Ok(Outcome::Registrations(
            service.registrations_by_color(level, &color).await?,
        )),
        Command::SlotNumbersForColor { color } => {
            Ok(Outcome::Slots(service.slots_by_color(level, &color).await?))
        }
        Command::SlotNumberForRegistration { registration } => Ok(Outcome::Slot(
            service.slot_for_registration(level, &registration).await?,
        )),
    }
}

/// Parse and run one line. `Ok(None)` means the line was ignored.
pub async fn execute(service: &ParkingService, line: &str) -> Result<Option<Outcome>> {
    match Command::parse(line)? {
        Some(command) => dispatch(service, command).await.map(Some),
        None => Ok(None),
    }
}
