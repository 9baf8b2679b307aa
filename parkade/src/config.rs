//! Runtime configuration.
//!
//! Environment variables:
//! - `PARKADE_LEVEL`: level id the command surface operates on (default 1)
//! - `PARKADE_BASE_FEE`: flat fee for the first hours (default 10)
//! - `PARKADE_BASE_HOURS`: hours covered by the flat fee (default 2)
//! - `PARKADE_HOURLY_RATE`: charge per hour beyond that (default 10)

use std::str::FromStr;

use tracing::warn;

use crate::fee::FeeSchedule;
use crate::level::LevelId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParkadeConfig {
    pub level: LevelId,
    pub fees: FeeSchedule,
}

impl ParkadeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their default;
    /// unparseable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let fees = FeeSchedule {
            base_fee: read(&lookup, "PARKADE_BASE_FEE", defaults.fees.base_fee),
            base_hours: read(&lookup, "PARKADE_BASE_HOURS", defaults.fees.base_hours),
            hourly_rate: read(&lookup, "PARKADE_HOURLY_RATE", defaults.fees.hourly_rate),
        };
        let level = LevelId::new(read(&lookup, "PARKADE_LEVEL", defaults.level.get()));
        Self { level, fees }
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, default = %default, "Ignoring unparseable setting");
            default
        }
    }
}
