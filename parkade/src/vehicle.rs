//! Vehicles as they enter the facility.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A parked (or about to be parked) vehicle.
///
/// Identity is the registration number. Color comparisons ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    registration: String,
    color: String,
    parked_at: DateTime<Utc>,
}

impl Vehicle {
    /// Create a vehicle entering now.
    pub fn new(registration: impl Into<String>, color: impl Into<String>) -> Self {
        Self::arrived_at(registration, color, Utc::now())
    }

    /// Create a vehicle with an explicit entry instant.
    pub fn arrived_at(
        registration: impl Into<String>,
        color: impl Into<String>,
        parked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            registration: registration.into(),
            color: color.into(),
            parked_at,
        }
    }

    pub fn registration(&self) -> &str {
        &self.registration
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn parked_at(&self) -> DateTime<Utc> {
        self.parked_at
    }

    pub fn has_color(&self, color: &str) -> bool {
        self.color.to_lowercase() == color.to_lowercase()
    }

    /// Key under which the level indexes this vehicle.
    pub(crate) fn registration_key(&self) -> String {
        registration_key(&self.registration)
    }
}

/// Registrations are unique regardless of case.
pub(crate) fn registration_key(registration: &str) -> String {
    registration.to_uppercase()
}
