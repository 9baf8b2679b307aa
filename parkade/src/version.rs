//! Version information for parkade.

/// Parkade version from Cargo.toml
pub const PARKADE_VERSION: &str = env!("CARGO_PKG_VERSION");
