//! Hearth Core Domain
//!
//! Pure domain types for the Hearth housing market simulation.
//! This crate contains no I/O and is 100% unit testable: randomness is always
//! drawn from a caller-supplied generator.

pub mod config;
pub mod entities;
pub mod error;
pub mod sampling;

// Re-export commonly used types at crate root
pub use config::MarketConfig;
pub use entities::{
    Dwelling, DwellingId, DwellingState, DwellingView, MIN_DWELLING_VALUE, MarketRegistry,
    Participant, ParticipantId,
};
pub use error::{ConfigError, InvariantViolation};
pub use sampling::{pick_k_without_replacement, sample_price, sample_wealth};
