//! Market errors

use hearth_core::{ConfigError, InvariantViolation};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ownership invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("History error: {0}")]
    History(#[from] HistoryError),
}

/// Rejected history payload. The existing history is left untouched.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to parse history payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported history format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("History capacity must be greater than zero")]
    ZeroCapacity,
}

pub type Result<T> = std::result::Result<T, MarketError>;
