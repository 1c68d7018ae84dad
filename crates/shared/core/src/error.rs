//! Domain errors

use thiserror::Error;

use crate::entities::{DwellingId, ParticipantId};

/// A configuration parameter outside its accepted range.
///
/// Raised before any tick runs; values are never clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// A broken ownership link between participants and dwellings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("Dwelling {dwelling} is owned by unknown participant {owner}")]
    UnknownOwner {
        dwelling: DwellingId,
        owner: ParticipantId,
    },

    #[error("Dwelling {dwelling} names owner {owner}, but the owner points to {actual:?}")]
    BrokenBackReference {
        dwelling: DwellingId,
        owner: ParticipantId,
        actual: Option<DwellingId>,
    },

    #[error("Participant {participant} points to unknown dwelling {dwelling}")]
    UnknownDwelling {
        participant: ParticipantId,
        dwelling: DwellingId,
    },

    #[error("Participant {participant} points to dwelling {dwelling} owned by {actual:?}")]
    BrokenForwardReference {
        participant: ParticipantId,
        dwelling: DwellingId,
        actual: Option<ParticipantId>,
    },

    #[error("Dwelling count changed from {expected} to {actual}")]
    DwellingCountChanged { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
