mod dwelling;
mod ids;
mod participant;
mod registry;

pub use dwelling::{Dwelling, DwellingState, DwellingView, MIN_DWELLING_VALUE};
pub use ids::{DwellingId, ParticipantId};
pub use participant::Participant;
pub use registry::MarketRegistry;
