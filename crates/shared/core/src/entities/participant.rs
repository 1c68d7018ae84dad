use serde::{Deserialize, Serialize};

use super::{DwellingId, ParticipantId};

/// A household taking part in the market.
///
/// Wealth is sampled once at creation and is not depleted by purchases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub wealth: f64,
    /// Dwelling currently owned, if any. Only the registry writes this.
    pub(crate) dwelling: Option<DwellingId>,
    pub year_entered: i32,
}

impl Participant {
    /// Create an unhoused participant
    pub fn new(id: ParticipantId, wealth: f64, year_entered: i32) -> Self {
        Self {
            id,
            wealth,
            dwelling: None,
            year_entered,
        }
    }

    pub fn dwelling(&self) -> Option<DwellingId> {
        self.dwelling
    }

    pub fn is_housed(&self) -> bool {
        self.dwelling.is_some()
    }

    pub fn can_afford(&self, value: f64) -> bool {
        self.wealth >= value
    }

    /// Decide whether to bid on a dwelling worth `candidate_value`.
    ///
    /// `current_value` is the value of the dwelling already owned. Owners only
    /// bid on candidates worth at least `upgrade_threshold` times their home.
    pub fn should_bid(
        &self,
        candidate_value: f64,
        current_value: Option<f64>,
        upgrade_threshold: f64,
    ) -> bool {
        if !self.can_afford(candidate_value) {
            return false;
        }
        match current_value {
            Some(current) => candidate_value >= upgrade_threshold * current,
            None => true,
        }
    }

    /// Sealed bid: always the full wealth
    pub fn bid_amount(&self) -> f64 {
        self.wealth
    }
}
