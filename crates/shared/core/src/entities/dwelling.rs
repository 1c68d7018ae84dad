use serde::{Deserialize, Serialize};

use super::{DwellingId, ParticipantId};

/// Intrinsic value never depreciates below this amount
pub const MIN_DWELLING_VALUE: f64 = 1_000.0;

/// Presentation-facing state of a dwelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DwellingState {
    /// Vacant for at least one full tick
    Available,
    /// Released during the last tick
    JustAvailable,
    /// Owned for at least one full tick
    Occupied,
    /// Sold during the last tick
    JustOccupied,
}

/// A housing unit. The dwelling set is fixed for a simulation's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dwelling {
    pub id: DwellingId,
    pub(crate) intrinsic_value: f64,
    pub(crate) last_sale_price: f64,
    /// Current owner. Only the registry writes this.
    pub(crate) owner: Option<ParticipantId>,
    pub(crate) years_since_transfer: u32,
}

impl Dwelling {
    /// Create a vacant dwelling whose initial price equals its intrinsic value
    pub fn new(id: DwellingId, intrinsic_value: f64) -> Self {
        Self {
            id,
            intrinsic_value,
            last_sale_price: intrinsic_value,
            owner: None,
            years_since_transfer: 0,
        }
    }

    pub fn intrinsic_value(&self) -> f64 {
        self.intrinsic_value
    }

    pub fn last_sale_price(&self) -> f64 {
        self.last_sale_price
    }

    pub fn owner(&self) -> Option<ParticipantId> {
        self.owner
    }

    pub fn years_since_transfer(&self) -> u32 {
        self.years_since_transfer
    }

    pub fn is_available(&self) -> bool {
        self.owner.is_none()
    }

    /// Perceived value: blend of intrinsic value and last sale price
    pub fn value(&self, intrinsicness: f64) -> f64 {
        intrinsicness * self.intrinsic_value + (1.0 - intrinsicness) * self.last_sale_price
    }

    /// Clear the owner. The former owner's forward link is the registry's job.
    pub fn release(&mut self) {
        self.owner = None;
        self.years_since_transfer = 0;
    }

    pub(crate) fn assign(&mut self, owner: ParticipantId, price: f64) {
        self.owner = Some(owner);
        self.last_sale_price = price;
        self.years_since_transfer = 0;
    }

    pub fn age(&mut self) {
        self.years_since_transfer = self.years_since_transfer.saturating_add(1);
    }

    /// Lose value while vacant. Owned dwellings keep their intrinsic value.
    ///
    /// Depreciation stops at [`MIN_DWELLING_VALUE`]; a dwelling already
    /// below the floor keeps its value and is never raised to it.
    pub fn depreciate(&mut self, rate: f64) {
        if self.owner.is_some() {
            return;
        }
        let floor = MIN_DWELLING_VALUE.min(self.intrinsic_value);
        self.intrinsic_value = (self.intrinsic_value * (1.0 - rate)).max(floor);
    }

    pub fn color_state(&self) -> DwellingState {
        match (self.owner.is_some(), self.years_since_transfer == 0) {
            (false, false) => DwellingState::Available,
            (false, true) => DwellingState::JustAvailable,
            (true, false) => DwellingState::Occupied,
            (true, true) => DwellingState::JustOccupied,
        }
    }

    /// Read-only projection for presentation layers
    pub fn view(&self, intrinsicness: f64) -> DwellingView {
        DwellingView {
            id: self.id,
            value: self.value(intrinsicness),
            last_sale_price: self.last_sale_price,
            owner: self.owner,
            years_since_transfer: self.years_since_transfer,
            state: self.color_state(),
        }
    }
}

/// Snapshot of a dwelling as seen by renderers and analytics consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DwellingView {
    pub id: DwellingId,
    pub value: f64,
    pub last_sale_price: f64,
    pub owner: Option<ParticipantId>,
    pub years_since_transfer: u32,
    pub state: DwellingState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_value_blend() {
        let mut d = Dwelling::new(DwellingId(0), 200_000.0);
        d.assign(ParticipantId(1), 300_000.0);

        assert_relative_eq!(d.value(1.0), 200_000.0);
        assert_relative_eq!(d.value(0.0), 300_000.0);
        assert_relative_eq!(d.value(0.25), 275_000.0);
    }

    #[test]
    fn test_depreciation_compounds_while_vacant() {
        let mut d = Dwelling::new(DwellingId(0), 100_000.0);
        d.depreciate(0.05);
        d.depreciate(0.05);
        assert_relative_eq!(d.intrinsic_value(), 90_250.0, max_relative = 1e-12);
    }

    #[test]
    fn test_depreciation_floor() {
        let mut d = Dwelling::new(DwellingId(0), 1_050.0);
        for _ in 0..10 {
            d.depreciate(0.2);
        }
        assert_eq!(d.intrinsic_value(), MIN_DWELLING_VALUE);
    }

    #[test]
    fn test_depreciation_never_raises_value() {
        let mut d = Dwelling::new(DwellingId(0), 400.0);
        d.depreciate(0.05);
        assert_eq!(d.intrinsic_value(), 400.0);

        let mut d = Dwelling::new(DwellingId(1), MIN_DWELLING_VALUE);
        d.depreciate(0.2);
        assert_eq!(d.intrinsic_value(), MIN_DWELLING_VALUE);
    }

    #[test]
    fn test_owned_dwelling_does_not_depreciate() {
        let mut d = Dwelling::new(DwellingId(0), 100_000.0);
        d.assign(ParticipantId(3), 100_000.0);
        d.depreciate(0.1);
        assert_eq!(d.intrinsic_value(), 100_000.0);
    }

    #[test]
    fn test_color_states() {
        let mut d = Dwelling::new(DwellingId(0), 100_000.0);
        assert_eq!(d.color_state(), DwellingState::JustAvailable);

        d.age();
        assert_eq!(d.color_state(), DwellingState::Available);

        d.assign(ParticipantId(9), 120_000.0);
        assert_eq!(d.color_state(), DwellingState::JustOccupied);
        assert_eq!(d.last_sale_price(), 120_000.0);

        d.age();
        assert_eq!(d.color_state(), DwellingState::Occupied);

        d.release();
        assert_eq!(d.color_state(), DwellingState::JustAvailable);
        assert_eq!(d.years_since_transfer(), 0);
        assert!(d.is_available());
    }
}
