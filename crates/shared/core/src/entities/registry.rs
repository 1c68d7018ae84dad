//! Ownership registry
//!
//! Owns every dwelling and every live participant. Links between them are
//! handles, and this module is the only writer of those links, so the
//! "one owner, one dwelling" invariant is maintained and checked in one place.

use std::collections::BTreeMap;

use super::{Dwelling, DwellingId, Participant, ParticipantId};
use crate::error::InvariantViolation;

#[derive(Debug, Clone)]
pub struct MarketRegistry {
    dwellings: Vec<Dwelling>,
    /// Ordered by id, which is also creation order
    participants: BTreeMap<ParticipantId, Participant>,
    next_participant_id: u64,
    dwelling_count: usize,
}

impl MarketRegistry {
    /// Create a registry with a fixed set of vacant dwellings
    pub fn with_dwellings(intrinsic_values: impl IntoIterator<Item = f64>) -> Self {
        let dwellings: Vec<Dwelling> = intrinsic_values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Dwelling::new(DwellingId(i as u64), value))
            .collect();
        let dwelling_count = dwellings.len();

        Self {
            dwellings,
            participants: BTreeMap::new(),
            next_participant_id: 0,
            dwelling_count,
        }
    }

    /// Register a new unhoused participant
    pub fn add_participant(&mut self, wealth: f64, year_entered: i32) -> ParticipantId {
        let id = ParticipantId(self.next_participant_id);
        self.next_participant_id += 1;
        self.participants
            .insert(id, Participant::new(id, wealth, year_entered));
        id
    }

    /// Remove a participant, releasing any dwelling they own
    pub fn remove_participant(&mut self, id: ParticipantId) -> Option<Participant> {
        let participant = self.participants.remove(&id)?;
        if let Some(dwelling_id) = participant.dwelling {
            if let Some(dwelling) = self.dwellings.get_mut(dwelling_id.index()) {
                dwelling.release();
            }
        }
        Some(participant)
    }

    /// Hand a dwelling to a participant at `price`.
    ///
    /// A participant owns at most one dwelling, so any dwelling they already
    /// hold is released first and returned. The dwelling's previous owner, if
    /// any, loses their forward link.
    pub fn transfer(
        &mut self,
        dwelling_id: DwellingId,
        participant_id: ParticipantId,
        price: f64,
    ) -> Result<Option<DwellingId>, InvariantViolation> {
        if dwelling_id.index() >= self.dwellings.len() {
            return Err(InvariantViolation::UnknownDwelling {
                participant: participant_id,
                dwelling: dwelling_id,
            });
        }
        let previous = match self.participants.get(&participant_id) {
            Some(p) => p.dwelling,
            None => {
                return Err(InvariantViolation::UnknownOwner {
                    dwelling: dwelling_id,
                    owner: participant_id,
                });
            }
        };

        if previous == Some(dwelling_id) {
            self.dwellings[dwelling_id.index()].assign(participant_id, price);
            return Ok(None);
        }

        if let Some(old) = previous {
            self.dwellings[old.index()].release();
        }

        let seller = self.dwellings[dwelling_id.index()].owner;
        if let Some(seller) = seller.and_then(|id| self.participants.get_mut(&id)) {
            seller.dwelling = None;
        }

        self.dwellings[dwelling_id.index()].assign(participant_id, price);
        if let Some(buyer) = self.participants.get_mut(&participant_id) {
            buyer.dwelling = Some(dwelling_id);
        }

        Ok(previous)
    }

    /// Vacate a dwelling, clearing its owner's forward link
    pub fn release(&mut self, dwelling_id: DwellingId) {
        let Some(dwelling) = self.dwellings.get_mut(dwelling_id.index()) else {
            return;
        };
        if let Some(owner) = dwelling.owner.and_then(|id| self.participants.get_mut(&id)) {
            owner.dwelling = None;
        }
        dwelling.release();
    }

    /// Advance every dwelling's `years_since_transfer` by one
    pub fn age_dwellings(&mut self) {
        for dwelling in &mut self.dwellings {
            dwelling.age();
        }
    }

    /// Depreciate every vacant dwelling
    pub fn depreciate_vacant(&mut self, rate: f64) {
        for dwelling in &mut self.dwellings {
            dwelling.depreciate(rate);
        }
    }

    pub fn dwelling(&self, id: DwellingId) -> Option<&Dwelling> {
        self.dwellings.get(id.index())
    }

    pub fn dwellings(&self) -> &[Dwelling] {
        &self.dwellings
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    /// Live participants in id order
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn participant_ids(&self) -> Vec<ParticipantId> {
        self.participants.keys().copied().collect()
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn dwelling_count(&self) -> usize {
        self.dwellings.len()
    }

    /// Vacant dwellings in id order
    pub fn available_dwellings(&self) -> Vec<DwellingId> {
        self.dwellings
            .iter()
            .filter(|d| d.is_available())
            .map(|d| d.id)
            .collect()
    }

    /// Value of the dwelling a participant currently owns
    pub fn current_value(&self, participant_id: ParticipantId, intrinsicness: f64) -> Option<f64> {
        let dwelling_id = self.participants.get(&participant_id)?.dwelling?;
        self.dwelling(dwelling_id).map(|d| d.value(intrinsicness))
    }

    /// Verify that every ownership link is mirrored on both sides
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.dwellings.len() != self.dwelling_count {
            return Err(InvariantViolation::DwellingCountChanged {
                expected: self.dwelling_count,
                actual: self.dwellings.len(),
            });
        }

        for dwelling in &self.dwellings {
            let Some(owner_id) = dwelling.owner else {
                continue;
            };
            let owner = self
                .participants
                .get(&owner_id)
                .ok_or(InvariantViolation::UnknownOwner {
                    dwelling: dwelling.id,
                    owner: owner_id,
                })?;
            if owner.dwelling != Some(dwelling.id) {
                return Err(InvariantViolation::BrokenBackReference {
                    dwelling: dwelling.id,
                    owner: owner_id,
                    actual: owner.dwelling,
                });
            }
        }

        // Together with the loop above this rules out double ownership:
        // a participant's single forward link must be echoed by its dwelling.
        for participant in self.participants.values() {
            let Some(dwelling_id) = participant.dwelling else {
                continue;
            };
            let dwelling =
                self.dwelling(dwelling_id)
                    .ok_or(InvariantViolation::UnknownDwelling {
                        participant: participant.id,
                        dwelling: dwelling_id,
                    })?;
            if dwelling.owner != Some(participant.id) {
                return Err(InvariantViolation::BrokenForwardReference {
                    participant: participant.id,
                    dwelling: dwelling_id,
                    actual: dwelling.owner,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn registry() -> MarketRegistry {
        MarketRegistry::with_dwellings([100_000.0, 200_000.0, 300_000.0])
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut reg = registry();
        let a = reg.add_participant(1.0, 2024);
        let b = reg.add_participant(1.0, 2024);
        reg.remove_participant(a);
        let c = reg.add_participant(1.0, 2025);

        assert!(a < b && b < c);
        assert_eq!(reg.participant_count(), 2);
    }

    #[test]
    fn test_transfer_links_both_sides() {
        let mut reg = registry();
        let p = reg.add_participant(500_000.0, 2024);

        let released = reg.transfer(DwellingId(1), p, 180_000.0).unwrap();

        assert_eq!(released, None);
        assert_eq!(reg.participant(p).unwrap().dwelling(), Some(DwellingId(1)));
        let d = reg.dwelling(DwellingId(1)).unwrap();
        assert_eq!(d.owner(), Some(p));
        assert_eq!(d.last_sale_price(), 180_000.0);
        assert!(reg.check_invariants().is_ok());
    }

    #[test]
    fn test_transfer_releases_previous_home() {
        let mut reg = registry();
        let p = reg.add_participant(500_000.0, 2024);
        reg.transfer(DwellingId(0), p, 100_000.0).unwrap();
        reg.age_dwellings();

        let released = reg.transfer(DwellingId(2), p, 290_000.0).unwrap();

        assert_eq!(released, Some(DwellingId(0)));
        let old = reg.dwelling(DwellingId(0)).unwrap();
        assert!(old.is_available());
        assert_eq!(old.years_since_transfer(), 0);
        assert_eq!(reg.available_dwellings(), vec![DwellingId(0), DwellingId(1)]);
        assert!(reg.check_invariants().is_ok());
    }

    #[test]
    fn test_transfer_unknown_handles() {
        let mut reg = registry();
        let p = reg.add_participant(1.0, 2024);

        assert!(reg.transfer(DwellingId(9), p, 1.0).is_err());
        assert!(reg.transfer(DwellingId(0), ParticipantId(42), 1.0).is_err());
        assert!(reg.dwelling(DwellingId(0)).unwrap().is_available());
    }

    #[test]
    fn test_remove_participant_frees_dwelling() {
        let mut reg = registry();
        let p = reg.add_participant(500_000.0, 2024);
        reg.transfer(DwellingId(2), p, 300_000.0).unwrap();

        let removed = reg.remove_participant(p).unwrap();

        assert_eq!(removed.dwelling(), Some(DwellingId(2)));
        assert!(reg.dwelling(DwellingId(2)).unwrap().is_available());
        assert!(reg.check_invariants().is_ok());
        assert!(reg.remove_participant(p).is_none());
    }

    #[test]
    fn test_release_clears_forward_link() {
        let mut reg = registry();
        let p = reg.add_participant(500_000.0, 2024);
        reg.transfer(DwellingId(0), p, 100_000.0).unwrap();

        reg.release(DwellingId(0));

        assert!(!reg.participant(p).unwrap().is_housed());
        assert!(reg.check_invariants().is_ok());
    }

    #[test]
    fn test_current_value() {
        let mut reg = registry();
        let p = reg.add_participant(500_000.0, 2024);
        assert_eq!(reg.current_value(p, 0.5), None);

        reg.transfer(DwellingId(1), p, 300_000.0).unwrap();
        assert_eq!(reg.current_value(p, 0.5), Some(250_000.0));
    }

    #[test]
    fn test_depreciate_only_vacant() {
        let mut reg = registry();
        let p = reg.add_participant(500_000.0, 2024);
        reg.transfer(DwellingId(0), p, 100_000.0).unwrap();

        reg.depreciate_vacant(0.1);

        assert_eq!(reg.dwelling(DwellingId(0)).unwrap().intrinsic_value(), 100_000.0);
        assert_relative_eq!(
            reg.dwelling(DwellingId(1)).unwrap().intrinsic_value(),
            180_000.0,
            max_relative = 1e-12
        );
    }
}
