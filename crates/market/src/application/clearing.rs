//! Clearing House
//!
//! Clears a batch of vacant dwellings with sealed-bid second-price (Vickrey)
//! auctions. Every eligible bidder bids their full wealth; the highest bid
//! wins and pays the second-highest bid, or a discounted own bid when alone.

use hearth_core::{
    DwellingId, InvariantViolation, MarketConfig, MarketRegistry, Participant, ParticipantId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fraction of the bid paid when only one bidder is eligible
pub const SINGLE_BIDDER_DISCOUNT: f64 = 0.75;

/// Outcome of one dwelling's auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionResult {
    pub dwelling: DwellingId,
    pub winner: Option<ParticipantId>,
    /// Highest sealed bid (0 when unsold)
    pub winning_bid: f64,
    /// Price the winner pays (0 when unsold)
    pub clearing_price: f64,
    pub bidder_count: usize,
}

impl AuctionResult {
    fn unsold(dwelling: DwellingId) -> Self {
        Self {
            dwelling,
            winner: None,
            winning_bid: 0.0,
            clearing_price: 0.0,
            bidder_count: 0,
        }
    }

    pub fn is_sold(&self) -> bool {
        self.winner.is_some()
    }
}

/// Batch auctioneer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearingHouse {
    intrinsicness: f64,
    upgrade_threshold: f64,
}

impl ClearingHouse {
    pub fn new(intrinsicness: f64, upgrade_threshold: f64) -> Self {
        Self {
            intrinsicness,
            upgrade_threshold,
        }
    }

    pub fn from_config(config: &MarketConfig) -> Self {
        Self::new(config.intrinsicness, config.upgrade_threshold)
    }

    pub fn intrinsicness(&self) -> f64 {
        self.intrinsicness
    }

    pub fn upgrade_threshold(&self) -> f64 {
        self.upgrade_threshold
    }

    /// Clear every dwelling of a batch, in order.
    ///
    /// Winners are added to `already_won` and cannot win again while the set
    /// is shared, which the engine does across all batches of a tick.
    pub fn clear_batch(
        &self,
        registry: &MarketRegistry,
        batch: &[DwellingId],
        already_won: &mut HashSet<ParticipantId>,
    ) -> Vec<AuctionResult> {
        batch
            .iter()
            .map(|&dwelling| {
                let result = self.clear_dwelling(registry, dwelling, already_won);
                if let Some(winner) = result.winner {
                    already_won.insert(winner);
                }
                result
            })
            .collect()
    }

    /// Run a single dwelling's auction without recording the winner
    pub fn clear_dwelling(
        &self,
        registry: &MarketRegistry,
        dwelling_id: DwellingId,
        already_won: &HashSet<ParticipantId>,
    ) -> AuctionResult {
        let Some(dwelling) = registry.dwelling(dwelling_id) else {
            return AuctionResult::unsold(dwelling_id);
        };
        let value = dwelling.value(self.intrinsicness);

        let mut bidders: Vec<&Participant> = registry
            .participants()
            .filter(|p| !already_won.contains(&p.id))
            .filter(|p| {
                let current = registry.current_value(p.id, self.intrinsicness);
                p.should_bid(value, current, self.upgrade_threshold)
            })
            .collect();

        if bidders.is_empty() {
            return AuctionResult::unsold(dwelling_id);
        }

        // Stable sort: equal bids keep registry (id) order
        bidders.sort_by(|a, b| b.bid_amount().total_cmp(&a.bid_amount()));

        let winner = bidders[0];
        let winning_bid = winner.bid_amount();
        let clearing_price = match bidders.get(1) {
            Some(runner_up) => runner_up.bid_amount(),
            None => SINGLE_BIDDER_DISCOUNT * winning_bid,
        };

        AuctionResult {
            dwelling: dwelling_id,
            winner: Some(winner.id),
            winning_bid,
            clearing_price,
            bidder_count: bidders.len(),
        }
    }

    /// Transfer every sold dwelling to its winner at the clearing price.
    ///
    /// Returns the dwellings vacated by winners who already owned a home.
    /// Those are not re-auctioned in the current tick.
    pub fn execute_transactions(
        registry: &mut MarketRegistry,
        results: &[AuctionResult],
    ) -> Result<Vec<DwellingId>, InvariantViolation> {
        let mut released = Vec::new();
        for result in results {
            let Some(winner) = result.winner else {
                continue;
            };
            let previous = registry.transfer(result.dwelling, winner, result.clearing_price)?;
            released.extend(previous);
        }
        Ok(released)
    }
}
