//! Market statistics snapshot
//!
//! A pure function of the registry and the most recent auction results.

use hearth_core::MarketRegistry;
use serde::{Deserialize, Serialize};

use super::Metric;
use crate::application::AuctionResult;

/// Number of equal groups the top share is taken from
const DECILES: usize = 10;

/// One flat record of market state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStatistics {
    pub tick: u64,
    pub year: i32,

    // Population
    pub total_participants: usize,
    pub housed: usize,
    pub unhoused: usize,

    // Housing stock
    pub total_dwellings: usize,
    pub occupied_dwellings: usize,
    pub available_dwellings: usize,

    // Wealth distribution
    pub mean_wealth: f64,
    pub median_wealth: f64,
    pub min_wealth: f64,
    pub max_wealth: f64,
    pub gini: f64,
    pub top_decile_share: f64,

    // Dwelling values
    pub mean_dwelling_value: f64,
    pub median_dwelling_value: f64,
    pub min_dwelling_value: f64,
    pub max_dwelling_value: f64,

    // Market activity
    /// Dwellings sold during the last tick
    pub market_velocity: usize,
    pub occupancy_rate: f64,
    /// Mean dwelling value over mean wealth
    pub affordability_ratio: f64,

    // Last tick's auctions
    pub auctions_attempted: usize,
    pub auctions_sold: usize,
    /// Mean price over sold auctions
    pub mean_clearing_price: f64,
    pub mean_bidder_count: f64,
}

impl MarketStatistics {
    pub fn compute(
        registry: &MarketRegistry,
        last_results: &[AuctionResult],
        intrinsicness: f64,
        tick: u64,
        year: i32,
    ) -> Self {
        let wealths: Vec<f64> = registry.participants().map(|p| p.wealth).collect();
        let housed = registry.participants().filter(|p| p.is_housed()).count();

        let values: Vec<f64> = registry
            .dwellings()
            .iter()
            .map(|d| d.value(intrinsicness))
            .collect();
        let occupied = registry
            .dwellings()
            .iter()
            .filter(|d| !d.is_available())
            .count();

        let wealth = Summary::of(&wealths);
        let value = Summary::of(&values);

        let sold: Vec<&AuctionResult> = last_results.iter().filter(|r| r.is_sold()).collect();
        let clearing_prices: Vec<f64> = sold.iter().map(|r| r.clearing_price).collect();
        let bidder_counts: Vec<f64> = last_results
            .iter()
            .map(|r| r.bidder_count as f64)
            .collect();

        Self {
            tick,
            year,
            total_participants: wealths.len(),
            housed,
            unhoused: wealths.len() - housed,
            total_dwellings: values.len(),
            occupied_dwellings: occupied,
            available_dwellings: values.len() - occupied,
            mean_wealth: wealth.mean,
            median_wealth: wealth.median,
            min_wealth: wealth.min,
            max_wealth: wealth.max,
            gini: gini_coefficient(&wealths),
            top_decile_share: top_share(&wealths, DECILES),
            mean_dwelling_value: value.mean,
            median_dwelling_value: value.median,
            min_dwelling_value: value.min,
            max_dwelling_value: value.max,
            market_velocity: sold.len(),
            occupancy_rate: ratio(occupied as f64, values.len() as f64),
            affordability_ratio: ratio(value.mean, wealth.mean),
            auctions_attempted: last_results.len(),
            auctions_sold: sold.len(),
            mean_clearing_price: mean(&clearing_prices),
            mean_bidder_count: mean(&bidder_counts),
        }
    }

    /// Read one tracked metric as a float
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalParticipants => self.total_participants as f64,
            Metric::Housed => self.housed as f64,
            Metric::Unhoused => self.unhoused as f64,
            Metric::TotalDwellings => self.total_dwellings as f64,
            Metric::OccupiedDwellings => self.occupied_dwellings as f64,
            Metric::AvailableDwellings => self.available_dwellings as f64,
            Metric::MeanWealth => self.mean_wealth,
            Metric::MedianWealth => self.median_wealth,
            Metric::MinWealth => self.min_wealth,
            Metric::MaxWealth => self.max_wealth,
            Metric::Gini => self.gini,
            Metric::TopDecileShare => self.top_decile_share,
            Metric::MeanDwellingValue => self.mean_dwelling_value,
            Metric::MedianDwellingValue => self.median_dwelling_value,
            Metric::MinDwellingValue => self.min_dwelling_value,
            Metric::MaxDwellingValue => self.max_dwelling_value,
            Metric::MarketVelocity => self.market_velocity as f64,
            Metric::OccupancyRate => self.occupancy_rate,
            Metric::AffordabilityRatio => self.affordability_ratio,
            Metric::AuctionsAttempted => self.auctions_attempted as f64,
            Metric::AuctionsSold => self.auctions_sold as f64,
            Metric::MeanClearingPrice => self.mean_clearing_price,
            Metric::MeanBidderCount => self.mean_bidder_count,
        }
    }
}

/// Location and range of a sample; all zero when empty
#[derive(Debug, Clone, Copy, Default)]
struct Summary {
    mean: f64,
    median: f64,
    min: f64,
    max: f64,
}

impl Summary {
    fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        Self {
            mean: mean(&sorted),
            median,
            min: sorted[0],
            max: sorted[n - 1],
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Gini coefficient: `Σ|wᵢ−wⱼ| / (2·n²·mean)`.
///
/// Evaluated on sorted values as `Σ(2i−n−1)·w₍ᵢ₎ / (n·total)`, which is the
/// same quantity in O(n log n). Zero for n ≤ 1 or zero total.
pub fn gini_coefficient(values: &[f64]) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let nf = n as f64;
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, &w)| (2.0 * (i as f64 + 1.0) - nf - 1.0) * w)
        .sum();

    (weighted / (nf * total)).clamp(0.0, 1.0)
}

/// Share of the total held by the richest `ceil(n / groups)` values
fn top_share(values: &[f64], groups: usize) -> f64 {
    let total: f64 = values.iter().sum();
    if values.is_empty() || total <= 0.0 {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let k = values.len().div_ceil(groups.max(1));
    sorted.iter().take(k).sum::<f64>() / total
}
