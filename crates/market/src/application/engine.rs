//! Market Engine
//!
//! Owns the registry and runs the yearly tick:
//! age → depreciate → exit → entry → batched clearing → snapshot.

use hearth_core::{
    DwellingView, InvariantViolation, MarketConfig, MarketRegistry, Participant,
    pick_k_without_replacement, sample_price, sample_wealth,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::{AuctionResult, ClearingHouse};
use crate::analytics::{MarketStatistics, MetricsHistory};
use crate::error::Result;

/// Summary of a single tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number after advancing
    pub tick: u64,
    /// Simulated year after advancing
    pub year: i32,
    pub exits: usize,
    pub entries: usize,
    /// Dwellings put up for auction
    pub auctions: usize,
    pub sales: usize,
    /// Homes vacated by winners who upgraded
    pub released: usize,
}

pub struct MarketEngine {
    config: MarketConfig,
    clearing_house: ClearingHouse,
    registry: MarketRegistry,
    rng: StdRng,
    run_id: Uuid,
    current_year: i32,
    tick_count: u64,
    last_results: Vec<AuctionResult>,
    history: MetricsHistory,
}

impl MarketEngine {
    /// Build a market from a validated configuration.
    ///
    /// Seeds the generator from `config.seed`, or from entropy when unset.
    pub fn new(config: MarketConfig) -> Result<Self> {
        let rng = seeded_rng(config.seed);
        Self::with_rng(config, rng)
    }

    /// Build a market drawing from an explicit generator
    pub fn with_rng(config: MarketConfig, mut rng: StdRng) -> Result<Self> {
        config.validate()?;

        let registry = populate(&config, &mut rng)?;
        let mut engine = Self {
            clearing_house: ClearingHouse::from_config(&config),
            registry,
            rng,
            run_id: Uuid::new_v4(),
            current_year: config.starting_year,
            tick_count: 0,
            last_results: Vec::new(),
            history: MetricsHistory::new(config.history_capacity)?,
            config,
        };
        engine.registry.check_invariants()?;

        let initial = engine.statistics();
        log::info!(
            "Market {} initialized: {} dwellings, {} participants, occupancy {:.1}%",
            engine.run_id,
            initial.total_dwellings,
            initial.total_participants,
            initial.occupancy_rate * 100.0
        );
        engine.history.record(initial);

        Ok(engine)
    }

    /// Advance the market by one simulated year
    pub fn tick(&mut self) -> Result<TickReport> {
        let config = &self.config;

        // 1. Age every dwelling
        self.registry.age_dwellings();

        // 2. Vacant stock loses value
        self.registry.depreciate_vacant(config.vacancy_depreciation_rate);

        // 3. Exits, drawn from the whole population
        let population = self.registry.participant_ids();
        let leaving = pick_k_without_replacement(&mut self.rng, &population, config.turnover_out);
        for id in &leaving {
            self.registry.remove_participant(*id);
        }

        // 4. Entries
        for _ in 0..config.turnover_in {
            let wealth = sample_wealth(&mut self.rng, config.wealth_mean, config.wealth_std);
            self.registry.add_participant(wealth, self.current_year);
        }

        // 5. Batched clearing over the stock available right now
        let available = self.registry.available_dwellings();
        let mut results = Vec::with_capacity(available.len());
        let mut released = 0;
        if !available.is_empty() {
            let batch_size = available.len().div_ceil(config.n_auction_steps);
            let mut already_won = HashSet::new();

            for (i, batch) in available.chunks(batch_size).enumerate() {
                let batch_results =
                    self.clearing_house.clear_batch(&self.registry, batch, &mut already_won);
                let freed =
                    ClearingHouse::execute_transactions(&mut self.registry, &batch_results)?;

                log::trace!(
                    "Tick {} batch {}: {} dwellings, {} sold, {} released",
                    self.tick_count + 1,
                    i,
                    batch.len(),
                    batch_results.iter().filter(|r| r.is_sold()).count(),
                    freed.len()
                );

                released += freed.len();
                results.extend(batch_results);
            }
        }

        // 6. Keep this tick's results only
        self.last_results = results;

        // 7. Advance time and record
        self.current_year += 1;
        self.tick_count += 1;
        self.registry.check_invariants()?;

        let report = TickReport {
            tick: self.tick_count,
            year: self.current_year,
            exits: leaving.len(),
            entries: self.config.turnover_in,
            auctions: self.last_results.len(),
            sales: self.last_results.iter().filter(|r| r.is_sold()).count(),
            released,
        };

        let snapshot = self.statistics();
        log::debug!(
            "Tick {} ({}): population={}, sold={}/{}, gini={:.3}, occupancy={:.1}%",
            report.tick,
            report.year,
            snapshot.total_participants,
            report.sales,
            report.auctions,
            snapshot.gini,
            snapshot.occupancy_rate * 100.0
        );
        self.history.record(snapshot);

        Ok(report)
    }

    /// Run several ticks
    pub fn run(&mut self, ticks: u64) -> Result<Vec<TickReport>> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    /// Rebuild the market from its configuration.
    ///
    /// Counters, results, and history start over and a new run id is issued.
    /// With a configured seed the rebuilt market is identical to the first one.
    pub fn reset(&mut self) -> Result<()> {
        let rng = seeded_rng(self.config.seed);
        *self = Self::with_rng(self.config.clone(), rng)?;
        Ok(())
    }

    /// Statistics for the current state
    pub fn statistics(&self) -> MarketStatistics {
        MarketStatistics::compute(
            &self.registry,
            &self.last_results,
            self.config.intrinsicness,
            self.tick_count,
            self.current_year,
        )
    }

    /// Check ownership links
    pub fn verify_invariants(&self) -> Result<()> {
        Ok(self.registry.check_invariants()?)
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn registry(&self) -> &MarketRegistry {
        &self.registry
    }

    /// Live participants in id order
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.registry.participants()
    }

    /// Every dwelling with its current value and display state
    pub fn dwellings(&self) -> impl Iterator<Item = DwellingView> + '_ {
        let intrinsicness = self.config.intrinsicness;
        self.registry
            .dwellings()
            .iter()
            .map(move |d| d.view(intrinsicness))
    }

    /// Auction results of the most recent tick
    pub fn last_results(&self) -> &[AuctionResult] {
        &self.last_results
    }

    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }

    /// Mutable history access, e.g. to import a saved series
    pub fn history_mut(&mut self) -> &mut MetricsHistory {
        &mut self.history
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Create the dwelling stock and population, then pair the poorest
/// participants with the cheapest dwellings up to the initial occupancy.
fn populate(
    config: &MarketConfig,
    rng: &mut StdRng,
) -> std::result::Result<MarketRegistry, InvariantViolation> {
    let values: Vec<f64> = (0..config.dwelling_count)
        .map(|_| sample_price(rng, config.dwelling_price_mean, config.dwelling_price_std))
        .collect();
    let mut registry = MarketRegistry::with_dwellings(values);

    for _ in 0..config.participant_count {
        let wealth = sample_wealth(rng, config.wealth_mean, config.wealth_std);
        registry.add_participant(wealth, config.starting_year);
    }

    let mut dwellings: Vec<(f64, _)> = registry
        .dwellings()
        .iter()
        .map(|d| (d.intrinsic_value(), d.id))
        .collect();
    dwellings.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut participants: Vec<(f64, _)> =
        registry.participants().map(|p| (p.wealth, p.id)).collect();
    participants.sort_by(|a, b| a.0.total_cmp(&b.0));

    let target = (config.initial_occupancy * config.dwelling_count as f64).floor() as usize;
    let pairs = target.min(participants.len());

    for (&(price, dwelling), &(_, participant)) in dwellings.iter().zip(&participants).take(pairs) {
        registry.transfer(dwelling, participant, price)?;
    }

    Ok(registry)
}
