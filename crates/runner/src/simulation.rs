//! Simulation - batch run orchestration
//!
//! Builds a market engine from a [`RunConfig`], ticks it for the configured
//! number of years, logs progress and writes the metrics history to disk.

use hearth_market::{MarketEngine, MarketStatistics, TickReport};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::RunConfig;
use crate::error::{Result, RunnerError};

/// Simulation results
#[derive(Debug, Clone)]
pub struct SimulationResults {
    pub run_id: Uuid,
    /// Ticks executed
    pub ticks: u64,
    /// Total dwellings sold across the run
    pub total_sales: usize,
    /// Total participants that entered across the run
    pub total_entries: usize,
    /// Total participants that exited across the run
    pub total_exits: usize,
    /// Statistics after the final tick
    pub final_statistics: MarketStatistics,
    /// Where the history was written, if it was
    pub export_path: Option<PathBuf>,
}

/// Housing market batch run
pub struct HousingSimulation {
    config: RunConfig,
    engine: MarketEngine,
}

impl HousingSimulation {
    pub fn new(config: RunConfig) -> Result<Self> {
        let engine = MarketEngine::new(config.market.clone())?;
        Ok(Self { config, engine })
    }

    pub fn engine(&self) -> &MarketEngine {
        &self.engine
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every configured tick, then export the history if a path is set
    pub fn run(&mut self) -> Result<SimulationResults> {
        log::info!(
            "Starting run {}: {} ticks, {} dwellings, {} participants",
            self.engine.run_id(),
            self.config.ticks,
            self.config.market.dwelling_count,
            self.config.market.participant_count
        );

        let mut total_sales = 0;
        let mut total_entries = 0;
        let mut total_exits = 0;

        for _ in 0..self.config.ticks {
            let report = self.engine.tick()?;
            total_sales += report.sales;
            total_entries += report.entries;
            total_exits += report.exits;

            if self.config.log_every > 0 && report.tick % self.config.log_every == 0 {
                self.log_progress(&report);
            }
        }

        let export_path = match &self.config.export_path {
            Some(path) => {
                self.export(path)?;
                Some(path.clone())
            }
            None => None,
        };

        let final_statistics = self.engine.statistics();
        log::info!(
            "Run {} complete: {} sales, gini {:.3}, occupancy {:.1}%",
            self.engine.run_id(),
            total_sales,
            final_statistics.gini,
            final_statistics.occupancy_rate * 100.0
        );

        Ok(SimulationResults {
            run_id: self.engine.run_id(),
            ticks: self.engine.tick_count(),
            total_sales,
            total_entries,
            total_exits,
            final_statistics,
            export_path,
        })
    }

    fn log_progress(&self, report: &TickReport) {
        let stats = self.engine.statistics();
        log::info!(
            "Year {} (tick {}): {}/{} sold, {} housed / {} participants, gini {:.3}, value {:.0}",
            report.year,
            report.tick,
            report.sales,
            report.auctions,
            stats.housed,
            stats.total_participants,
            stats.gini,
            stats.mean_dwelling_value
        );
    }

    fn export(&self, path: &Path) -> Result<()> {
        let json = self.engine.history().export_json(self.engine.run_id())?;
        std::fs::write(path, json).map_err(|source| RunnerError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!(
            "Exported {} history records to {}",
            self.engine.history().len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::MarketConfig;

    fn small_config() -> RunConfig {
        RunConfig {
            market: MarketConfig {
                dwelling_count: 20,
                participant_count: 25,
                ..Default::default()
            }
            .with_seed(4),
            ticks: 6,
            log_every: 2,
            export_path: None,
        }
    }

    #[test]
    fn test_run_counts_ticks() {
        let mut simulation = HousingSimulation::new(small_config()).unwrap();
        let results = simulation.run().unwrap();

        assert_eq!(results.ticks, 6);
        assert_eq!(results.final_statistics.tick, 6);
        assert_eq!(results.run_id, simulation.engine().run_id());
        assert!(results.export_path.is_none());
        // Tick zero plus one snapshot per tick
        assert_eq!(simulation.engine().history().len(), 7);
    }

    #[test]
    fn test_turnover_totals() {
        let mut simulation = HousingSimulation::new(small_config()).unwrap();
        let results = simulation.run().unwrap();

        let expected = 25 + results.total_entries - results.total_exits;
        assert_eq!(results.final_statistics.total_participants, expected);
    }

    #[test]
    fn test_invalid_market_rejected() {
        let mut config = small_config();
        config.market.dwelling_count = 0;

        assert!(matches!(
            HousingSimulation::new(config),
            Err(RunnerError::Market(_))
        ));
    }
}
