//! Hearth Runner - housing market simulation driver
//!
//! Wraps the market engine for batch runs:
//!
//! - **Config**: JSON run configuration (market parameters, tick count, export path)
//! - **Simulation**: ticks the engine, logs progress, exports the metrics history
//!
//! ```text
//!   run.json ──► RunConfig ──► HousingSimulation ──► MarketEngine (tick × N)
//!                                      │
//!                                      └──► history.json
//! ```

pub mod config;
pub mod error;
pub mod simulation;

// Re-export main types
pub use config::RunConfig;
pub use error::{Result, RunnerError};
pub use simulation::{HousingSimulation, SimulationResults};
