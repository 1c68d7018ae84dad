//! Hearth Market - housing market simulation engine
//!
//! - **application**: batched Vickrey clearing and the per-tick lifecycle
//! - **analytics**: statistics snapshots and the bounded metrics history
//!
//! ## Tick lifecycle
//!
//! ```text
//!  age ─► depreciate vacant ─► exits ─► entries ─► clearing ─► snapshot
//!                                                    │
//!                                batch 1 ─► batch 2 ─► ... ─► batch n
//!                                (winners excluded from later batches)
//! ```

pub mod analytics;
pub mod application;
pub mod error;

// Re-export main types
pub use analytics::{
    FORMAT_VERSION, HistoryExport, MarketStatistics, Metric, MetricsHistory, TimeSeries,
    UnknownMetric, gini_coefficient,
};
pub use application::{
    AuctionResult, ClearingHouse, MarketEngine, SINGLE_BIDDER_DISCOUNT, TickReport,
};
pub use error::{HistoryError, MarketError};
