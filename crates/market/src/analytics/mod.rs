//! Market analytics
//!
//! Snapshots are pure functions of engine state; the history only ever
//! appends them (or replaces itself wholesale on a validated import).

mod export;
mod history;
mod metric;
mod statistics;

pub use export::{FORMAT_VERSION, HistoryExport};
pub use history::{MetricsHistory, TimeSeries};
pub use metric::{Metric, UnknownMetric};
pub use statistics::{MarketStatistics, gini_coefficient};
