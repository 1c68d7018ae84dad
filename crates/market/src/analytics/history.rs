//! Metrics History
//!
//! Bounded, append-only series of statistics snapshots. Once full, the oldest
//! snapshot is evicted for every new one.

use std::collections::VecDeque;
use std::collections::vec_deque;
use uuid::Uuid;

use super::{HistoryExport, MarketStatistics, Metric};
use crate::error::HistoryError;

#[derive(Debug, Clone)]
pub struct MetricsHistory {
    records: VecDeque<MarketStatistics>,
    capacity: usize,
}

impl MetricsHistory {
    /// Create an empty history holding at most `capacity` snapshots
    pub fn new(capacity: usize) -> Result<Self, HistoryError> {
        if capacity == 0 {
            return Err(HistoryError::ZeroCapacity);
        }
        Ok(Self {
            records: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        })
    }

    pub fn record(&mut self, snapshot: MarketStatistics) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(snapshot);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&MarketStatistics> {
        self.records.back()
    }

    /// Snapshots from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &MarketStatistics> {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// `(tick, value)` pairs for a named metric, oldest first.
    ///
    /// Unknown names produce a zero for every recorded tick instead of an
    /// error. The returned iterator is lazy and can be cloned to restart.
    pub fn time_series(&self, name: &str) -> TimeSeries<'_> {
        TimeSeries {
            records: self.records.iter(),
            metric: name.parse().ok(),
        }
    }

    /// Series for a known metric
    pub fn series(&self, metric: Metric) -> TimeSeries<'_> {
        TimeSeries {
            records: self.records.iter(),
            metric: Some(metric),
        }
    }

    pub fn export(&self, run_id: Uuid) -> HistoryExport {
        HistoryExport::new(run_id, self.records.iter().cloned().collect())
    }

    pub fn export_json(&self, run_id: Uuid) -> Result<String, HistoryError> {
        self.export(run_id).to_json()
    }

    /// Replace the history with a validated payload.
    ///
    /// Nothing changes unless the whole payload is valid. Only the newest
    /// `capacity` records are kept. Returns the number of records retained.
    pub fn import_json(&mut self, payload: &str) -> Result<usize, HistoryError> {
        let export = match HistoryExport::from_json(payload) {
            Ok(export) => export,
            Err(e) => {
                log::warn!("Rejected history import: {}", e);
                return Err(e);
            }
        };
        Ok(self.restore(export))
    }

    /// Replace the history with an already-parsed export, after validation
    pub fn import(&mut self, export: HistoryExport) -> Result<usize, HistoryError> {
        export.validate()?;
        Ok(self.restore(export))
    }

    fn restore(&mut self, export: HistoryExport) -> usize {
        let skip = export.records.len().saturating_sub(self.capacity);
        self.records = export.records.into_iter().skip(skip).collect();
        log::info!(
            "Imported {} history records from run {}",
            self.records.len(),
            export.run_id
        );
        self.records.len()
    }
}

/// Lazy `(tick, value)` sequence over a history
#[derive(Debug, Clone)]
pub struct TimeSeries<'a> {
    records: vec_deque::Iter<'a, MarketStatistics>,
    metric: Option<Metric>,
}

impl Iterator for TimeSeries<'_> {
    type Item = (u64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        let value = self.metric.map_or(0.0, |m| record.metric(m));
        Some((record.tick, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl ExactSizeIterator for TimeSeries<'_> {}
