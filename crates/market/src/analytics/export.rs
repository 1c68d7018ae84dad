//! History export format
//!
//! One flat [`MarketStatistics`] record per tick, wrapped with the run id and
//! export time. Imports are validated record by record before anything is
//! applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MarketStatistics, Metric};
use crate::error::HistoryError;

/// Current export format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryExport {
    pub version: u32,
    pub run_id: Uuid,
    pub exported_at: DateTime<Utc>,
    pub records: Vec<MarketStatistics>,
}

impl HistoryExport {
    pub fn new(run_id: Uuid, records: Vec<MarketStatistics>) -> Self {
        Self {
            version: FORMAT_VERSION,
            run_id,
            exported_at: Utc::now(),
            records,
        }
    }

    pub fn to_json(&self) -> Result<String, HistoryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a payload
    pub fn from_json(payload: &str) -> Result<Self, HistoryError> {
        let export: HistoryExport = serde_json::from_str(payload)?;
        export.validate()?;
        Ok(export)
    }

    pub fn validate(&self) -> Result<(), HistoryError> {
        if self.version != FORMAT_VERSION {
            return Err(HistoryError::UnsupportedVersion {
                found: self.version,
                expected: FORMAT_VERSION,
            });
        }

        let mut previous_tick: Option<u64> = None;
        for (index, record) in self.records.iter().enumerate() {
            validate_record(record)
                .map_err(|reason| HistoryError::InvalidRecord { index, reason })?;

            if let Some(prev) = previous_tick {
                if record.tick <= prev {
                    return Err(HistoryError::InvalidRecord {
                        index,
                        reason: format!("tick {} does not follow tick {}", record.tick, prev),
                    });
                }
            }
            previous_tick = Some(record.tick);
        }
        Ok(())
    }
}

fn validate_record(record: &MarketStatistics) -> Result<(), String> {
    for metric in Metric::ALL {
        let value = record.metric(metric);
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{metric} is {value}"));
        }
        if metric.is_fraction() && value > 1.0 {
            return Err(format!("{metric} is {value}, expected a fraction"));
        }
    }

    if record.housed + record.unhoused != record.total_participants {
        return Err(format!(
            "housed ({}) + unhoused ({}) != total participants ({})",
            record.housed, record.unhoused, record.total_participants
        ));
    }
    if record.occupied_dwellings + record.available_dwellings != record.total_dwellings {
        return Err(format!(
            "occupied ({}) + available ({}) != total dwellings ({})",
            record.occupied_dwellings, record.available_dwellings, record.total_dwellings
        ));
    }
    if record.housed != record.occupied_dwellings {
        return Err(format!(
            "{} housed participants but {} occupied dwellings",
            record.housed, record.occupied_dwellings
        ));
    }
    if record.auctions_sold > record.auctions_attempted {
        return Err(format!(
            "{} auctions sold out of {} attempted",
            record.auctions_sold, record.auctions_attempted
        ));
    }
    Ok(())
}
