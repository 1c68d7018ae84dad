//! Run configuration
//!
//! A JSON document wrapping the market parameters with run-level settings.
//! Every field is optional:
//!
//! ```json
//! {
//!   "ticks": 50,
//!   "log_every": 10,
//!   "export_path": "history.json",
//!   "market": { "dwelling_count": 200, "participant_count": 250, "seed": 42 }
//! }
//! ```

use hearth_core::MarketConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, RunnerError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Market parameters
    pub market: MarketConfig,
    /// Number of ticks (simulated years) to run
    pub ticks: u64,
    /// Log a progress line every N ticks (0 disables)
    pub log_every: u64,
    /// Where to write the metrics history, if anywhere
    pub export_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            ticks: 50,
            log_every: 10,
            export_path: None,
        }
    }
}

impl RunConfig {
    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RunnerError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.market.validate()?;
        Ok(config)
    }

    /// Set the tick count (builder pattern)
    pub fn with_ticks(mut self, ticks: u64) -> Self {
        self.ticks = ticks;
        self
    }

    /// Set the random seed (builder pattern)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.market.seed = Some(seed);
        self
    }

    /// Set the export path (builder pattern)
    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = RunConfig::from_json("{}").unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_nested_market_overrides() {
        let config = RunConfig::from_json(
            r#"{ "ticks": 5, "market": { "dwelling_count": 12, "seed": 3 } }"#,
        )
        .unwrap();

        assert_eq!(config.ticks, 5);
        assert_eq!(config.market.dwelling_count, 12);
        assert_eq!(config.market.seed, Some(3));
        assert_eq!(config.log_every, 10);
    }

    #[test]
    fn test_invalid_market_rejected() {
        let result = RunConfig::from_json(r#"{ "market": { "intrinsicness": 2.0 } }"#);
        assert!(matches!(result, Err(RunnerError::Config(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            RunConfig::from_json("{ ticks: 5 }"),
            Err(RunnerError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = RunConfig::from_file("/nonexistent/hearth/run.json");
        assert!(matches!(result, Err(RunnerError::Io { .. })));
    }
}
