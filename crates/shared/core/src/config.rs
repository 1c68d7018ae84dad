//! Market configuration
//!
//! Every field has a default so partial JSON documents deserialize; call
//! [`MarketConfig::validate`] before building a market.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Upper bound accepted for the vacancy depreciation rate
pub const MAX_VACANCY_DEPRECIATION_RATE: f64 = 0.2;

/// Parameters of a housing market simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Number of dwellings (fixed for the simulation's lifetime)
    pub dwelling_count: usize,
    /// Initial number of participants
    pub participant_count: usize,
    /// Mean of the wealth distribution
    pub wealth_mean: f64,
    /// Spread of the wealth distribution
    pub wealth_std: f64,
    /// Mean intrinsic dwelling value
    pub dwelling_price_mean: f64,
    /// Standard deviation of intrinsic dwelling value
    pub dwelling_price_std: f64,
    /// Weight of intrinsic value against last sale price, in [0, 1]
    pub intrinsicness: f64,
    /// Participants entering per tick
    pub turnover_in: usize,
    /// Participants leaving per tick
    pub turnover_out: usize,
    /// Minimum candidate/current value ratio for an owner to bid
    pub upgrade_threshold: f64,
    /// Number of sequential auction batches per tick
    pub n_auction_steps: usize,
    /// Fraction of intrinsic value lost per vacant tick
    pub vacancy_depreciation_rate: f64,
    /// Calendar year of tick 0
    pub starting_year: i32,
    /// Fraction of dwellings occupied at initialization
    pub initial_occupancy: f64,
    /// Maximum number of snapshots retained in history
    pub history_capacity: usize,
    /// Random seed (for reproducibility)
    pub seed: Option<u64>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            dwelling_count: 100,
            participant_count: 120,
            wealth_mean: 450_000.0,
            wealth_std: 250_000.0,
            dwelling_price_mean: 400_000.0,
            dwelling_price_std: 120_000.0,
            intrinsicness: 0.5,
            turnover_in: 5,
            turnover_out: 5,
            upgrade_threshold: 1.2,
            n_auction_steps: 4,
            vacancy_depreciation_rate: 0.02,
            starting_year: 2024,
            initial_occupancy: 0.8,
            history_capacity: 1000,
            seed: None,
        }
    }
}

impl MarketConfig {
    /// Set the random seed (builder pattern)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set population sizes (builder pattern)
    pub fn with_sizes(mut self, dwellings: usize, participants: usize) -> Self {
        self.dwelling_count = dwellings;
        self.participant_count = participants;
        self
    }

    /// Set per-tick turnover (builder pattern)
    pub fn with_turnover(mut self, turnover_in: usize, turnover_out: usize) -> Self {
        self.turnover_in = turnover_in;
        self.turnover_out = turnover_out;
        self
    }

    /// Check every parameter range
    pub fn validate(&self) -> Result<()> {
        positive_count("dwelling_count", self.dwelling_count)?;
        positive_count("participant_count", self.participant_count)?;
        positive_count("n_auction_steps", self.n_auction_steps)?;
        positive_count("history_capacity", self.history_capacity)?;

        positive_real("wealth_mean", self.wealth_mean)?;
        positive_real("wealth_std", self.wealth_std)?;
        positive_real("dwelling_price_mean", self.dwelling_price_mean)?;
        positive_real("dwelling_price_std", self.dwelling_price_std)?;
        positive_real("upgrade_threshold", self.upgrade_threshold)?;

        unit_interval("intrinsicness", self.intrinsicness)?;
        unit_interval("initial_occupancy", self.initial_occupancy)?;

        let rate = self.vacancy_depreciation_rate;
        if !(0.0..=MAX_VACANCY_DEPRECIATION_RATE).contains(&rate) {
            return Err(ConfigError::invalid(
                "vacancy_depreciation_rate",
                format!("{rate} is outside [0, {MAX_VACANCY_DEPRECIATION_RATE}]"),
            ));
        }

        Ok(())
    }
}

fn positive_count(name: &'static str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(ConfigError::invalid(name, "must be greater than zero"));
    }
    Ok(())
}

fn positive_real(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::invalid(
            name,
            format!("{value} is not a positive finite number"),
        ));
    }
    Ok(())
}

fn unit_interval(name: &'static str, value: f64) -> Result<()> {
    // NaN fails the range check as well
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::invalid(name, format!("{value} is outside [0, 1]")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MarketConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_counts_rejected() {
        let config = MarketConfig::default().with_sizes(0, 10);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                name: "dwelling_count",
                ..
            })
        ));

        let config = MarketConfig {
            n_auction_steps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_intrinsicness_bounds() {
        for bad in [-0.1, 1.01, f64::NAN] {
            let config = MarketConfig {
                intrinsicness: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{bad} should be rejected");
        }

        for good in [0.0, 0.5, 1.0] {
            let config = MarketConfig {
                intrinsicness: good,
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "{good} should be accepted");
        }
    }

    #[test]
    fn test_non_positive_reals_rejected() {
        let config = MarketConfig {
            wealth_mean: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = MarketConfig {
            dwelling_price_std: f64::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = MarketConfig {
            upgrade_threshold: -1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_depreciation_rate_bounds() {
        let config = MarketConfig {
            vacancy_depreciation_rate: 0.25,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = MarketConfig {
            vacancy_depreciation_rate: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MarketConfig =
            serde_json::from_str(r#"{ "dwelling_count": 10, "seed": 7 }"#).unwrap();

        assert_eq!(config.dwelling_count, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.participant_count, 120);
        assert!(config.validate().is_ok());
    }
}
