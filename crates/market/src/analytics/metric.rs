use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A tracked time series, named after its [`MarketStatistics`](super::MarketStatistics) field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalParticipants,
    Housed,
    Unhoused,
    TotalDwellings,
    OccupiedDwellings,
    AvailableDwellings,
    MeanWealth,
    MedianWealth,
    MinWealth,
    MaxWealth,
    Gini,
    TopDecileShare,
    MeanDwellingValue,
    MedianDwellingValue,
    MinDwellingValue,
    MaxDwellingValue,
    MarketVelocity,
    OccupancyRate,
    AffordabilityRatio,
    AuctionsAttempted,
    AuctionsSold,
    MeanClearingPrice,
    MeanBidderCount,
}

impl Metric {
    pub const ALL: [Metric; 23] = [
        Metric::TotalParticipants,
        Metric::Housed,
        Metric::Unhoused,
        Metric::TotalDwellings,
        Metric::OccupiedDwellings,
        Metric::AvailableDwellings,
        Metric::MeanWealth,
        Metric::MedianWealth,
        Metric::MinWealth,
        Metric::MaxWealth,
        Metric::Gini,
        Metric::TopDecileShare,
        Metric::MeanDwellingValue,
        Metric::MedianDwellingValue,
        Metric::MinDwellingValue,
        Metric::MaxDwellingValue,
        Metric::MarketVelocity,
        Metric::OccupancyRate,
        Metric::AffordabilityRatio,
        Metric::AuctionsAttempted,
        Metric::AuctionsSold,
        Metric::MeanClearingPrice,
        Metric::MeanBidderCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::TotalParticipants => "total_participants",
            Metric::Housed => "housed",
            Metric::Unhoused => "unhoused",
            Metric::TotalDwellings => "total_dwellings",
            Metric::OccupiedDwellings => "occupied_dwellings",
            Metric::AvailableDwellings => "available_dwellings",
            Metric::MeanWealth => "mean_wealth",
            Metric::MedianWealth => "median_wealth",
            Metric::MinWealth => "min_wealth",
            Metric::MaxWealth => "max_wealth",
            Metric::Gini => "gini",
            Metric::TopDecileShare => "top_decile_share",
            Metric::MeanDwellingValue => "mean_dwelling_value",
            Metric::MedianDwellingValue => "median_dwelling_value",
            Metric::MinDwellingValue => "min_dwelling_value",
            Metric::MaxDwellingValue => "max_dwelling_value",
            Metric::MarketVelocity => "market_velocity",
            Metric::OccupancyRate => "occupancy_rate",
            Metric::AffordabilityRatio => "affordability_ratio",
            Metric::AuctionsAttempted => "auctions_attempted",
            Metric::AuctionsSold => "auctions_sold",
            Metric::MeanClearingPrice => "mean_clearing_price",
            Metric::MeanBidderCount => "mean_bidder_count",
        }
    }

    /// Metrics that are fractions and must lie in [0, 1]
    pub fn is_fraction(&self) -> bool {
        matches!(
            self,
            Metric::Gini | Metric::TopDecileShare | Metric::OccupancyRate
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a name matches no tracked metric
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown metric: {0}")]
pub struct UnknownMetric(pub String);

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>(), Ok(metric));
        }
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        for metric in Metric::ALL {
            let json = serde_json::to_string(&metric).unwrap();
            assert_eq!(json, format!("\"{}\"", metric.as_str()));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert!("price_to_rent".parse::<Metric>().is_err());
        assert!("Gini".parse::<Metric>().is_err());
    }
}
