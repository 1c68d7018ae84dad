//! Runner errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse run configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid market configuration: {0}")]
    Config(#[from] hearth_core::ConfigError),

    #[error("Market error: {0}")]
    Market(#[from] hearth_market::MarketError),

    #[error("History error: {0}")]
    History(#[from] hearth_market::HistoryError),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
