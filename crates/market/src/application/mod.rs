//! Application layer: clearing and orchestration
//!
//! - **clearing**: sealed-bid second-price auctions over a batch of dwellings
//! - **engine**: MarketEngine that runs the per-tick lifecycle

mod clearing;
mod engine;

pub use clearing::{AuctionResult, ClearingHouse, SINGLE_BIDDER_DISCOUNT};
pub use engine::{MarketEngine, TickReport};
