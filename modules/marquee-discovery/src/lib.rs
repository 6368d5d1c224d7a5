pub mod aggregator;
pub mod catalog;
pub mod discovery;
pub mod enricher;
pub mod error;
pub mod favorites;
pub mod planner;
pub mod ranking;
pub mod sections;
pub mod stats;
pub mod store;
pub mod telemetry;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod validity;

#[cfg(test)]
mod chain_tests;

pub use discovery::{Discovery, DiscoveryLimits, ItemDetails, Outcome};
pub use error::{DiscoveryError, Result};
