//! Clearing cost estimation.
//!
//! Two answers to "what will clearing this vehicle cost":
//! - `engine` - historical estimate with an ordered fallback search and
//!   exchange rate normalization
//! - `running_cost` - deterministic sum of itemized inputs and fixed charges

pub mod engine;
pub mod error;
pub mod running_cost;
pub mod tier;

#[cfg(test)]
mod props;

pub use engine::{EstimateResult, Estimator, HistoricalCost, HistoricalCostSource};
pub use error::EstimateError;
pub use running_cost::{FixedCharge, RunningCostInput, RunningCostResult, RunningCostSchedule};
pub use tier::{EstimateQuery, MatchTier, TierCriteria};
