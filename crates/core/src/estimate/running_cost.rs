//! Running-cost calculator.
//!
//! Deterministic estimate from itemized inputs: the caller's three costs, the
//! fixed clearing charges, and a surcharge for one terminal.

use clearlane_shared::RunningCostConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::EstimateError;

/// Itemized costs supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningCostInput {
    /// Purchase price of the vehicle.
    pub vehicle_cost: Decimal,
    /// Shipping fees.
    pub shipping_fees: Decimal,
    /// Customs duty.
    pub customs_duty: Decimal,
    /// Port terminal.
    pub terminal: String,
}

/// Result of the running-cost calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningCostResult {
    /// Sum of inputs, fixed charges, and any terminal surcharge.
    pub total_estimate: Decimal,
}

/// A named fixed charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCharge {
    /// Charge name.
    pub name: &'static str,
    /// Amount.
    pub amount: Decimal,
}

/// Fixed charges and terminal surcharge applied to every calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningCostSchedule {
    fixed_charges: Vec<FixedCharge>,
    surcharge_terminal: String,
    terminal_surcharge: Decimal,
}

impl From<&RunningCostConfig> for RunningCostSchedule {
    fn from(config: &RunningCostConfig) -> Self {
        Self {
            fixed_charges: vec![
                FixedCharge {
                    name: "cpc",
                    amount: config.cpc,
                },
                FixedCharge {
                    name: "valuation",
                    amount: config.valuation,
                },
                FixedCharge {
                    name: "approval_846",
                    amount: config.approval_846,
                },
                FixedCharge {
                    name: "comet",
                    amount: config.comet,
                },
            ],
            surcharge_terminal: config.surcharge_terminal.clone(),
            terminal_surcharge: config.terminal_surcharge,
        }
    }
}

impl Default for RunningCostSchedule {
    fn default() -> Self {
        Self::from(&RunningCostConfig::default())
    }
}

impl RunningCostSchedule {
    /// The fixed charges, in application order.
    #[must_use]
    pub fn fixed_charges(&self) -> &[FixedCharge] {
        &self.fixed_charges
    }

    /// Sum of the fixed charges.
    #[must_use]
    pub fn fixed_total(&self) -> Decimal {
        self.fixed_charges.iter().map(|charge| charge.amount).sum()
    }

    /// Surcharge for `terminal`; zero unless it is the surcharge terminal.
    #[must_use]
    pub fn surcharge_for(&self, terminal: &str) -> Decimal {
        if terminal.trim().eq_ignore_ascii_case(&self.surcharge_terminal) {
            self.terminal_surcharge
        } else {
            Decimal::ZERO
        }
    }

    /// Computes the running-cost estimate.
    ///
    /// # Errors
    ///
    /// Returns `EstimateError::NonPositiveCost` for the first itemized input
    /// that is zero or negative.
    pub fn calculate(&self, input: &RunningCostInput) -> Result<RunningCostResult, EstimateError> {
        for (field, value) in [
            ("vehicle_cost", input.vehicle_cost),
            ("shipping_fees", input.shipping_fees),
            ("customs_duty", input.customs_duty),
        ] {
            if value <= Decimal::ZERO {
                return Err(EstimateError::NonPositiveCost { field });
            }
        }

        let total_estimate = input.vehicle_cost
            + input.shipping_fees
            + input.customs_duty
            + self.fixed_total()
            + self.surcharge_for(&input.terminal);

        Ok(RunningCostResult { total_estimate })
    }
}
