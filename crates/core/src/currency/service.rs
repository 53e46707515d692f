//! Currency service for normalization and rounding.
//!
//! Historical clearing costs are recorded in local currency at whatever customs
//! exchange rate applied on the day of clearing. Normalization restates such a
//! cost at today's rate so that figures from different years are comparable.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Decimal places kept for normalized and averaged amounts.
pub const AMOUNT_SCALE: u32 = 4;

/// Decimal places kept for stored exchange rates.
pub const RATE_SCALE: u32 = 6;

/// Currency service for normalization operations.
///
/// All rounding uses Banker's Rounding (MidpointNearestEven).
pub struct CurrencyService;

impl CurrencyService {
    /// Restate `amount`, recorded at `rate_at_recording`, at `current_rate`.
    ///
    /// Equivalent to `(amount / rate_at_recording) * current_rate`. The
    /// multiplication is done first so that exact ratios stay exact, then the
    /// result is rounded to [`AMOUNT_SCALE`] places.
    ///
    /// Returns `None` when `rate_at_recording` is not strictly positive.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use clearlane_core::currency::CurrencyService;
    ///
    /// let result = CurrencyService::normalize(dec!(1000000), dec!(1500), dec!(1650));
    /// assert_eq!(result, Some(dec!(1100000)));
    /// ```
    #[must_use]
    pub fn normalize(
        amount: Decimal,
        rate_at_recording: Decimal,
        current_rate: Decimal,
    ) -> Option<Decimal> {
        if rate_at_recording <= Decimal::ZERO {
            return None;
        }
        let restated = amount
            .checked_mul(current_rate)?
            .checked_div(rate_at_recording)?;
        Some(Self::round(restated, AMOUNT_SCALE))
    }

    /// Round a decimal value using Banker's Rounding.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to round
    /// * `decimal_places` - Number of decimal places
    #[must_use]
    pub fn round(value: Decimal, decimal_places: u32) -> Decimal {
        value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
    }
}
