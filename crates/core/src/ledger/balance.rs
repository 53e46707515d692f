//! Balance derivation.

use rust_decimal::Decimal;

/// Outstanding balance of a financial record.
///
/// Negative when more has been paid than the total cost (credit or refund
/// owed). Always derived from the two stored figures so it cannot drift from
/// the payment accumulator.
#[must_use]
pub fn balance(total_cost: Decimal, amount_paid: Decimal) -> Decimal {
    total_cost - amount_paid
}
