//! Property-based tests for LedgerService.
//!
//! - Balance identity after any payment sequence
//! - Payment accumulation is exact for either sign
//! - Update plans never touch fields that were not supplied

use chrono::Utc;
use clearlane_shared::types::{FinancialsId, VehicleId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{FinancialsRecord, UpdateFinancialsInput};

/// Strategy to generate non-negative costs (0.00 to 100,000,000.00).
fn cost() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_000i64).prop_map(|kobo| Decimal::new(kobo, 2))
}

/// Strategy to generate signed, non-zero payment amounts.
fn payment_amount() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (1i64..1_000_000_000i64).prop_map(|kobo| Decimal::new(kobo, 2)),
        (1i64..1_000_000_000i64).prop_map(|kobo| Decimal::new(-kobo, 2)),
    ]
}

fn optional_rate() -> impl Strategy<Value = Option<Decimal>> {
    prop::option::of((1i64..500_000i64).prop_map(|v| Decimal::new(v, 2)))
}

fn make_record(total_cost: Decimal, rate: Option<Decimal>) -> FinancialsRecord {
    let now = Utc::now();
    FinancialsRecord {
        id: FinancialsId::new(),
        vehicle_id: VehicleId::new(),
        total_cost,
        amount_paid: Decimal::ZERO,
        exchange_rate_at_clearing: rate,
        created_at: now,
        updated_at: now,
    }
}

proptest! {
    /// balance == total_cost - amount_paid after any sequence of payments.
    #[test]
    fn prop_balance_identity(
        total_cost in cost(),
        payments in prop::collection::vec(payment_amount(), 0..20),
    ) {
        let mut record = make_record(total_cost, None);
        for amount in &payments {
            LedgerService::validate_payment_amount(*amount).unwrap();
            record.amount_paid = LedgerService::apply_payment(record.amount_paid, *amount);
        }

        let paid: Decimal = payments.iter().copied().sum();
        prop_assert_eq!(record.amount_paid, paid);
        prop_assert_eq!(record.balance(), total_cost - paid);
    }

    /// A non-zero payment of either sign moves amount_paid by exactly its amount.
    #[test]
    fn prop_payment_moves_accumulator_exactly(
        amount_paid in cost(),
        amount in payment_amount(),
    ) {
        prop_assert!(LedgerService::validate_payment_amount(amount).is_ok());
        let after = LedgerService::apply_payment(amount_paid, amount);
        prop_assert_eq!(after - amount_paid, amount);
    }

    /// Zero is rejected whatever its scale.
    #[test]
    fn prop_zero_rejected_at_any_scale(scale in 0u32..10) {
        let zero = Decimal::new(0, scale);
        prop_assert_eq!(
            LedgerService::validate_payment_amount(zero),
            Err(LedgerError::InvalidAmount)
        );
    }

    /// Applying an update plan changes exactly the supplied, differing fields.
    #[test]
    fn prop_update_respects_presence(
        total_cost in cost(),
        rate in optional_rate(),
        new_cost in prop::option::of(cost()),
        new_rate in prop::option::of(optional_rate()),
    ) {
        let original = make_record(total_cost, rate);
        let input = UpdateFinancialsInput {
            total_cost: new_cost,
            exchange_rate_at_clearing: new_rate,
        };

        let mut updated = original.clone();
        if let Some(plan) = LedgerService::plan_update(&original, &input) {
            plan.apply(&mut updated);
        }

        prop_assert_eq!(updated.total_cost, new_cost.unwrap_or(total_cost));
        prop_assert_eq!(updated.exchange_rate_at_clearing, new_rate.unwrap_or(rate));
        prop_assert_eq!(updated.amount_paid, original.amount_paid);
    }
}
