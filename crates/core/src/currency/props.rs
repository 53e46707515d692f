//! Property-based tests for currency normalization.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::CurrencyService;

/// Strategy to generate positive decimal amounts (0.01 to 100,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000_000i64).prop_map(|kobo| Decimal::new(kobo, 2))
}

/// Strategy to generate positive exchange rates (0.01 to 5,000.00).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..500_000i64).prop_map(|v| Decimal::new(v, 2))
}

proptest! {
    /// Restating at the rate it was recorded at leaves the amount unchanged.
    #[test]
    fn prop_same_rate_is_identity(amount in positive_amount(), rate in positive_rate()) {
        let normalized = CurrencyService::normalize(amount, rate, rate).unwrap();
        prop_assert_eq!(normalized, amount);
    }

    /// A higher current rate never lowers a positive cost, a lower one never raises it.
    #[test]
    fn prop_normalization_is_monotonic(
        amount in positive_amount(),
        historical in positive_rate(),
        current in positive_rate(),
    ) {
        let normalized = CurrencyService::normalize(amount, historical, current).unwrap();
        if current > historical {
            prop_assert!(normalized >= amount);
        } else if current < historical {
            prop_assert!(normalized <= amount);
        }
    }

    /// Result never carries more than four decimal places.
    #[test]
    fn prop_normalized_scale_bounded(
        amount in positive_amount(),
        historical in positive_rate(),
        current in positive_rate(),
    ) {
        let normalized = CurrencyService::normalize(amount, historical, current).unwrap();
        prop_assert!(normalized.scale() <= 4);
    }
}
