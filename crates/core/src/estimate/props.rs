//! Property-based tests for the estimator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::{Estimator, HistoricalCost};
use super::tier::{EstimateQuery, MatchTier};

fn cost() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000_000i64).prop_map(|kobo| Decimal::new(kobo, 2))
}

fn rate() -> impl Strategy<Value = Decimal> {
    (1i64..500_000i64).prop_map(|v| Decimal::new(v, 2))
}

fn historical_cost() -> impl Strategy<Value = HistoricalCost> {
    (cost(), prop::option::of(rate())).prop_map(|(total_cost, exchange_rate_at_clearing)| {
        HistoricalCost {
            total_cost,
            exchange_rate_at_clearing,
        }
    })
}

proptest! {
    /// Without a current rate the estimate is the plain mean of raw costs.
    #[test]
    fn prop_unnormalized_average_is_mean(costs in prop::collection::vec(historical_cost(), 1..30)) {
        let result = Estimator::summarize(MatchTier::Exact, &costs, None).unwrap();
        let min = costs.iter().map(|c| c.total_cost).min().unwrap();
        let max = costs.iter().map(|c| c.total_cost).max().unwrap();

        prop_assert!(!result.is_normalized);
        prop_assert_eq!(result.sample_size, costs.len());
        prop_assert!(result.average_clearing_cost >= min);
        prop_assert!(result.average_clearing_cost <= max);
    }

    /// is_normalized reflects only whether a current rate was available.
    #[test]
    fn prop_is_normalized_tracks_current_rate(
        costs in prop::collection::vec(historical_cost(), 1..30),
        current in prop::option::of(rate()),
    ) {
        let result = Estimator::summarize(MatchTier::MakeOnly, &costs, current).unwrap();
        prop_assert_eq!(result.is_normalized, current.is_some());
    }

    /// Records without a rate contribute exactly their raw cost.
    #[test]
    fn prop_rateless_record_is_raw(total_cost in cost(), current in rate()) {
        let record = HistoricalCost { total_cost, exchange_rate_at_clearing: None };
        prop_assert_eq!(Estimator::record_cost(&record, Some(current)), total_cost);
    }

    /// Terminal tiers only appear, and always come first, when a terminal is given.
    #[test]
    fn prop_tier_order(terminal in prop::option::of("[A-Z]{3,5}")) {
        let mut query = EstimateQuery::new("Toyota", "Camry", 2018);
        query.terminal = terminal.clone();
        let tiers = query.tiers();

        let expected_len = if terminal.is_some() { 9 } else { 5 };
        prop_assert_eq!(tiers.len(), expected_len);
        let first_base = tiers.iter().position(|t| !t.uses_terminal()).unwrap();
        prop_assert!(tiers[first_base..].iter().all(|t| !t.uses_terminal()));
        prop_assert_eq!(tiers.last().copied(), Some(MatchTier::YearOnly));
    }
}
