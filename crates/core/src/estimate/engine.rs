//! Historical clearing cost estimator.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::tier::{EstimateQuery, MatchTier, TierCriteria};
use crate::currency::CurrencyService;
use crate::currency::service::AMOUNT_SCALE;

/// Cost figures of one historical financial record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricalCost {
    /// Total clearing cost as recorded.
    pub total_cost: Decimal,
    /// Exchange rate in effect when the cost was recorded.
    pub exchange_rate_at_clearing: Option<Decimal>,
}

/// Averaged estimate with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateResult {
    /// Mean of the per-record costs in the matched tier.
    pub average_clearing_cost: Decimal,
    /// Number of records in the matched tier.
    pub sample_size: usize,
    /// True when a current rate was available, even if some records had no
    /// rate of their own and contributed their raw cost.
    pub is_normalized: bool,
    /// Tier that produced the records.
    pub match_type: MatchTier,
}

/// Read access to historical financial records joined with their vehicles.
#[async_trait]
pub trait HistoricalCostSource {
    /// Error raised by the underlying store.
    type Error: Send;

    /// Cost figures of every financial record whose vehicle satisfies `criteria`.
    async fn costs_matching(
        &self,
        criteria: &TierCriteria<'_>,
    ) -> Result<Vec<HistoricalCost>, Self::Error>;
}

/// Estimator for historical clearing costs.
pub struct Estimator;

impl Estimator {
    /// Runs the fallback search and averages the first tier with any records.
    ///
    /// `current_rate` is today's customs exchange rate; `None` (or a
    /// non-positive value) disables normalization. Returns `Ok(None)` when no
    /// tier has historical data.
    ///
    /// # Errors
    ///
    /// Propagates the source's error unchanged.
    pub async fn estimate<S>(
        source: &S,
        query: &EstimateQuery,
        current_rate: Option<Decimal>,
    ) -> Result<Option<EstimateResult>, S::Error>
    where
        S: HistoricalCostSource + Sync,
    {
        for tier in query.tiers() {
            let criteria = tier.criteria(query);
            let costs = source.costs_matching(&criteria).await?;
            debug!(match_type = %tier, records = costs.len(), "Estimator tier evaluated");

            if let Some(result) = Self::summarize(tier, &costs, current_rate) {
                return Ok(Some(result));
            }
        }

        Ok(None)
    }

    /// Cost a single record contributes to the average.
    ///
    /// Normalized when both the record's rate and `current_rate` are strictly
    /// positive, otherwise the raw total cost.
    #[must_use]
    pub fn record_cost(cost: &HistoricalCost, current_rate: Option<Decimal>) -> Decimal {
        let current_rate = current_rate.filter(|rate| *rate > Decimal::ZERO);
        match (cost.exchange_rate_at_clearing, current_rate) {
            (Some(recorded), Some(current)) => {
                CurrencyService::normalize(cost.total_cost, recorded, current)
                    .unwrap_or(cost.total_cost)
            }
            _ => cost.total_cost,
        }
    }

    /// Averages one tier's records. Returns `None` for an empty tier.
    #[must_use]
    pub fn summarize(
        tier: MatchTier,
        costs: &[HistoricalCost],
        current_rate: Option<Decimal>,
    ) -> Option<EstimateResult> {
        if costs.is_empty() {
            return None;
        }

        let current_rate = current_rate.filter(|rate| *rate > Decimal::ZERO);
        let is_normalized = current_rate.is_some();

        if is_normalized {
            let raw = costs
                .iter()
                .filter(|c| !c.exchange_rate_at_clearing.is_some_and(|r| r > Decimal::ZERO))
                .count();
            if raw > 0 {
                warn!(
                    match_type = %tier,
                    raw,
                    sample_size = costs.len(),
                    "Records without a usable exchange rate contribute raw cost"
                );
            }
        }

        let total: Decimal = costs
            .iter()
            .map(|cost| Self::record_cost(cost, current_rate))
            .sum();
        let average = CurrencyService::round(total / Decimal::from(costs.len()), AMOUNT_SCALE);

        Some(EstimateResult {
            average_clearing_cost: average,
            sample_size: costs.len(),
            is_normalized,
            match_type: tier,
        })
    }
}
