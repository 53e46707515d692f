//! Historical cost lookups for the estimator.

use async_trait::async_trait;
use clearlane_core::estimate::{
    EstimateQuery, EstimateResult, Estimator, HistoricalCost, HistoricalCostSource, TierCriteria,
};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect, QueryTrait,
};

use crate::entities::{financials, vehicles};

/// Estimate repository reading financial records joined with their vehicles.
#[derive(Debug, Clone)]
pub struct EstimateRepository {
    db: DatabaseConnection,
}

impl EstimateRepository {
    /// Creates a new estimate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Estimates the clearing cost for `query` from historical records.
    ///
    /// Returns `Ok(None)` when no tier has historical data.
    ///
    /// # Errors
    ///
    /// Returns a database error if a tier query fails.
    pub async fn estimate(
        &self,
        query: &EstimateQuery,
        current_rate: Option<Decimal>,
    ) -> Result<Option<EstimateResult>, DbErr> {
        Estimator::estimate(self, query, current_rate).await
    }
}

#[async_trait]
impl HistoricalCostSource for EstimateRepository {
    type Error = DbErr;

    async fn costs_matching(
        &self,
        criteria: &TierCriteria<'_>,
    ) -> Result<Vec<HistoricalCost>, DbErr> {
        let rows = financials::Entity::find()
            .inner_join(vehicles::Entity)
            .apply_if(criteria.make, |q, make| q.filter(vehicles::Column::Make.eq(make)))
            .apply_if(criteria.model, |q, model| {
                q.filter(vehicles::Column::Model.eq(model))
            })
            .apply_if(criteria.year, |q, year| q.filter(vehicles::Column::Year.eq(year)))
            .apply_if(criteria.terminal, |q, terminal| {
                q.filter(vehicles::Column::Terminal.eq(terminal))
            })
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| HistoricalCost {
                total_cost: row.total_cost,
                exchange_rate_at_clearing: row.exchange_rate_at_clearing,
            })
            .collect())
    }
}
