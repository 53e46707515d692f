//! Financial record repository.
//!
//! Every mutation runs in one database transaction together with its audit
//! entry. Payments increment `amount_paid` in place with a single UPDATE
//! statement so concurrent payments on the same record never lose updates.

use chrono::Utc;
use clearlane_core::ledger::{
    CreateFinancialsInput, FinancialsRecord, FinancialsView, LedgerError, LedgerService,
    PaymentView, RecordPaymentInput, UpdateFinancialsInput,
};
use clearlane_shared::types::{FinancialsId, PaymentId, SliceRequest, UserId, VehicleId};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, info};

use super::audit_log::AuditRecorder;
use super::error::RepositoryError;
use crate::entities::{financials, payments, vehicles};

fn to_record(model: financials::Model) -> FinancialsRecord {
    FinancialsRecord {
        id: FinancialsId::from_uuid(model.id),
        vehicle_id: VehicleId::from_uuid(model.vehicle_id),
        total_cost: model.total_cost,
        amount_paid: model.amount_paid,
        exchange_rate_at_clearing: model.exchange_rate_at_clearing,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn to_payment_view(model: payments::Model) -> PaymentView {
    PaymentView {
        id: PaymentId::from_uuid(model.id),
        financial_id: FinancialsId::from_uuid(model.financial_id),
        amount: model.amount,
        payment_date: model.payment_date.with_timezone(&Utc),
        reference: model.reference,
        notes: model.notes,
        recorded_by_id: model.recorded_by_id.map(UserId::from_uuid),
        created_at: model.created_at.with_timezone(&Utc),
    }
}

/// Loads a vehicle's financial record on `conn`.
async fn find_for_vehicle<C>(
    conn: &C,
    vehicle_id: VehicleId,
) -> Result<Option<financials::Model>, DbErr>
where
    C: ConnectionTrait,
{
    financials::Entity::find()
        .filter(financials::Column::VehicleId.eq(vehicle_id.into_inner()))
        .one(conn)
        .await
}

/// Financial record repository for the ledger operations.
#[derive(Debug, Clone)]
pub struct FinancialsRepository {
    db: DatabaseConnection,
}

impl FinancialsRepository {
    /// Creates a new financials repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the financial record of a vehicle with `amount_paid = 0`.
    ///
    /// # Errors
    ///
    /// - `LedgerError::VehicleNotFound` if the vehicle does not exist
    /// - `LedgerError::AlreadyExists` if the vehicle already has a record;
    ///   the existing record is left untouched
    pub async fn create(
        &self,
        vehicle_id: VehicleId,
        input: CreateFinancialsInput,
        actor_id: Option<UserId>,
    ) -> Result<FinancialsView, RepositoryError> {
        let input = input.rounded();
        let txn = self.db.begin().await?;

        let vehicle = vehicles::Entity::find_by_id(vehicle_id.into_inner())
            .one(&txn)
            .await?;
        if vehicle.is_none() {
            return Err(LedgerError::VehicleNotFound(vehicle_id).into());
        }

        if find_for_vehicle(&txn, vehicle_id).await?.is_some() {
            return Err(LedgerError::AlreadyExists(vehicle_id).into());
        }

        let id = FinancialsId::new();
        let now = Utc::now().fixed_offset();
        let record = financials::ActiveModel {
            id: Set(id.into_inner()),
            vehicle_id: Set(vehicle_id.into_inner()),
            total_cost: Set(input.total_cost),
            amount_paid: Set(Decimal::ZERO),
            exchange_rate_at_clearing: Set(input.exchange_rate_at_clearing),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // Two concurrent creates can both pass the lookup above; the unique
        // index on vehicle_id decides.
        let model = match record.insert(&txn).await {
            Ok(model) => model,
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(LedgerError::AlreadyExists(vehicle_id).into());
            }
            Err(err) => return Err(err.into()),
        };

        AuditRecorder::record(&txn, LedgerService::creation_audit(actor_id, id, &input)).await?;
        txn.commit().await?;

        info!(
            vehicle_id = %vehicle_id,
            financials_id = %id,
            total_cost = %input.total_cost,
            "Financial record created"
        );

        Ok(FinancialsView::from(to_record(model)))
    }

    /// Applies a partial update to a vehicle's financial record.
    ///
    /// Supplied amounts are rounded to the stored precision first. Only
    /// fields that then differ from the stored values are written and
    /// audited. When nothing changes the record is returned as is and no
    /// audit entry is written. The returned view is the row as stored.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::FinancialsNotFound` if the vehicle has no record.
    pub async fn update(
        &self,
        vehicle_id: VehicleId,
        input: UpdateFinancialsInput,
        actor_id: Option<UserId>,
    ) -> Result<FinancialsView, RepositoryError> {
        let input = input.rounded();
        let txn = self.db.begin().await?;

        let model = find_for_vehicle(&txn, vehicle_id)
            .await?
            .ok_or(LedgerError::FinancialsNotFound(vehicle_id))?;
        let record = to_record(model.clone());

        let Some(plan) = LedgerService::plan_update(&record, &input) else {
            debug!(vehicle_id = %vehicle_id, "Financial record update changed nothing");
            txn.commit().await?;
            return Ok(FinancialsView::from(record));
        };

        let mut active: financials::ActiveModel = model.into();
        if let Some(total_cost) = plan.total_cost {
            active.total_cost = Set(total_cost);
        }
        if let Some(rate) = plan.exchange_rate_at_clearing {
            active.exchange_rate_at_clearing = Set(rate);
        }
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        AuditRecorder::record(&txn, plan.audit_entry(actor_id, record.id)).await?;
        txn.commit().await?;

        info!(vehicle_id = %vehicle_id, financials_id = %record.id, "Financial record updated");

        Ok(FinancialsView::from(to_record(updated)))
    }

    /// Records a payment against a vehicle's financial record.
    ///
    /// The payment row, the `amount_paid` increment, and the PAYMENT audit
    /// entry commit together or not at all.
    ///
    /// # Errors
    ///
    /// - `LedgerError::FinancialsNotFound` if the vehicle has no record
    /// - `LedgerError::InvalidAmount` if the amount is zero at the stored
    ///   precision
    pub async fn record_payment(
        &self,
        vehicle_id: VehicleId,
        input: RecordPaymentInput,
        actor_id: Option<UserId>,
    ) -> Result<PaymentView, RepositoryError> {
        let input = input.rounded();
        let txn = self.db.begin().await?;

        let financials = find_for_vehicle(&txn, vehicle_id)
            .await?
            .ok_or(LedgerError::FinancialsNotFound(vehicle_id))?;
        LedgerService::validate_payment_amount(input.amount)?;

        let payment_id = PaymentId::new();
        let now = Utc::now();
        let payment = payments::ActiveModel {
            id: Set(payment_id.into_inner()),
            financial_id: Set(financials.id),
            amount: Set(input.amount),
            payment_date: Set(input.payment_date.unwrap_or(now).fixed_offset()),
            reference: Set(input.reference),
            notes: Set(input.notes),
            recorded_by_id: Set(actor_id.map(UserId::into_inner)),
            created_at: Set(now.fixed_offset()),
        };
        let payment = payment.insert(&txn).await?;

        financials::Entity::update_many()
            .col_expr(
                financials::Column::AmountPaid,
                Expr::col(financials::Column::AmountPaid).add(input.amount),
            )
            .col_expr(financials::Column::UpdatedAt, Expr::value(now.fixed_offset()))
            .filter(financials::Column::Id.eq(financials.id))
            .exec(&txn)
            .await?;

        let amount_paid = financials::Entity::find_by_id(financials.id)
            .one(&txn)
            .await?
            .map(|model| model.amount_paid)
            .ok_or(LedgerError::FinancialsNotFound(vehicle_id))?;

        AuditRecorder::record(
            &txn,
            LedgerService::payment_audit(actor_id, payment_id, input.amount, amount_paid),
        )
        .await?;
        txn.commit().await?;

        info!(
            vehicle_id = %vehicle_id,
            payment_id = %payment_id,
            amount = %input.amount,
            amount_paid = %amount_paid,
            "Payment recorded"
        );

        Ok(to_payment_view(payment))
    }

    /// Lists the payments of a vehicle's financial record, newest first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::FinancialsNotFound` if the vehicle has no record.
    pub async fn list_payments(
        &self,
        vehicle_id: VehicleId,
        slice: SliceRequest,
    ) -> Result<Vec<PaymentView>, RepositoryError> {
        let financials = find_for_vehicle(&self.db, vehicle_id)
            .await?
            .ok_or(LedgerError::FinancialsNotFound(vehicle_id))?;

        let rows = payments::Entity::find()
            .filter(payments::Column::FinancialId.eq(financials.id))
            .order_by_desc(payments::Column::CreatedAt)
            .order_by_desc(payments::Column::Id)
            .offset(slice.offset())
            .limit(slice.limit())
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(to_payment_view).collect())
    }

    /// Returns a vehicle's financial record with its balance.
    ///
    /// # Errors
    ///
    /// - `LedgerError::VehicleNotFound` if the vehicle does not exist
    /// - `LedgerError::FinancialsNotFound` if it has no record yet
    pub async fn get_summary(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<FinancialsView, RepositoryError> {
        let vehicle = vehicles::Entity::find_by_id(vehicle_id.into_inner())
            .one(&self.db)
            .await?;
        if vehicle.is_none() {
            return Err(LedgerError::VehicleNotFound(vehicle_id).into());
        }

        let model = find_for_vehicle(&self.db, vehicle_id)
            .await?
            .ok_or(LedgerError::FinancialsNotFound(vehicle_id))?;

        Ok(FinancialsView::from(to_record(model)))
    }

    /// Lists financial records, newest first, optionally for one vehicle.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list(
        &self,
        vehicle_id: Option<VehicleId>,
        slice: SliceRequest,
    ) -> Result<Vec<FinancialsView>, RepositoryError> {
        let rows = financials::Entity::find()
            .apply_if(vehicle_id, |q, vehicle_id| {
                q.filter(financials::Column::VehicleId.eq(vehicle_id.into_inner()))
            })
            .order_by_desc(financials::Column::CreatedAt)
            .order_by_desc(financials::Column::Id)
            .offset(slice.offset())
            .limit(slice.limit())
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|model| FinancialsView::from(to_record(model)))
            .collect())
    }
}
