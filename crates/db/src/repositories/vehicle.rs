//! Vehicle repository.

use chrono::Utc;
use clearlane_core::audit::{AuditTable, AuditValue};
use clearlane_core::ledger::{LedgerError, LedgerService};
use clearlane_core::vehicle::{
    CreateVehicleInput, VehicleFilter, VehicleService, VehicleStatus, VehicleView,
};
use clearlane_shared::types::{SliceRequest, UserId, VehicleId};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Set, SqlErr, TransactionTrait,
};
use serde_json::json;
use tracing::{debug, info};

use super::audit_log::AuditRecorder;
use super::error::RepositoryError;
use crate::entities::vehicles;

impl TryFrom<vehicles::Model> for VehicleView {
    type Error = DbErr;

    fn try_from(model: vehicles::Model) -> Result<Self, Self::Error> {
        let status = model
            .status
            .parse::<VehicleStatus>()
            .map_err(DbErr::Type)?;

        Ok(Self {
            id: VehicleId::from_uuid(model.id),
            vin: model.vin,
            make: model.make,
            model: model.model,
            year: model.year,
            terminal: model.terminal,
            status,
            owner_id: model.owner_id.map(UserId::from_uuid),
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}

/// Matches `term` anywhere in the VIN or the make, ignoring case.
fn search_condition(term: &str) -> Condition {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let pattern = format!("%{escaped}%");

    [vehicles::Column::Vin, vehicles::Column::Make]
        .into_iter()
        .fold(Condition::any(), |condition, column| {
            condition.add(
                Expr::expr(Func::lower(Expr::col(column)))
                    .like(LikeExpr::new(pattern.clone()).escape('\\')),
            )
        })
}

/// Vehicle repository for registration, lookup, and status changes.
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    db: DatabaseConnection,
}

impl VehicleRepository {
    /// Creates a new vehicle repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a vehicle in the default `In Transit` status.
    ///
    /// The row and its CREATE audit entry commit together.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DuplicateVin` if the VIN is already registered.
    pub async fn create(
        &self,
        input: CreateVehicleInput,
        actor_id: Option<UserId>,
    ) -> Result<VehicleView, RepositoryError> {
        let txn = self.db.begin().await?;

        let existing = vehicles::Entity::find()
            .filter(vehicles::Column::Vin.eq(input.vin.as_str()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(LedgerError::DuplicateVin(input.vin).into());
        }

        let id = VehicleId::new();
        let now = Utc::now().fixed_offset();
        let status = VehicleStatus::default();
        let vehicle = vehicles::ActiveModel {
            id: Set(id.into_inner()),
            vin: Set(input.vin.clone()),
            make: Set(input.make.clone()),
            model: Set(input.model.clone()),
            year: Set(input.year),
            terminal: Set(input.terminal.clone()),
            status: Set(status.as_str().to_string()),
            owner_id: Set(input.owner_id.map(UserId::into_inner)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = match vehicle.insert(&txn).await {
            Ok(model) => model,
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(LedgerError::DuplicateVin(input.vin).into());
            }
            Err(err) => return Err(err.into()),
        };

        let snapshot = json!({
            "vin": input.vin,
            "make": input.make,
            "model": input.model,
            "year": input.year,
            "terminal": input.terminal,
            "status": status.as_str(),
        });
        AuditRecorder::record(
            &txn,
            LedgerService::row_creation_audit(
                actor_id,
                AuditTable::Vehicles,
                id.into_inner(),
                AuditValue::Structured(snapshot),
            ),
        )
        .await?;

        txn.commit().await?;
        info!(vehicle_id = %id, vin = %model.vin, "Vehicle registered");

        Ok(VehicleView::try_from(model)?)
    }

    /// Looks up a vehicle.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::VehicleNotFound` if no such vehicle exists.
    pub async fn get(&self, vehicle_id: VehicleId) -> Result<VehicleView, RepositoryError> {
        let model = vehicles::Entity::find_by_id(vehicle_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(LedgerError::VehicleNotFound(vehicle_id))?;

        Ok(VehicleView::try_from(model)?)
    }

    /// Looks up a vehicle by VIN.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn find_by_vin(&self, vin: &str) -> Result<Option<VehicleView>, RepositoryError> {
        let model = vehicles::Entity::find()
            .filter(vehicles::Column::Vin.eq(vin))
            .one(&self.db)
            .await?;

        model.map(VehicleView::try_from).transpose().map_err(Into::into)
    }

    /// Lists vehicles, newest first.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list(
        &self,
        filter: &VehicleFilter,
        slice: SliceRequest,
    ) -> Result<Vec<VehicleView>, RepositoryError> {
        let rows = vehicles::Entity::find()
            .apply_if(filter.search_term(), |q, term| q.filter(search_condition(term)))
            .apply_if(filter.status, |q, status| {
                q.filter(vehicles::Column::Status.eq(status.as_str()))
            })
            .apply_if(filter.owner_id, |q, owner_id| {
                q.filter(vehicles::Column::OwnerId.eq(owner_id.into_inner()))
            })
            .order_by_desc(vehicles::Column::CreatedAt)
            .order_by_desc(vehicles::Column::Id)
            .offset(slice.offset())
            .limit(slice.limit())
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(VehicleView::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Moves a vehicle to `status`.
    ///
    /// The change and its UPDATE audit entry commit together. Setting the
    /// current status again writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::VehicleNotFound` if no such vehicle exists.
    pub async fn update_status(
        &self,
        vehicle_id: VehicleId,
        status: VehicleStatus,
        actor_id: Option<UserId>,
    ) -> Result<VehicleView, RepositoryError> {
        let txn = self.db.begin().await?;

        let model = vehicles::Entity::find_by_id(vehicle_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(LedgerError::VehicleNotFound(vehicle_id))?;
        let current = VehicleView::try_from(model.clone())?;

        let Some(audit) =
            VehicleService::status_change_audit(actor_id, vehicle_id, current.status, status)
        else {
            debug!(vehicle_id = %vehicle_id, status = %status, "Vehicle status unchanged");
            txn.commit().await?;
            return Ok(current);
        };

        let mut active: vehicles::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        AuditRecorder::record(&txn, audit).await?;
        txn.commit().await?;

        info!(
            vehicle_id = %vehicle_id,
            from = %current.status,
            to = %status,
            "Vehicle status changed"
        );

        Ok(VehicleView::try_from(updated)?)
    }
}
