//! Audit trail persistence.
//!
//! Entries are staged on the caller's transaction and become visible only
//! when that transaction commits; a rolled-back mutation leaves no entry.

use chrono::{DateTime, Utc};
use clearlane_core::audit::{AuditAction, AuditEntryDraft, AuditTable};
use clearlane_shared::types::{AuditLogId, SliceRequest, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::entities::audit_logs;

/// Stages audit entries inside an open transaction.
pub struct AuditRecorder;

impl AuditRecorder {
    /// Adds `draft` to `txn` without committing.
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails; the caller's
    /// transaction should then be abandoned.
    pub async fn record(
        txn: &DatabaseTransaction,
        draft: AuditEntryDraft,
    ) -> Result<audit_logs::Model, DbErr> {
        let entry = audit_logs::ActiveModel {
            id: Set(AuditLogId::new().into_inner()),
            user_id: Set(draft.actor_id.map(UserId::into_inner)),
            action: Set(draft.action.as_str().to_string()),
            table_name: Set(draft.table_name.to_string()),
            record_id: Set(draft.record_id),
            old_value: Set(draft.old_value),
            new_value: Set(draft.new_value),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let model = entry.insert(txn).await?;
        debug!(
            action = %model.action,
            table = %model.table_name,
            record_id = ?model.record_id,
            "Audit entry staged"
        );
        Ok(model)
    }
}

/// Filter for listing audit entries. Unset fields are not constrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogFilter {
    /// Acting user.
    pub user_id: Option<UserId>,
    /// Action kind.
    pub action: Option<AuditAction>,
    /// Table of the mutated row.
    pub table: Option<AuditTable>,
    /// Mutated row.
    pub record_id: Option<Uuid>,
    /// Inclusive lower bound on the entry time.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the entry time.
    pub to: Option<DateTime<Utc>>,
}

/// Audit entry returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogView {
    /// Entry id.
    pub id: AuditLogId,
    /// Acting user.
    pub user_id: Option<UserId>,
    /// Action name as stored (`CREATE`, `UPDATE`, `PAYMENT`, `DELETE`).
    pub action: String,
    /// Table of the mutated row.
    pub table_name: String,
    /// Mutated row.
    pub record_id: Option<Uuid>,
    /// Rendered value before the mutation.
    pub old_value: Option<String>,
    /// Rendered value after the mutation.
    pub new_value: Option<String>,
    /// Entry time.
    pub created_at: DateTime<Utc>,
}

impl From<audit_logs::Model> for AuditLogView {
    fn from(model: audit_logs::Model) -> Self {
        Self {
            id: AuditLogId::from_uuid(model.id),
            user_id: model.user_id.map(UserId::from_uuid),
            action: model.action,
            table_name: model.table_name,
            record_id: model.record_id,
            old_value: model.old_value,
            new_value: model.new_value,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// Read access to the audit trail.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    db: DatabaseConnection,
}

impl AuditLogRepository {
    /// Creates a new audit log repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists entries matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list(
        &self,
        filter: &AuditLogFilter,
        slice: SliceRequest,
    ) -> Result<Vec<AuditLogView>, DbErr> {
        let rows = audit_logs::Entity::find()
            .apply_if(filter.user_id, |q, user_id| {
                q.filter(audit_logs::Column::UserId.eq(user_id.into_inner()))
            })
            .apply_if(filter.action, |q, action| {
                q.filter(audit_logs::Column::Action.eq(action.as_str()))
            })
            .apply_if(filter.table, |q, table| {
                q.filter(audit_logs::Column::TableName.eq(table.as_str()))
            })
            .apply_if(filter.record_id, |q, record_id| {
                q.filter(audit_logs::Column::RecordId.eq(record_id))
            })
            .apply_if(filter.from, |q, from| {
                q.filter(audit_logs::Column::CreatedAt.gte(from.fixed_offset()))
            })
            .apply_if(filter.to, |q, to| {
                q.filter(audit_logs::Column::CreatedAt.lte(to.fixed_offset()))
            })
            .order_by_desc(audit_logs::Column::CreatedAt)
            .order_by_desc(audit_logs::Column::Id)
            .offset(slice.offset())
            .limit(slice.limit())
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(AuditLogView::from).collect())
    }
}
