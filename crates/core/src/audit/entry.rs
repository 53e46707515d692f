//! Audit entry drafts produced by ledger operations.

use std::fmt;
use std::str::FromStr;

use clearlane_shared::types::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value::AuditValue;

/// Kind of mutation an audit entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    /// A row was created.
    Create,
    /// A row was changed.
    Update,
    /// A payment was recorded against a financial record.
    Payment,
    /// A row was deleted.
    Delete,
}

impl AuditAction {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Payment => "PAYMENT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "PAYMENT" => Ok(Self::Payment),
            "DELETE" => Ok(Self::Delete),
            _ => Err(format!("Unknown audit action: {s}")),
        }
    }
}

/// Tables whose mutations are audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditTable {
    /// `vehicles`
    Vehicles,
    /// `financials`
    Financials,
    /// `payments`
    Payments,
}

impl AuditTable {
    /// Returns the table name as stored in the audit log.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::Financials => "financials",
            Self::Payments => "payments",
        }
    }
}

impl fmt::Display for AuditTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vehicles" => Ok(Self::Vehicles),
            "financials" => Ok(Self::Financials),
            "payments" => Ok(Self::Payments),
            _ => Err(format!("Unknown audited table: {s}")),
        }
    }
}

/// An audit entry ready to be staged, with values already rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntryDraft {
    /// Acting user; `None` for system-initiated changes.
    pub actor_id: Option<UserId>,
    /// What happened.
    pub action: AuditAction,
    /// Table of the mutated row.
    pub table_name: &'static str,
    /// Id of the mutated row.
    pub record_id: Option<Uuid>,
    /// Rendered value before the mutation.
    pub old_value: Option<String>,
    /// Rendered value after the mutation.
    pub new_value: Option<String>,
}

impl AuditEntryDraft {
    /// Builds a draft, rendering both values.
    #[must_use]
    pub fn new(
        actor_id: Option<UserId>,
        action: AuditAction,
        table: AuditTable,
        record_id: Option<Uuid>,
        old_value: Option<&AuditValue>,
        new_value: Option<&AuditValue>,
    ) -> Self {
        Self {
            actor_id,
            action,
            table_name: table.as_str(),
            record_id,
            old_value: AuditValue::render_opt(old_value),
            new_value: AuditValue::render_opt(new_value),
        }
    }
}
