//! Vehicle registry types.
//!
//! Vehicles are the keys the estimator searches on (`make`, `model`, `year`,
//! `terminal`) and the owners of financial records. Their status moves
//! through the clearing pipeline; every change is audited.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clearlane_shared::types::{UserId, VehicleId};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit::{AuditAction, AuditEntryDraft, AuditTable, AuditValue};

/// Position of a vehicle in the clearing pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleStatus {
    /// Shipped, not yet at the port.
    #[default]
    #[serde(rename = "In Transit")]
    InTransit,
    /// At the port, clearing in progress.
    Clearing,
    /// Cleared and released.
    Done,
}

impl VehicleStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InTransit => "In Transit",
            Self::Clearing => "Clearing",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "in transit" => Ok(Self::InTransit),
            "clearing" => Ok(Self::Clearing),
            "done" => Ok(Self::Done),
            _ => Err(format!("Unknown vehicle status: {s}")),
        }
    }
}

/// Input for registering a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVehicleInput {
    /// Vehicle identification number; unique.
    pub vin: String,
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Model year.
    pub year: i32,
    /// Port terminal the vehicle clears through.
    #[serde(default)]
    pub terminal: Option<String>,
    /// Customer who owns the vehicle.
    #[serde(default)]
    pub owner_id: Option<UserId>,
}

/// Vehicle returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleView {
    /// Vehicle id.
    pub id: VehicleId,
    /// Vehicle identification number.
    pub vin: String,
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Model year.
    pub year: i32,
    /// Port terminal.
    pub terminal: Option<String>,
    /// Pipeline status.
    pub status: VehicleStatus,
    /// Owning customer.
    pub owner_id: Option<UserId>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Filter for listing vehicles. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleFilter {
    /// Case-insensitive substring of the VIN or the make.
    #[serde(default)]
    pub search: Option<String>,
    /// Only vehicles in this status.
    #[serde(default)]
    pub status: Option<VehicleStatus>,
    /// Only vehicles owned by this customer.
    #[serde(default)]
    pub owner_id: Option<UserId>,
}

impl VehicleFilter {
    /// The search term with surrounding whitespace removed, if any remains.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// Vehicle rules with no database dependencies.
pub struct VehicleService;

impl VehicleService {
    /// UPDATE audit entry for a status change.
    ///
    /// Returns `None` when the status does not change; nothing is written or
    /// audited in that case.
    #[must_use]
    pub fn status_change_audit(
        actor_id: Option<UserId>,
        vehicle_id: VehicleId,
        current: VehicleStatus,
        next: VehicleStatus,
    ) -> Option<AuditEntryDraft> {
        if current == next {
            return None;
        }
        Some(AuditEntryDraft::new(
            actor_id,
            AuditAction::Update,
            AuditTable::Vehicles,
            Some(vehicle_id.into_inner()),
            Some(&AuditValue::Structured(json!({ "status": current.as_str() }))),
            Some(&AuditValue::Structured(json!({ "status": next.as_str() }))),
        ))
    }
}
