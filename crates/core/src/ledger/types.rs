//! Ledger domain types: stored records, caller inputs, and result views.

use chrono::{DateTime, Utc};
use clearlane_shared::types::{FinancialsId, PaymentId, UserId, VehicleId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::balance;
use crate::currency::CurrencyService;
use crate::currency::service::{AMOUNT_SCALE, RATE_SCALE};

fn round_amount(value: Decimal) -> Decimal {
    CurrencyService::round(value, AMOUNT_SCALE)
}

fn round_rate(value: Decimal) -> Decimal {
    CurrencyService::round(value, RATE_SCALE)
}

/// A vehicle's financial record as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialsRecord {
    /// Record id.
    pub id: FinancialsId,
    /// Owning vehicle.
    pub vehicle_id: VehicleId,
    /// Total clearing cost.
    pub total_cost: Decimal,
    /// Sum of all payment amounts recorded so far.
    pub amount_paid: Decimal,
    /// Customs exchange rate in effect when the cost was recorded.
    pub exchange_rate_at_clearing: Option<Decimal>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl FinancialsRecord {
    /// Derived outstanding balance.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        balance(self.total_cost, self.amount_paid)
    }
}

/// Financial record returned to callers, with its derived balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialsView {
    /// Record id.
    pub id: FinancialsId,
    /// Owning vehicle.
    pub vehicle_id: VehicleId,
    /// Total clearing cost.
    pub total_cost: Decimal,
    /// Sum of all payments.
    pub amount_paid: Decimal,
    /// Exchange rate at clearing, if recorded.
    pub exchange_rate_at_clearing: Option<Decimal>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// `total_cost - amount_paid`.
    pub balance: Decimal,
}

impl From<FinancialsRecord> for FinancialsView {
    fn from(record: FinancialsRecord) -> Self {
        let balance = record.balance();
        Self {
            id: record.id,
            vehicle_id: record.vehicle_id,
            total_cost: record.total_cost,
            amount_paid: record.amount_paid,
            exchange_rate_at_clearing: record.exchange_rate_at_clearing,
            created_at: record.created_at,
            updated_at: record.updated_at,
            balance,
        }
    }
}

/// Payment returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentView {
    /// Payment id.
    pub id: PaymentId,
    /// Financial record the payment belongs to.
    pub financial_id: FinancialsId,
    /// Signed amount; negative for refunds and credits.
    pub amount: Decimal,
    /// When the payment was made.
    pub payment_date: DateTime<Utc>,
    /// Free-text reference (receipt number, bank reference, ...).
    pub reference: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// User who recorded the payment.
    pub recorded_by_id: Option<UserId>,
    /// When the payment was recorded.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a vehicle's financial record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFinancialsInput {
    /// Total clearing cost.
    #[serde(default)]
    pub total_cost: Decimal,
    /// Exchange rate at clearing.
    #[serde(default)]
    pub exchange_rate_at_clearing: Option<Decimal>,
}

impl CreateFinancialsInput {
    /// Rounds the amounts to the precision the store keeps.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            total_cost: round_amount(self.total_cost),
            exchange_rate_at_clearing: self.exchange_rate_at_clearing.map(round_rate),
        }
    }
}

/// Partial update of a financial record.
///
/// `None` means "leave unchanged". For the exchange rate, `Some(None)` clears
/// the stored rate while `None` keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFinancialsInput {
    /// New total cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<Decimal>,
    /// New exchange rate at clearing.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub exchange_rate_at_clearing: Option<Option<Decimal>>,
}

impl UpdateFinancialsInput {
    /// Returns true if no field was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_cost.is_none() && self.exchange_rate_at_clearing.is_none()
    }

    /// Rounds the supplied amounts to the precision the store keeps.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            total_cost: self.total_cost.map(round_amount),
            exchange_rate_at_clearing: self
                .exchange_rate_at_clearing
                .map(|rate| rate.map(round_rate)),
        }
    }
}

/// Input for recording a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPaymentInput {
    /// Signed, non-zero amount.
    pub amount: Decimal,
    /// Defaults to the time the payment is recorded.
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
    /// Free-text reference.
    #[serde(default)]
    pub reference: Option<String>,
    /// Notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl RecordPaymentInput {
    /// Payment of `amount` with no date, reference, or notes.
    #[must_use]
    pub const fn amount(amount: Decimal) -> Self {
        Self {
            amount,
            payment_date: None,
            reference: None,
            notes: None,
        }
    }

    /// Rounds the amount to the precision the store keeps.
    ///
    /// Amounts below the stored precision round to zero and are then
    /// rejected as invalid.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            amount: round_amount(self.amount),
            ..self
        }
    }
}
