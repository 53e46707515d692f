//! Ledger service for validating mutations and shaping their audit entries.
//!
//! This module holds the pure half of every ledger operation: what is allowed,
//! what changes, and what the audit log must say about it. Persistence lives
//! in the db crate, which stages the mutation and its audit entry in one
//! database transaction.

use clearlane_shared::types::{FinancialsId, PaymentId, UserId};
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{CreateFinancialsInput, FinancialsRecord, UpdateFinancialsInput};
use crate::audit::{AuditAction, AuditEntryDraft, AuditTable, AuditValue};

/// Fields an update will actually change, with their before and after values.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialsUpdatePlan {
    /// New total cost, if it changes.
    pub total_cost: Option<Decimal>,
    /// New exchange rate, if it changes (`Some(None)` clears it).
    pub exchange_rate_at_clearing: Option<Option<Decimal>>,
    old: Map<String, Value>,
    new: Map<String, Value>,
}

impl FinancialsUpdatePlan {
    /// Applies the planned changes to `record` in place.
    pub fn apply(&self, record: &mut FinancialsRecord) {
        if let Some(total_cost) = self.total_cost {
            record.total_cost = total_cost;
        }
        if let Some(rate) = self.exchange_rate_at_clearing {
            record.exchange_rate_at_clearing = rate;
        }
    }

    /// UPDATE audit entry listing only the changed fields.
    #[must_use]
    pub fn audit_entry(
        &self,
        actor_id: Option<UserId>,
        financials_id: FinancialsId,
    ) -> AuditEntryDraft {
        AuditEntryDraft::new(
            actor_id,
            AuditAction::Update,
            AuditTable::Financials,
            Some(financials_id.into_inner()),
            Some(&AuditValue::Structured(Value::Object(self.old.clone()))),
            Some(&AuditValue::Structured(Value::Object(self.new.clone()))),
        )
    }
}

/// Ledger service for financial record rules.
///
/// Pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// CREATE audit entry for a new financial record.
    #[must_use]
    pub fn creation_audit(
        actor_id: Option<UserId>,
        financials_id: FinancialsId,
        input: &CreateFinancialsInput,
    ) -> AuditEntryDraft {
        let new_value = json!({
            "total_cost": input.total_cost,
            "exchange_rate_at_clearing": input.exchange_rate_at_clearing,
        });
        AuditEntryDraft::new(
            actor_id,
            AuditAction::Create,
            AuditTable::Financials,
            Some(financials_id.into_inner()),
            None,
            Some(&AuditValue::Structured(new_value)),
        )
    }

    /// Works out which supplied fields differ from the stored record.
    ///
    /// Returns `None` when nothing would change; no audit entry is written in
    /// that case.
    #[must_use]
    pub fn plan_update(
        current: &FinancialsRecord,
        input: &UpdateFinancialsInput,
    ) -> Option<FinancialsUpdatePlan> {
        let mut plan = FinancialsUpdatePlan {
            total_cost: None,
            exchange_rate_at_clearing: None,
            old: Map::new(),
            new: Map::new(),
        };

        if let Some(total_cost) = input.total_cost.filter(|cost| *cost != current.total_cost) {
            plan.old.insert("total_cost".into(), json!(current.total_cost));
            plan.new.insert("total_cost".into(), json!(total_cost));
            plan.total_cost = Some(total_cost);
        }

        if let Some(rate) = input
            .exchange_rate_at_clearing
            .filter(|rate| *rate != current.exchange_rate_at_clearing)
        {
            plan.old.insert(
                "exchange_rate_at_clearing".into(),
                json!(current.exchange_rate_at_clearing),
            );
            plan.new.insert("exchange_rate_at_clearing".into(), json!(rate));
            plan.exchange_rate_at_clearing = Some(rate);
        }

        if plan.old.is_empty() {
            None
        } else {
            Some(plan)
        }
    }

    /// Validates a payment amount.
    ///
    /// Any non-zero amount is accepted; negative amounts are refunds.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` if `amount` is zero.
    pub fn validate_payment_amount(amount: Decimal) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }
        Ok(())
    }

    /// Applies a payment to the running `amount_paid`.
    #[must_use]
    pub fn apply_payment(amount_paid: Decimal, amount: Decimal) -> Decimal {
        amount_paid + amount
    }

    /// PAYMENT audit entry.
    ///
    /// `amount_paid_after` is the accumulator after the increment; the old
    /// value is derived from it.
    #[must_use]
    pub fn payment_audit(
        actor_id: Option<UserId>,
        payment_id: PaymentId,
        amount: Decimal,
        amount_paid_after: Decimal,
    ) -> AuditEntryDraft {
        let old_value = json!({ "amount_paid": amount_paid_after - amount });
        let new_value = json!({ "amount": amount, "amount_paid": amount_paid_after });
        AuditEntryDraft::new(
            actor_id,
            AuditAction::Payment,
            AuditTable::Payments,
            Some(payment_id.into_inner()),
            Some(&AuditValue::Structured(old_value)),
            Some(&AuditValue::Structured(new_value)),
        )
    }

    /// CREATE audit entry for a generic row, keyed by table.
    #[must_use]
    pub fn row_creation_audit(
        actor_id: Option<UserId>,
        table: AuditTable,
        record_id: Uuid,
        new_value: AuditValue,
    ) -> AuditEntryDraft {
        AuditEntryDraft::new(
            actor_id,
            AuditAction::Create,
            table,
            Some(record_id),
            None,
            Some(&new_value),
        )
    }
}
