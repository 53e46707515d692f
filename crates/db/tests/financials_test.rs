//! Integration tests for `FinancialsRepository`.
//!
//! Covers record creation, partial updates, payments and the audit entries
//! each mutation commits with.

mod common;

use std::str::FromStr;

use clearlane_core::audit::{AuditAction, AuditTable};
use clearlane_core::ledger::{
    CreateFinancialsInput, LedgerError, RecordPaymentInput, UpdateFinancialsInput,
};
use clearlane_db::{AuditLogFilter, AuditLogRepository, FinancialsRepository, RepositoryError};
use clearlane_shared::types::{SliceRequest, UserId, VehicleId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde_json::Value;

fn cost(total_cost: Decimal, rate: Option<Decimal>) -> CreateFinancialsInput {
    CreateFinancialsInput {
        total_cost,
        exchange_rate_at_clearing: rate,
    }
}

fn decimal_field(rendered: &str, field: &str) -> Decimal {
    let value: Value = serde_json::from_str(rendered).expect("audit value is JSON");
    let raw = value[field].as_str().expect("decimal rendered as string");
    Decimal::from_str(raw).expect("valid decimal")
}

async fn audit_entries(
    db: &DatabaseConnection,
    filter: AuditLogFilter,
) -> Vec<clearlane_db::AuditLogView> {
    AuditLogRepository::new(db.clone())
        .list(&filter, SliceRequest::default())
        .await
        .expect("Failed to list audit entries")
}

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn test_create_financials_starts_unpaid() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let repo = FinancialsRepository::new(db.clone());

    let view = repo
        .create(vehicle.id, cost(dec!(1500000), Some(dec!(1500))), None)
        .await
        .unwrap();

    assert_eq!(view.vehicle_id, vehicle.id);
    assert_eq!(view.total_cost, dec!(1500000));
    assert_eq!(view.amount_paid, Decimal::ZERO);
    assert_eq!(view.balance, dec!(1500000));
    assert_eq!(view.exchange_rate_at_clearing, Some(dec!(1500)));
}

#[tokio::test]
async fn test_create_financials_writes_create_audit() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let actor = UserId::new();
    let repo = FinancialsRepository::new(db.clone());

    let view = repo
        .create(vehicle.id, cost(dec!(1500000), Some(dec!(1500))), Some(actor))
        .await
        .unwrap();

    let entries = audit_entries(
        &db,
        AuditLogFilter {
            table: Some(AuditTable::Financials),
            ..AuditLogFilter::default()
        },
    )
    .await;

    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.action, AuditAction::Create.as_str());
    assert_eq!(entry.record_id, Some(view.id.into_inner()));
    assert_eq!(entry.user_id, Some(actor));
    assert_eq!(entry.old_value, None);
    assert_eq!(
        entry.new_value.as_deref(),
        Some(r#"{"exchange_rate_at_clearing":"1500","total_cost":"1500000"}"#)
    );
}

#[tokio::test]
async fn test_duplicate_create_leaves_existing_record() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let repo = FinancialsRepository::new(db.clone());

    repo.create(vehicle.id, cost(dec!(1500000), Some(dec!(1500))), None)
        .await
        .unwrap();
    let err = repo
        .create(vehicle.id, cost(dec!(2000000), None), None)
        .await
        .unwrap_err();

    assert_eq!(err.as_ledger(), Some(&LedgerError::AlreadyExists(vehicle.id)));

    let summary = repo.get_summary(vehicle.id).await.unwrap();
    assert_eq!(summary.total_cost, dec!(1500000));
    assert_eq!(summary.exchange_rate_at_clearing, Some(dec!(1500)));

    let creates = audit_entries(
        &db,
        AuditLogFilter {
            table: Some(AuditTable::Financials),
            action: Some(AuditAction::Create),
            ..AuditLogFilter::default()
        },
    )
    .await;
    assert_eq!(creates.len(), 1);
}

#[tokio::test]
async fn test_create_for_missing_vehicle_fails() {
    let db = common::setup().await;
    let repo = FinancialsRepository::new(db.clone());
    let vehicle_id = VehicleId::new();

    let err = repo
        .create(vehicle_id, cost(dec!(100), None), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RepositoryError::Ledger(LedgerError::VehicleNotFound(id)) if id == vehicle_id
    ));
}

// ============================================================================
// Updates
// ============================================================================

#[tokio::test]
async fn test_partial_update_changes_only_supplied_fields() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let repo = FinancialsRepository::new(db.clone());
    let created = repo
        .create(vehicle.id, cost(dec!(1500000), Some(dec!(1500))), None)
        .await
        .unwrap();

    let updated = repo
        .update(
            vehicle.id,
            UpdateFinancialsInput {
                total_cost: Some(dec!(1800000)),
                exchange_rate_at_clearing: None,
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.total_cost, dec!(1800000));
    assert_eq!(updated.exchange_rate_at_clearing, Some(dec!(1500)));
    assert_eq!(updated.balance, dec!(1800000));

    let stored = repo.get_summary(vehicle.id).await.unwrap();
    assert_eq!(stored.total_cost, dec!(1800000));
    assert_eq!(stored.exchange_rate_at_clearing, Some(dec!(1500)));

    let updates = audit_entries(
        &db,
        AuditLogFilter {
            action: Some(AuditAction::Update),
            ..AuditLogFilter::default()
        },
    )
    .await;
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].old_value.as_deref(), Some(r#"{"total_cost":"1500000"}"#));
    assert_eq!(updates[0].new_value.as_deref(), Some(r#"{"total_cost":"1800000"}"#));
}

#[tokio::test]
async fn test_update_can_clear_exchange_rate() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Honda", "Accord", 2015, None).await;
    let repo = FinancialsRepository::new(db.clone());
    repo.create(vehicle.id, cost(dec!(900000), Some(dec!(1400))), None)
        .await
        .unwrap();

    let updated = repo
        .update(
            vehicle.id,
            UpdateFinancialsInput {
                total_cost: None,
                exchange_rate_at_clearing: Some(None),
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(updated.exchange_rate_at_clearing, None);
    let stored = repo.get_summary(vehicle.id).await.unwrap();
    assert_eq!(stored.exchange_rate_at_clearing, None);
    assert_eq!(stored.total_cost, dec!(900000));
}

#[tokio::test]
async fn test_update_without_changes_writes_no_audit() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Honda", "Accord", 2015, None).await;
    let repo = FinancialsRepository::new(db.clone());
    repo.create(vehicle.id, cost(dec!(900000), None), None)
        .await
        .unwrap();

    repo.update(vehicle.id, UpdateFinancialsInput::default(), None)
        .await
        .unwrap();
    repo.update(
        vehicle.id,
        UpdateFinancialsInput {
            total_cost: Some(dec!(900000)),
            exchange_rate_at_clearing: None,
        },
        None,
    )
    .await
    .unwrap();

    let updates = audit_entries(
        &db,
        AuditLogFilter {
            action: Some(AuditAction::Update),
            ..AuditLogFilter::default()
        },
    )
    .await;
    assert!(updates.is_empty());
}

#[tokio::test]
async fn test_update_missing_record_fails() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Honda", "Accord", 2015, None).await;
    let repo = FinancialsRepository::new(db.clone());

    let err = repo
        .update(vehicle.id, UpdateFinancialsInput::default(), None)
        .await
        .unwrap_err();

    assert_eq!(err.as_ledger(), Some(&LedgerError::FinancialsNotFound(vehicle.id)));
}

#[tokio::test]
async fn test_update_returns_stored_row() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Honda", "Accord", 2015, None).await;
    let repo = FinancialsRepository::new(db.clone());
    repo.create(vehicle.id, cost(dec!(900000), Some(dec!(1400))), None)
        .await
        .unwrap();

    let updated = repo
        .update(
            vehicle.id,
            UpdateFinancialsInput {
                total_cost: Some(dec!(950000.12505)),
                exchange_rate_at_clearing: Some(Some(dec!(1450.2500004))),
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(updated.total_cost, dec!(950000.125));
    assert_eq!(updated.exchange_rate_at_clearing, Some(dec!(1450.25)));

    let stored = repo.get_summary(vehicle.id).await.unwrap();
    assert_eq!(updated.total_cost, stored.total_cost);
    assert_eq!(updated.exchange_rate_at_clearing, stored.exchange_rate_at_clearing);
    assert_eq!(updated.balance, stored.balance);
    assert_eq!(updated.updated_at, stored.updated_at);

    let updates = audit_entries(
        &db,
        AuditLogFilter {
            action: Some(AuditAction::Update),
            ..AuditLogFilter::default()
        },
    )
    .await;
    assert_eq!(updates.len(), 1);
    let new = updates[0].new_value.as_deref().unwrap();
    assert_eq!(decimal_field(new, "total_cost"), stored.total_cost);
}

#[tokio::test]
async fn test_update_below_stored_precision_changes_nothing() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Honda", "Accord", 2015, None).await;
    let repo = FinancialsRepository::new(db.clone());
    repo.create(vehicle.id, cost(dec!(900000), None), None)
        .await
        .unwrap();

    repo.update(
        vehicle.id,
        UpdateFinancialsInput {
            total_cost: Some(dec!(900000.00004)),
            exchange_rate_at_clearing: None,
        },
        None,
    )
    .await
    .unwrap();

    let updates = audit_entries(
        &db,
        AuditLogFilter {
            action: Some(AuditAction::Update),
            ..AuditLogFilter::default()
        },
    )
    .await;
    assert!(updates.is_empty());
}

#[tokio::test]
async fn test_create_audit_matches_stored_values() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let repo = FinancialsRepository::new(db.clone());

    let view = repo
        .create(vehicle.id, cost(dec!(1500000.00004), Some(dec!(1500))), None)
        .await
        .unwrap();
    assert_eq!(view.total_cost, dec!(1500000));

    let entries = audit_entries(
        &db,
        AuditLogFilter {
            table: Some(AuditTable::Financials),
            ..AuditLogFilter::default()
        },
    )
    .await;
    let new = entries[0].new_value.as_deref().unwrap();
    assert_eq!(decimal_field(new, "total_cost"), view.total_cost);
}

// ============================================================================
// Payments
// ============================================================================

#[tokio::test]
async fn test_payment_updates_balance_and_audit() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let actor = UserId::new();
    let repo = FinancialsRepository::new(db.clone());
    repo.create(vehicle.id, cost(dec!(1500000), Some(dec!(1500))), None)
        .await
        .unwrap();

    let payment = repo
        .record_payment(vehicle.id, RecordPaymentInput::amount(dec!(500000)), Some(actor))
        .await
        .unwrap();

    assert_eq!(payment.amount, dec!(500000));
    assert_eq!(payment.recorded_by_id, Some(actor));

    let summary = repo.get_summary(vehicle.id).await.unwrap();
    assert_eq!(summary.amount_paid, dec!(500000));
    assert_eq!(summary.balance, dec!(1000000));

    let entries = audit_entries(
        &db,
        AuditLogFilter {
            action: Some(AuditAction::Payment),
            ..AuditLogFilter::default()
        },
    )
    .await;
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.table_name, "payments");
    assert_eq!(entry.record_id, Some(payment.id.into_inner()));
    assert_eq!(entry.user_id, Some(actor));

    let old = entry.old_value.as_deref().unwrap();
    let new = entry.new_value.as_deref().unwrap();
    assert_eq!(decimal_field(old, "amount_paid"), Decimal::ZERO);
    assert_eq!(decimal_field(new, "amount"), dec!(500000));
    assert_eq!(decimal_field(new, "amount_paid"), dec!(500000));
}

#[tokio::test]
async fn test_refund_reduces_amount_paid() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let repo = FinancialsRepository::new(db.clone());
    repo.create(vehicle.id, cost(dec!(1000000), None), None)
        .await
        .unwrap();

    repo.record_payment(vehicle.id, RecordPaymentInput::amount(dec!(600000)), None)
        .await
        .unwrap();
    repo.record_payment(vehicle.id, RecordPaymentInput::amount(dec!(-100000)), None)
        .await
        .unwrap();

    let summary = repo.get_summary(vehicle.id).await.unwrap();
    assert_eq!(summary.amount_paid, dec!(500000));
    assert_eq!(summary.balance, dec!(500000));
}

#[tokio::test]
async fn test_overpayment_gives_negative_balance() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let repo = FinancialsRepository::new(db.clone());
    repo.create(vehicle.id, cost(dec!(100000), None), None)
        .await
        .unwrap();

    repo.record_payment(vehicle.id, RecordPaymentInput::amount(dec!(150000)), None)
        .await
        .unwrap();

    let summary = repo.get_summary(vehicle.id).await.unwrap();
    assert_eq!(summary.balance, dec!(-50000));
}

#[tokio::test]
async fn test_zero_payment_is_rejected_without_side_effects() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let repo = FinancialsRepository::new(db.clone());
    repo.create(vehicle.id, cost(dec!(100000), None), None)
        .await
        .unwrap();

    let err = repo
        .record_payment(vehicle.id, RecordPaymentInput::amount(Decimal::ZERO), None)
        .await
        .unwrap_err();
    assert_eq!(err.as_ledger(), Some(&LedgerError::InvalidAmount));

    let payments = repo
        .list_payments(vehicle.id, SliceRequest::default())
        .await
        .unwrap();
    assert!(payments.is_empty());

    let summary = repo.get_summary(vehicle.id).await.unwrap();
    assert_eq!(summary.amount_paid, Decimal::ZERO);

    let entries = audit_entries(
        &db,
        AuditLogFilter {
            action: Some(AuditAction::Payment),
            ..AuditLogFilter::default()
        },
    )
    .await;
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_payment_without_financials_fails() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let repo = FinancialsRepository::new(db.clone());

    let err = repo
        .record_payment(vehicle.id, RecordPaymentInput::amount(dec!(1000)), None)
        .await
        .unwrap_err();
    assert_eq!(err.as_ledger(), Some(&LedgerError::FinancialsNotFound(vehicle.id)));

    let err = repo
        .list_payments(vehicle.id, SliceRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.as_ledger(), Some(&LedgerError::FinancialsNotFound(vehicle.id)));
}

#[tokio::test]
async fn test_failed_audit_write_rolls_back_payment() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let repo = FinancialsRepository::new(db.clone());
    repo.create(vehicle.id, cost(dec!(100000), None), None)
        .await
        .unwrap();

    // The payment row and the increment succeed; the audit insert that
    // follows them in the same transaction does not.
    db.execute_unprepared(
        "CREATE TRIGGER reject_payment_audit BEFORE INSERT ON audit_logs \
         WHEN NEW.action = 'PAYMENT' \
         BEGIN SELECT RAISE(ABORT, 'audit store unavailable'); END;",
    )
    .await
    .expect("Failed to install trigger");

    let err = repo
        .record_payment(vehicle.id, RecordPaymentInput::amount(dec!(40000)), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Database(_)));

    let payments = repo
        .list_payments(vehicle.id, SliceRequest::default())
        .await
        .unwrap();
    assert!(payments.is_empty());

    let summary = repo.get_summary(vehicle.id).await.unwrap();
    assert_eq!(summary.amount_paid, Decimal::ZERO);
    assert_eq!(summary.balance, dec!(100000));
}

#[tokio::test]
async fn test_payment_below_stored_precision_is_rejected() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let repo = FinancialsRepository::new(db.clone());
    repo.create(vehicle.id, cost(dec!(100000), None), None)
        .await
        .unwrap();

    let err = repo
        .record_payment(vehicle.id, RecordPaymentInput::amount(dec!(0.00004)), None)
        .await
        .unwrap_err();
    assert_eq!(err.as_ledger(), Some(&LedgerError::InvalidAmount));

    let summary = repo.get_summary(vehicle.id).await.unwrap();
    assert_eq!(summary.amount_paid, Decimal::ZERO);
}

#[tokio::test]
async fn test_list_payments_newest_first_and_sliced() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let repo = FinancialsRepository::new(db.clone());
    repo.create(vehicle.id, cost(dec!(1000000), None), None)
        .await
        .unwrap();

    let mut recorded = Vec::new();
    for amount in [dec!(100), dec!(200), dec!(300)] {
        let payment = repo
            .record_payment(vehicle.id, RecordPaymentInput::amount(amount), None)
            .await
            .unwrap();
        recorded.push(payment.id);
    }

    let all = repo
        .list_payments(vehicle.id, SliceRequest::default())
        .await
        .unwrap();
    let ids: Vec<_> = all.iter().map(|p| p.id).collect();
    recorded.reverse();
    assert_eq!(ids, recorded);

    let page = repo
        .list_payments(vehicle.id, SliceRequest::new(1, 1))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].amount, dec!(200));
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_summary_distinguishes_missing_vehicle_and_record() {
    let db = common::setup().await;
    let vehicle = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let repo = FinancialsRepository::new(db.clone());

    let missing_vehicle = VehicleId::new();
    let err = repo.get_summary(missing_vehicle).await.unwrap_err();
    assert_eq!(err.as_ledger(), Some(&LedgerError::VehicleNotFound(missing_vehicle)));

    let err = repo.get_summary(vehicle.id).await.unwrap_err();
    assert_eq!(err.as_ledger(), Some(&LedgerError::FinancialsNotFound(vehicle.id)));
}

#[tokio::test]
async fn test_list_financials_filters_by_vehicle() {
    let db = common::setup().await;
    let first = common::create_vehicle(&db, "Toyota", "Camry", 2018, None).await;
    let second = common::create_vehicle(&db, "Honda", "Civic", 2016, None).await;
    let repo = FinancialsRepository::new(db.clone());
    repo.create(first.id, cost(dec!(100), None), None).await.unwrap();
    repo.create(second.id, cost(dec!(200), None), None).await.unwrap();

    let all = repo.list(None, SliceRequest::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let only_second = repo
        .list(Some(second.id), SliceRequest::default())
        .await
        .unwrap();
    assert_eq!(only_second.len(), 1);
    assert_eq!(only_second[0].total_cost, dec!(200));
}
