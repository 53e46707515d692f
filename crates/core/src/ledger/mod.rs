//! Per-vehicle clearing ledger.
//!
//! This module implements the rules around a vehicle's financial record:
//! - One financial record per vehicle, created explicitly
//! - Partial updates driven by field presence
//! - Append-only payments accumulated into `amount_paid`
//! - Balance derived on read, never stored
//! - The audit entry each mutation must stage

pub mod balance;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use balance::balance;
pub use error::LedgerError;
pub use service::{FinancialsUpdatePlan, LedgerService};
pub use types::{
    CreateFinancialsInput, FinancialsRecord, FinancialsView, PaymentView, RecordPaymentInput,
    UpdateFinancialsInput,
};
