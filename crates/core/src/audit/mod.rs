//! Audit actions and value encoding.
//!
//! Every ledger mutation leaves one audit entry behind. The core only decides
//! what the entry says; persisting it happens in the same database transaction
//! as the mutation itself.

pub mod entry;
pub mod value;

pub use entry::{AuditAction, AuditEntryDraft, AuditTable};
pub use value::AuditValue;
