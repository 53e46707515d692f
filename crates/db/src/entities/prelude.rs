//! Entity re-exports.

pub use super::audit_logs::Entity as AuditLogs;
pub use super::financials::Entity as Financials;
pub use super::payments::Entity as Payments;
pub use super::vehicles::Entity as Vehicles;
