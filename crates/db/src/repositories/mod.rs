//! Repository layer for database operations.

pub mod audit_log;
pub mod error;
pub mod estimate;
pub mod financials;
pub mod vehicle;

pub use audit_log::{AuditLogFilter, AuditLogRepository, AuditLogView, AuditRecorder};
pub use error::RepositoryError;
pub use estimate::EstimateRepository;
pub use financials::FinancialsRepository;
pub use vehicle::VehicleRepository;
