//! `SeaORM` entity definitions.

pub mod prelude;

pub mod audit_logs;
pub mod financials;
pub mod payments;
pub mod vehicles;
