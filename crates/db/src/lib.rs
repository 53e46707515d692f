//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repositories that stage every ledger mutation together with its audit
//!   entry in one database transaction
//! - The historical cost source backing the estimator
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AuditLogFilter, AuditLogRepository, AuditLogView, AuditRecorder, EstimateRepository,
    FinancialsRepository, RepositoryError, VehicleRepository,
};

use std::time::Duration;

use clearlane_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection using the configured pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}
