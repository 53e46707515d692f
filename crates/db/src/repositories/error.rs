//! Error type shared by the ledger repositories.

use clearlane_core::ledger::LedgerError;
use clearlane_shared::AppError;
use sea_orm::DbErr;

/// Error types for vehicle and financial record operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A ledger rule rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Returns the ledger error, if this is one.
    #[must_use]
    pub const fn as_ledger(&self) -> Option<&LedgerError> {
        match self {
            Self::Ledger(err) => Some(err),
            Self::Database(_) => None,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Ledger(err) => err.into(),
            RepositoryError::Database(err) => Self::Database(err.to_string()),
        }
    }
}
