//! Ledger error types.

use clearlane_shared::AppError;
use clearlane_shared::types::VehicleId;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Vehicle does not exist.
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(VehicleId),

    /// Vehicle has no financial record yet.
    #[error("Financials not found for vehicle {0}")]
    FinancialsNotFound(VehicleId),

    /// Vehicle already has a financial record.
    #[error("Financials already exist for vehicle {0}")]
    AlreadyExists(VehicleId),

    /// A vehicle with this VIN is already registered.
    #[error("VIN already registered: {0}")]
    DuplicateVin(String),

    /// Payment amount is zero.
    #[error("Payment amount must not be zero")]
    InvalidAmount,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::VehicleNotFound(_) => "VEHICLE_NOT_FOUND",
            Self::FinancialsNotFound(_) => "FINANCIALS_NOT_FOUND",
            Self::AlreadyExists(_) => "FINANCIALS_ALREADY_EXIST",
            Self::DuplicateVin(_) => "DUPLICATE_VIN",
            Self::InvalidAmount => "INVALID_AMOUNT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::VehicleNotFound(_) | Self::FinancialsNotFound(_) => 404,
            Self::AlreadyExists(_) | Self::DuplicateVin(_) => 409,
            Self::InvalidAmount => 400,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::VehicleNotFound(_) | LedgerError::FinancialsNotFound(_) => {
                Self::NotFound(message)
            }
            LedgerError::AlreadyExists(_) | LedgerError::DuplicateVin(_) => Self::Conflict(message),
            LedgerError::InvalidAmount => Self::Validation(message),
        }
    }
}
