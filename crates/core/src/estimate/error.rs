//! Estimation error types.

use clearlane_shared::AppError;
use thiserror::Error;

/// Estimation-related errors.
///
/// Finding no historical data is not an error; the estimator returns `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    /// An itemized cost input is not strictly positive.
    #[error("{field} must be greater than zero")]
    NonPositiveCost {
        /// Name of the offending input.
        field: &'static str,
    },
}

impl EstimateError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveCost { .. } => "VALIDATION_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveCost { .. } => 400,
        }
    }
}

impl From<EstimateError> for AppError {
    fn from(err: EstimateError) -> Self {
        Self::Validation(err.to_string())
    }
}
