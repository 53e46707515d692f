//! Offset pagination for list operations.
//!
//! Lists are finite, restartable slices (`skip` + `limit`), never live streams.
//! A `limit` above [`MAX_LIMIT`] is clamped to it rather than rejected.

use serde::{Deserialize, Serialize};

/// Upper bound applied to any requested `limit`.
pub const MAX_LIMIT: u64 = 1000;

/// Request parameters for an offset-based slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceRequest {
    /// Number of rows to skip.
    #[serde(default)]
    pub skip: u64,
    /// Maximum number of rows to return.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

impl Default for SliceRequest {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl SliceRequest {
    /// Creates a slice request.
    #[must_use]
    pub const fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    /// Offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.skip
    }

    /// Limit for database queries, capped at [`MAX_LIMIT`].
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit.min(MAX_LIMIT)
    }
}
