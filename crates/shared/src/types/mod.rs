//! Common types used across the application.

pub mod id;
pub mod pagination;

pub use id::*;
pub use pagination::{MAX_LIMIT, SliceRequest};
