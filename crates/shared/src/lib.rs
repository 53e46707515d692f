//! Shared types, errors, and configuration for Clearlane.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Offset pagination for list operations
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, EstimatorConfig, RunningCostConfig};
pub use error::AppError;
