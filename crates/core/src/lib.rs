//! Core business logic for Clearlane.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Per-vehicle financials, payments, and balance rules
//! - `estimate` - Historical clearing cost estimation and the running-cost calculator
//! - `currency` - Exchange rate normalization and rounding
//! - `audit` - Audit actions and value encoding
//! - `vehicle` - Vehicle registry types

pub mod audit;
pub mod currency;
pub mod estimate;
pub mod ledger;
pub mod vehicle;
