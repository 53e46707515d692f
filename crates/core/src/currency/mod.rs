//! Exchange rate normalization and rounding.

pub mod service;

#[cfg(test)]
mod props;

pub use service::CurrencyService;
