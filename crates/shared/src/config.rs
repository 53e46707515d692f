//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Historical estimator configuration.
    #[serde(default)]
    pub estimator: EstimatorConfig,
    /// Fixed charges used by the running-cost calculator.
    #[serde(default)]
    pub running_cost: RunningCostConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Estimator configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimatorConfig {
    /// Customs exchange rate in effect today. Absent means historical costs
    /// are averaged without normalization.
    #[serde(default)]
    pub current_exchange_rate: Option<Decimal>,
}

impl EstimatorConfig {
    /// Returns the configured rate if it can be used for normalization.
    ///
    /// A zero or negative rate is treated the same as a missing one.
    #[must_use]
    pub fn current_rate(&self) -> Option<Decimal> {
        self.current_exchange_rate
            .filter(|rate| *rate > Decimal::ZERO)
    }
}

/// Fixed charges and terminal surcharge for the running-cost calculator.
#[derive(Debug, Clone, Deserialize)]
pub struct RunningCostConfig {
    /// CPC charge.
    #[serde(default = "default_cpc")]
    pub cpc: Decimal,
    /// Valuation charge.
    #[serde(default = "default_valuation")]
    pub valuation: Decimal,
    /// Form 846 approval charge.
    #[serde(default = "default_approval_846")]
    pub approval_846: Decimal,
    /// COMET charge.
    #[serde(default = "default_comet")]
    pub comet: Decimal,
    /// Terminal that attracts the surcharge (matched case-insensitively).
    #[serde(default = "default_surcharge_terminal")]
    pub surcharge_terminal: String,
    /// Surcharge added for `surcharge_terminal`.
    #[serde(default = "default_terminal_surcharge")]
    pub terminal_surcharge: Decimal,
}

fn default_cpc() -> Decimal {
    Decimal::from(50_000)
}

fn default_valuation() -> Decimal {
    Decimal::from(100_000)
}

fn default_approval_846() -> Decimal {
    Decimal::from(60_000)
}

fn default_comet() -> Decimal {
    Decimal::from(65_000)
}

fn default_surcharge_terminal() -> String {
    "PTML".to_string()
}

fn default_terminal_surcharge() -> Decimal {
    Decimal::from(200_000)
}

impl Default for RunningCostConfig {
    fn default() -> Self {
        Self {
            cpc: default_cpc(),
            valuation: default_valuation(),
            approval_846: default_approval_846(),
            comet: default_comet(),
            surcharge_terminal: default_surcharge_terminal(),
            terminal_surcharge: default_terminal_surcharge(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CLEARLANE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
