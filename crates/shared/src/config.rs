//! Application configuration management.

use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger behaviour.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Demo data seeding.
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Currency entries are kept in unless stated otherwise.
    #[serde(default)]
    pub currency: Currency,
    /// Default page size for list operations.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    50
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            page_size: default_page_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "ohada=debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// Demo company seeded by the seeder binary.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Display name of the seeded company.
    #[serde(default = "default_company_name")]
    pub company_name: String,
    /// Calendar year of the seeded fiscal year.
    #[serde(default = "default_fiscal_year")]
    pub fiscal_year: i32,
}

fn default_company_name() -> String {
    "Demo SARL".to_string()
}

fn default_fiscal_year() -> i32 {
    2024
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            fiscal_year: default_fiscal_year(),
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
            .add_source(config::Environment::with_prefix("OHADA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
