//! Application configuration, read from an optional TOML file and then from
//! `STOREFRONT__*` environment variables (later sources win).

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config/storefront.toml";
/// Prefix for configuration environment variables, e.g. `STOREFRONT__PRICING__DELIVERY_FEE`.
pub const CONFIG_ENV_PREFIX: &str = "STOREFRONT";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Channel capacity of each store actor.
    pub actor_buffer: usize,
    pub pricing: PricingConfig,
    pub reservation_policy: ReservationPolicy,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            actor_buffer: 64,
            pricing: PricingConfig::default(),
            reservation_policy: ReservationPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Flat surcharge added to ship-to-address orders.
    pub delivery_fee: Decimal,
    /// Stored as the delivery address of pickup orders.
    pub pickup_address: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            delivery_fee: Decimal::from(7),
            pickup_address: "In-store pickup".to_string(),
        }
    }
}

/// What happens to stock already taken for earlier cart lines when a later
/// line, or the ledger write, fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationPolicy {
    /// Earlier lines stay decremented; the stock is stranded until a catalog edit.
    #[default]
    KeepPartial,
    /// Earlier lines are released back to the catalog before the error is returned.
    Rollback,
}

impl StorefrontConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from `path` (optional) overlaid with environment variables.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize::<Self>()?
            .validate()
    }

    /// Reject values that deserialize but cannot be used.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.actor_buffer == 0 {
            return Err(ConfigError::Message("actor_buffer must be at least 1".into()));
        }
        if self.pricing.delivery_fee.is_sign_negative() {
            return Err(ConfigError::Message(format!(
                "pricing.delivery_fee must not be negative, got {}",
                self.pricing.delivery_fee
            )));
        }
        Ok(self)
    }
}
