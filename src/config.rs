// Application configuration
// Loaded from environment variables (after `.env`) and validated before the
// server starts.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use validator::Validate;

use crate::checkout::{stripe::DEFAULT_API_BASE, CheckoutUrls, StripeConfig};
use crate::pricing::{PriceCalculator, RateTable, DEFAULT_MINIMUM_TOTAL_CENTS};

const DEFAULT_SUCCESS_URL: &str = "https://www.unfoldingcreative.com/order-success";
const DEFAULT_CANCEL_URL: &str = "https://www.unfoldingcreative.com/orderstickers";
const DEFAULT_ALLOWED_ORIGINS: &str = "https://www.unfoldingcreative.com,https://unfoldingcreative.com";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Server, pricing and checkout settings
#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    pub rate_table: RateTable,

    /// Order floor in cents, within what the processor can charge
    #[validate(range(min = 50, max = 99999999, message = "Minimum total must be between 50 and 99999999 cents"))]
    pub minimum_total_cents: i64,

    #[validate(range(min = 0, message = "Price tolerance cannot be negative"))]
    pub price_tolerance_cents: i64,

    #[validate(url(message = "Success URL must be a valid URL"))]
    pub success_url: String,

    #[validate(url(message = "Cancel URL must be a valid URL"))]
    pub cancel_url: String,

    pub allow_all_origins: bool,

    #[validate(custom = "crate::validation::validate_origins")]
    pub allowed_origins: Vec<String>,

    pub stripe_secret_key: Option<String>,

    #[validate(url(message = "Stripe API base must be a valid URL"))]
    pub stripe_api_base: String,

    #[validate(range(min = 1, max = 120, message = "Stripe timeout must be between 1 and 120 seconds"))]
    pub stripe_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            rate_table: RateTable::default(),
            minimum_total_cents: DEFAULT_MINIMUM_TOTAL_CENTS,
            price_tolerance_cents: 1,
            success_url: DEFAULT_SUCCESS_URL.to_string(),
            cancel_url: DEFAULT_CANCEL_URL.to_string(),
            allow_all_origins: false,
            allowed_origins: split_list(DEFAULT_ALLOWED_ORIGINS),
            stripe_secret_key: None,
            stripe_api_base: DEFAULT_API_BASE.to_string(),
            stripe_timeout_secs: 15,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from a key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let config = Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            rate_table: match get("RATE_TABLE") {
                Some(raw) => raw.parse().map_err(|e: crate::pricing::RateTableError| {
                    ConfigError::Invalid {
                        key: "RATE_TABLE",
                        reason: e.to_string(),
                    }
                })?,
                None => defaults.rate_table,
            },
            minimum_total_cents: parse_or("MIN_TOTAL_CENTS", get("MIN_TOTAL_CENTS"), defaults.minimum_total_cents)?,
            price_tolerance_cents: parse_or(
                "PRICE_TOLERANCE_CENTS",
                get("PRICE_TOLERANCE_CENTS"),
                defaults.price_tolerance_cents,
            )?,
            success_url: get("CHECKOUT_SUCCESS_URL").unwrap_or(defaults.success_url),
            cancel_url: get("CHECKOUT_CANCEL_URL").unwrap_or(defaults.cancel_url),
            allow_all_origins: parse_or("ALLOW_ALL_ORIGINS", get("ALLOW_ALL_ORIGINS"), defaults.allow_all_origins)?,
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or(defaults.allowed_origins),
            stripe_secret_key: get("STRIPE_SECRET_KEY"),
            stripe_api_base: get("STRIPE_API_BASE").unwrap_or(defaults.stripe_api_base),
            stripe_timeout_secs: parse_or(
                "STRIPE_TIMEOUT_SECS",
                get("STRIPE_TIMEOUT_SECS"),
                defaults.stripe_timeout_secs,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn price_calculator(&self) -> PriceCalculator {
        PriceCalculator::new(self.rate_table.clone(), self.minimum_total_cents)
    }

    pub fn checkout_urls(&self) -> CheckoutUrls {
        CheckoutUrls {
            success_url: self.success_url.clone(),
            cancel_url: self.cancel_url.clone(),
        }
    }

    /// Stripe settings, or `None` when no secret key is configured
    pub fn stripe(&self) -> Option<StripeConfig> {
        self.stripe_secret_key.as_ref().map(|secret_key| StripeConfig {
            secret_key: secret_key.clone(),
            api_base: self.stripe_api_base.clone(),
            timeout: Duration::from_secs(self.stripe_timeout_secs),
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: format!("'{}': {}", raw, e),
        }),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
