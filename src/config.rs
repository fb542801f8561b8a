use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::domain::validation::ValidationLimits;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub limits: ValidationLimits,
    pub checkout_rate_limit: u32,
    pub checkout_rate_window: Duration,
}

impl Settings {
    /// Reads settings from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ValidationLimits::default();
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            limits: ValidationLimits {
                max_quantity_per_item: parse_or(
                    &lookup,
                    "MAX_DAYS_PER_ITEM",
                    defaults.max_quantity_per_item,
                )?,
                max_total_order_value: parse_or(
                    &lookup,
                    "MAX_TOTAL_ORDER_VALUE",
                    defaults.max_total_order_value,
                )?,
                max_cart_items: parse_or(&lookup, "MAX_CART_ITEMS", defaults.max_cart_items)?,
                default_days_per_item: parse_or(
                    &lookup,
                    "DEFAULT_DAYS_PER_ITEM",
                    defaults.default_days_per_item,
                )?,
            },
            checkout_rate_limit: parse_or(&lookup, "CHECKOUT_RATE_LIMIT", 10)?,
            checkout_rate_window: Duration::from_secs(parse_or(
                &lookup,
                "CHECKOUT_RATE_WINDOW_SECS",
                60,
            )?),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
