//! Runtime configuration.
//!
//! Values come from the environment (optionally seeded from a `.env` file by
//! `dotenvy` in `main`). Everything has a default so the service starts with
//! no configuration at all.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::ConfigError;

/// Pricing rules shared by the calculator, validator and formatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingPolicy {
    /// Discount applied to the charter subtotal for bareboat charters.
    #[serde(with = "rust_decimal::serde::str")]
    pub bareboat_discount_rate: Decimal,
    /// Minimum nights once explicit start/end dates are chosen.
    pub min_nights_with_dates: i32,
    /// Minimum days for flows that only use a duration slider.
    pub min_duration_days: i32,
    /// Duration a new selection starts with.
    pub default_duration_days: i32,
    /// Lower factor of the displayed estimate band.
    #[serde(with = "rust_decimal::serde::str")]
    pub estimate_band_low: Decimal,
    /// Upper factor of the displayed estimate band.
    #[serde(with = "rust_decimal::serde::str")]
    pub estimate_band_high: Decimal,
    /// Present the quote as a range instead of a point estimate.
    pub show_estimate_band: bool,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            bareboat_discount_rate: dec!(0.25),
            min_nights_with_dates: 5,
            min_duration_days: 1,
            default_duration_days: 7,
            estimate_band_low: dec!(0.85),
            estimate_band_high: dec!(1.15),
            show_estimate_band: false,
        }
    }
}

impl PricingPolicy {
    /// Check the policy for values that would break pricing invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bareboat_discount_rate < Decimal::ZERO || self.bareboat_discount_rate >= Decimal::ONE {
            return Err(invalid(
                "BAREBOAT_DISCOUNT_RATE",
                "must be at least 0 and below 1",
            ));
        }
        if self.min_duration_days < 1 {
            return Err(invalid("MIN_DURATION_DAYS", "must be at least 1"));
        }
        if self.min_nights_with_dates < self.min_duration_days {
            return Err(invalid(
                "MIN_NIGHTS_WITH_DATES",
                "must not be below MIN_DURATION_DAYS",
            ));
        }
        if self.default_duration_days < self.min_duration_days {
            return Err(invalid(
                "DEFAULT_DURATION_DAYS",
                "must not be below MIN_DURATION_DAYS",
            ));
        }
        if self.estimate_band_low < Decimal::ZERO || self.estimate_band_low > Decimal::ONE {
            return Err(invalid("ESTIMATE_BAND_LOW", "must be between 0 and 1"));
        }
        if self.estimate_band_high < Decimal::ONE {
            return Err(invalid("ESTIMATE_BAND_HIGH", "must be at least 1"));
        }
        Ok(())
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Alternative price table (JSON). The built-in table is used when unset.
    pub price_table_path: Option<PathBuf>,
    pub policy: PricingPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            price_table_path: None,
            policy: PricingPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let policy_defaults = PricingPolicy::default();

        let policy = PricingPolicy {
            bareboat_discount_rate: parse_or(
                &lookup,
                "BAREBOAT_DISCOUNT_RATE",
                policy_defaults.bareboat_discount_rate,
            )?,
            min_nights_with_dates: parse_or(
                &lookup,
                "MIN_NIGHTS_WITH_DATES",
                policy_defaults.min_nights_with_dates,
            )?,
            min_duration_days: parse_or(
                &lookup,
                "MIN_DURATION_DAYS",
                policy_defaults.min_duration_days,
            )?,
            default_duration_days: parse_or(
                &lookup,
                "DEFAULT_DURATION_DAYS",
                policy_defaults.default_duration_days,
            )?,
            estimate_band_low: parse_or(
                &lookup,
                "ESTIMATE_BAND_LOW",
                policy_defaults.estimate_band_low,
            )?,
            estimate_band_high: parse_or(
                &lookup,
                "ESTIMATE_BAND_HIGH",
                policy_defaults.estimate_band_high,
            )?,
            show_estimate_band: parse_or(
                &lookup,
                "SHOW_ESTIMATE_BAND",
                policy_defaults.show_estimate_band,
            )?,
        };
        policy.validate()?;

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            price_table_path: lookup("PRICE_TABLE_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            policy,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse::<T>().map_err(|e| {
            invalid(key, &e.to_string())
        }),
        _ => Ok(default),
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_empty() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.price_table_path.is_none());
        assert_eq!(config.policy, PricingPolicy::default());
        assert_eq!(config.policy.bareboat_discount_rate, dec!(0.25));
        assert_eq!(config.policy.min_nights_with_dates, 5);
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "3000"),
            ("BAREBOAT_DISCOUNT_RATE", "0.3"),
            ("MIN_NIGHTS_WITH_DATES", "7"),
            ("SHOW_ESTIMATE_BAND", "true"),
            ("PRICE_TABLE_PATH", "/etc/charter/prices.json"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.policy.bareboat_discount_rate, dec!(0.3));
        assert_eq!(config.policy.min_nights_with_dates, 7);
        assert!(config.policy.show_estimate_band);
        assert_eq!(
            config.price_table_path,
            Some(PathBuf::from("/etc/charter/prices.json"))
        );
    }

    #[test]
    fn test_unparseable_value_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_discount_rate_out_of_range_is_rejected() {
        let err =
            AppConfig::from_lookup(lookup_from(&[("BAREBOAT_DISCOUNT_RATE", "1.2")])).unwrap_err();
        assert!(err.to_string().contains("BAREBOAT_DISCOUNT_RATE"));
    }

    #[test]
    fn test_min_nights_below_min_duration_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("MIN_DURATION_DAYS", "3"),
            ("MIN_NIGHTS_WITH_DATES", "2"),
            ("DEFAULT_DURATION_DAYS", "7"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("MIN_NIGHTS_WITH_DATES"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("PORT", "  "), ("PRICE_TABLE_PATH", "")]))
            .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.price_table_path.is_none());
    }
}
