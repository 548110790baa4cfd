//! Configuration loading and representation.
//!
//! Values come from environment variables with defaults:
//!
//! | Variable | Default |
//! |---|---|
//! | `GRIDPASS_DATA_FILE` | `gridpass_data.json` |
//! | `GRIDPASS_DISCOUNT_RATE` | `0.9` |
//! | `GRIDPASS_SEED_CATALOG` | `true` |

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gridpass_booking::DiscountRate;

pub const DATA_FILE_VAR: &str = "GRIDPASS_DATA_FILE";
pub const DISCOUNT_RATE_VAR: &str = "GRIDPASS_DISCOUNT_RATE";
pub const SEED_CATALOG_VAR: &str = "GRIDPASS_SEED_CATALOG";

pub const DEFAULT_DATA_FILE: &str = "gridpass_data.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Booking service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Where the snapshot is saved and loaded.
    pub data_file: PathBuf,
    /// Group discount rate in force at startup.
    pub discount_rate: DiscountRate,
    /// Seed the Grand Prix catalog when no snapshot exists yet.
    pub seed_catalog: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            discount_rate: DiscountRate::DEFAULT,
            seed_catalog: true,
        }
    }
}

impl BookingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(DATA_FILE_VAR).filter(|v| !v.trim().is_empty()) {
            config.data_file = PathBuf::from(path.trim());
        }

        if let Some(raw) = lookup(DISCOUNT_RATE_VAR) {
            config.discount_rate = raw.parse().map_err(|e| ConfigError::Invalid {
                key: DISCOUNT_RATE_VAR,
                message: format!("{e}"),
            })?;
        }

        if let Some(raw) = lookup(SEED_CATALOG_VAR) {
            config.seed_catalog = parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                key: SEED_CATALOG_VAR,
                message: format!("expected true/false, got {raw:?}"),
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
