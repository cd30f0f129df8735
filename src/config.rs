//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

use crate::cache::DEFAULT_CAPACITY;
use crate::retry::{DEFAULT_DELAY_MS, DEFAULT_MAX_ATTEMPTS};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries a cache created from this config can hold
    pub cache_capacity: usize,
    /// Maximum number of attempts for the retry helper
    pub retry_max_attempts: u32,
    /// Delay between retry attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `RETRY_MAX_ATTEMPTS` - Maximum retry attempts (default: 3)
    /// - `RETRY_DELAY_MS` - Delay between retries in milliseconds (default: 250)
    pub fn from_env() -> Self {
        Self {
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            retry_max_attempts: env::var("RETRY_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            retry_delay_ms: env::var("RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DELAY_MS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CAPACITY,
            retry_max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.retry_max_attempts, 3);
        assert_eq!(config.retry_delay_ms, 250);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("RETRY_MAX_ATTEMPTS");
        env::remove_var("RETRY_DELAY_MS");

        let config = Config::from_env();
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.retry_max_attempts, 3);
        assert_eq!(config.retry_delay_ms, 250);
    }
}
