//! Configuration management

mod loader;

pub use loader::load_config;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub remote: RemoteStoreConfig,
    pub identity: IdentityProviderConfig,
    pub sync: SyncConfig,
}

/// Local cache database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "slipway.db".to_string(), pool_size: 8 }
    }
}

/// Remote document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteStoreConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for RemoteStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://store.slipway.local/v1".to_string(),
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

impl RemoteStoreConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }
}

/// Identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityProviderConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for IdentityProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://identity.slipway.local/v1".to_string(),
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

impl IdentityProviderConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }
}

/// Pending-sync sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Per-entry attempt budget before dead-lettering.
    pub max_attempts: u32,
    /// Base backoff delay between sweep rounds, in milliseconds.
    pub base_delay_ms: u64,
    /// Backoff cap, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { max_attempts: 5, base_delay_ms: 500, max_delay_ms: 60_000 }
    }
}

impl SyncConfig {
    /// Build the retry strategy the sweep runs under.
    pub fn retry_strategy(&self) -> slipway_common::RetryStrategy {
        slipway_common::RetryStrategy::new()
            .with_max_attempts(self.max_attempts)
            .with_base_delay(Duration::from_millis(self.base_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
    }
}
