//! Configuration loading: optional TOML file plus environment overrides.

use std::path::Path;

use tracing::{debug, info};

use super::Config;
use crate::errors::InfraError;

/// Load configuration from an optional TOML file, then apply environment
/// overrides. A missing file is not an error; defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<Config, InfraError> {
    let mut config = match path {
        Some(path) if path.exists() => {
            let raw = std::fs::read_to_string(path)
                .map_err(|err| InfraError::Config(format!("read {}: {err}", path.display())))?;
            let config = toml::from_str(&raw)
                .map_err(|err| InfraError::Config(format!("parse {}: {err}", path.display())))?;
            info!(path = %path.display(), "configuration loaded from file");
            config
        }
        Some(path) => {
            debug!(path = %path.display(), "config file not found, using defaults");
            Config::default()
        }
        None => Config::default(),
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(value) = std::env::var("SLIPWAY_DATABASE_PATH") {
        config.database.path = value;
    }
    if let Ok(value) = std::env::var("SLIPWAY_REMOTE_BASE_URL") {
        config.remote.base_url = value;
    }
    if let Ok(value) = std::env::var("SLIPWAY_REMOTE_API_KEY") {
        config.remote.api_key = Some(value);
    }
    if let Ok(value) = std::env::var("SLIPWAY_IDENTITY_BASE_URL") {
        config.identity.base_url = value;
    }
    if let Ok(value) = std::env::var("SLIPWAY_IDENTITY_API_KEY") {
        config.identity.api_key = Some(value);
    }
    if let Ok(value) = std::env::var("SLIPWAY_SYNC_MAX_ATTEMPTS") {
        if let Ok(parsed) = value.parse() {
            config.sync.max_attempts = parsed;
        }
    }
}
