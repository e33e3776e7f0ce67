use super::types::DaemonConfig;
use super::ConfigError;
use crate::utils::get_phonebook_home;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve the default config file path (`~/.phonebook/config.toml`).
#[must_use]
pub fn default_config_path() -> PathBuf {
    get_phonebook_home().join("config.toml")
}

/// Load the daemon configuration.
///
/// With an explicit `path` the file must exist. Without one, the default
/// path is tried and a missing file yields `DaemonConfig::default()`.
pub fn load_config(path: Option<&Path>) -> Result<DaemonConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_config(&std::fs::read_to_string(path)?)?,
        None => {
            let path = default_config_path();
            if !path.exists() {
                debug!("Config not found at {}; using defaults", path.display());
                return Ok(DaemonConfig::default());
            }
            let config = parse_config(&std::fs::read_to_string(&path)?)?;
            debug!("Loaded config from {}", path.display());
            config
        }
    };
    Ok(config)
}

/// Parse and validate a TOML config document.
pub fn parse_config(content: &str) -> Result<DaemonConfig, ConfigError> {
    let config: DaemonConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Check values serde cannot: address syntax and non-zero limits.
pub fn validate_config(config: &DaemonConfig) -> Result<(), ConfigError> {
    if config.server.addr.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::Invalid(format!(
            "server.addr '{}' is not a socket address",
            config.server.addr
        )));
    }
    if config.server.max_body_bytes == 0 {
        return Err(ConfigError::Invalid(
            "server.max_body_bytes must be greater than 0".to_string(),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "server.request_timeout_secs must be greater than 0".to_string(),
        ));
    }
    Ok(())
}
