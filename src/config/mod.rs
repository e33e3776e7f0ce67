//! Daemon configuration loaded from an optional TOML file and overridden by
//! command-line flags.
mod io;
mod types;

pub use io::{default_config_path, load_config, parse_config, validate_config};
pub use types::{
    ConfigOverrides, DaemonConfig, DirectorySettings, ServerSettings, DEFAULT_ADDR,
    DEFAULT_MAX_BODY_BYTES, DEFAULT_REQUEST_TIMEOUT_SECS,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
