//! Tracing setup: stdout plus a rolling log file.
mod init;

pub use init::{init_logging, parse_rotation};

use crate::utils::get_phonebook_home;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::rolling::Rotation;

/// Log filename used by the daemon.
pub const LOG_FILENAME: &str = "phonebook-daemon.log";

/// Configuration for the logging system.
pub struct LogConfig {
    /// Directory where log files will be written.
    pub log_dir: PathBuf,
    /// Default log level when `RUST_LOG` is not set.
    pub log_level: Level,
    /// Whether to use JSON format for logs.
    pub json_format: bool,
    /// Log rotation period.
    pub rotation: Rotation,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: get_phonebook_home().join("logs"),
            log_level: Level::INFO,
            json_format: false,
            rotation: Rotation::DAILY,
        }
    }
}

/// Default filter directive when `RUST_LOG` is not set.
fn default_directive(level: Level) -> String {
    format!("phonebook_daemon={level},tower_http={level}")
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
