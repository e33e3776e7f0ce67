use color_eyre::eyre::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use super::{default_directive, LogConfig, LOG_FILENAME};

/// Initialize the logging system with the given configuration.
///
/// Output goes to stdout and to a rotating file under `log_dir`, either
/// human-readable or JSON. `RUST_LOG` overrides the configured level.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init_logging(config: LogConfig) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)?;

    let file_appender = RollingFileAppender::new(config.rotation, &config.log_dir, LOG_FILENAME);

    // Each layer owns its filter
    let level = config.log_level;
    let env_filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(level)))
    };

    if config.json_format {
        let json_file_layer = fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_filter(env_filter());

        let json_stdout_layer = fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_filter(env_filter());

        tracing_subscriber::registry()
            .with(json_file_layer)
            .with(json_stdout_layer)
            .with(ErrorLayer::default())
            .try_init()?;
    } else {
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_ansi(false)
            .with_filter(env_filter());

        let stdout_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_filter(env_filter());

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stdout_layer)
            .with(ErrorLayer::default())
            .try_init()?;
    }

    Ok(())
}

/// Parse rotation period from string. Unknown values fall back to daily.
pub fn parse_rotation(s: &str) -> Rotation {
    match s.to_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}
