// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use phonebook_daemon::config::{
    load_config, validate_config, ConfigOverrides, DaemonConfig, DirectorySettings,
};
use phonebook_daemon::contact::{sample_contacts, ContactInput, DuplicatePolicy};
use phonebook_daemon::directory::ContactDirectory;
use phonebook_daemon::logging::{init_logging, parse_rotation, LogConfig, LOG_FILENAME};
use phonebook_daemon::server::{self, SharedDirectory};
use phonebook_daemon::storage::{open_store, BackendKind, ContactStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Phonebook daemon - contact directory over HTTP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: ~/.phonebook/config.toml, optional)
    #[arg(short, long, env = "PHONEBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind the server to
    #[arg(short, long, env = "PHONEBOOK_ADDR")]
    addr: Option<String>,

    /// Storage backend: memory, file, or document
    #[arg(long, env = "PHONEBOOK_BACKEND")]
    backend: Option<BackendKind>,

    /// JSON document (file backend) or collection directory (document backend)
    #[arg(long, env = "PHONEBOOK_DATA_PATH")]
    data_path: Option<PathBuf>,

    /// What a create with an existing name does: reject or merge
    #[arg(long, env = "PHONEBOOK_DUPLICATE_POLICY")]
    duplicate_policy: Option<DuplicatePolicy>,

    /// Comma-separated list of allowed CORS origins.
    /// Use "*" to allow all origins.
    #[arg(long, env = "PHONEBOOK_CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Option<Vec<String>>,

    /// Serve a built front-end from this directory
    #[arg(long, env = "PHONEBOOK_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Start the memory backend with the sample phonebook
    #[arg(long)]
    seed_sample: bool,

    /// Enable JSON log format (for production/log aggregation)
    #[arg(long, env = "PHONEBOOK_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "PHONEBOOK_LOG_ROTATION", default_value = "daily")]
    log_rotation: String,

    /// Custom log directory (default: ~/.phonebook/logs)
    #[arg(long, env = "PHONEBOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Add a contact to the configured backend
    Add { name: String, number: String },
    /// Print every contact in the configured backend
    List,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            addr: self.addr.clone(),
            backend: self.backend,
            data_path: self.data_path.clone(),
            duplicate_policy: self.duplicate_policy,
            cors_origins: self.cors_origins.clone(),
            static_dir: self.static_dir.clone(),
            seed_sample: self.seed_sample.then_some(true),
        }
    }
}

fn report_server_error(addr: &str, log_file: &Path, e: &std::io::Error) {
    if e.kind() == std::io::ErrorKind::AddrInUse {
        eprintln!();
        eprintln!("Error: Failed to start server - address {addr} is already in use");
        eprintln!();
        eprintln!("Another instance of phonebook-daemon may already be running.");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  1. Kill the existing process:   pkill phonebook-daemon");
        eprintln!("  2. Use a different port:        phonebook-daemon --addr 127.0.0.1:3002");
        eprintln!();
    }
    eprintln!();
    eprintln!("Error: Failed to start server: {e}");
    eprintln!();
    eprintln!("Logs: {}", log_file.display());
    eprintln!();
}

async fn open_directory(settings: &DirectorySettings) -> Result<SharedDirectory> {
    let seed = if settings.seed_sample {
        if settings.backend != BackendKind::Memory {
            warn!("seed_sample only applies to the memory backend; ignoring");
        }
        sample_contacts()
    } else {
        Vec::new()
    };

    let data_path = settings.resolved_data_path();
    let store: Arc<dyn ContactStore> = open_store(settings.backend, &data_path, seed).await?;
    info!(
        "Opened {} backend ({} ids, {} duplicates)",
        settings.backend,
        store.id_strategy(),
        settings.duplicate_policy
    );

    Ok(Arc::new(ContactDirectory::new(
        store,
        settings.duplicate_policy,
    )))
}

#[expect(clippy::print_stdout, reason = "CLI output")]
async fn add_contact(directory: &ContactDirectory, name: String, number: String) -> Result<()> {
    let outcome = directory.create(ContactInput { name, number }).await?;
    let contact = outcome.contact();
    if outcome.is_merged() {
        println!("updated {} number {} in phonebook", contact.name, contact.number);
    } else {
        println!("added {} number {} to phonebook", contact.name, contact.number);
    }
    Ok(())
}

#[expect(clippy::print_stdout, reason = "CLI output")]
async fn list_contacts(directory: &ContactDirectory) -> Result<()> {
    println!("phonebook:");
    for contact in directory.list().await? {
        println!("{} {}", contact.name, contact.number);
    }
    Ok(())
}

fn resolve_config(args: &Args) -> Result<DaemonConfig> {
    let mut config = load_config(args.config.as_deref())?;
    config.apply(args.overrides());
    validate_config(&config)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    // Parse CLI arguments first (before logging, so we can use log config)
    let args = Args::parse();

    let log_config = LogConfig {
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
        ..Default::default()
    };
    let log_config = match &args.log_dir {
        Some(dir) => LogConfig {
            log_dir: dir.clone(),
            ..log_config
        },
        None => log_config,
    };
    let log_file = log_config.log_dir.join(LOG_FILENAME);

    if let Err(e) = init_logging(log_config) {
        eprintln!();
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!();
        eprintln!("Logs: {}", log_file.display());
        eprintln!();
        return Err(e);
    }

    let config = resolve_config(&args)?;
    let directory = open_directory(&config.directory).await?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            if let Err(e) = server::serve(directory, &config.server).await {
                report_server_error(&config.server.addr, &log_file, &e);
                return Err(e.into());
            }
        }
        Command::Add { name, number } => add_contact(&directory, name, number).await?,
        Command::List => list_contacts(&directory).await?,
    }

    Ok(())
}
