use crate::contact::DuplicatePolicy;
use crate::storage::BackendKind;
use crate::utils::get_phonebook_home;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3001";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// `[directory]` table: which backend holds the contacts and how duplicates
/// are handled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DirectorySettings {
    pub backend: BackendKind,
    pub duplicate_policy: DuplicatePolicy,
    /// JSON document for the file backend, collection directory for the
    /// document backend. Defaults under `~/.phonebook`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
    /// Start the memory backend with the sample phonebook.
    pub seed_sample: bool,
}

impl DirectorySettings {
    /// Data path for the configured backend, falling back to its default.
    #[must_use]
    pub fn resolved_data_path(&self) -> PathBuf {
        if let Some(path) = &self.data_path {
            return path.clone();
        }
        match self.backend {
            BackendKind::Memory => PathBuf::new(),
            BackendKind::File => get_phonebook_home().join("db.json"),
            BackendKind::Document => get_phonebook_home().join("persons"),
        }
    }
}

/// `[server]` table: HTTP boundary settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub addr: String,
    pub cors_origins: Vec<String>,
    /// Built front-end served for paths outside the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
    pub max_body_bytes: usize,
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            cors_origins: vec!["*".to_string()],
            static_dir: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Top-level daemon configuration, deserialized from
/// `~/.phonebook/config.toml`.
///
/// Every field is optional at the TOML level.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonConfig {
    pub directory: DirectorySettings,
    pub server: ServerSettings,
}

/// Values given on the command line, applied over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub addr: Option<String>,
    pub backend: Option<BackendKind>,
    pub data_path: Option<PathBuf>,
    pub duplicate_policy: Option<DuplicatePolicy>,
    pub cors_origins: Option<Vec<String>>,
    pub static_dir: Option<PathBuf>,
    pub seed_sample: Option<bool>,
}

impl DaemonConfig {
    /// Apply command-line overrides in place.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(addr) = overrides.addr {
            self.server.addr = addr;
        }
        if let Some(backend) = overrides.backend {
            self.directory.backend = backend;
        }
        if let Some(data_path) = overrides.data_path {
            self.directory.data_path = Some(data_path);
        }
        if let Some(policy) = overrides.duplicate_policy {
            self.directory.duplicate_policy = policy;
        }
        if let Some(origins) = overrides.cors_origins {
            self.server.cors_origins = origins
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(static_dir) = overrides.static_dir {
            self.server.static_dir = Some(static_dir);
        }
        if let Some(seed_sample) = overrides.seed_sample {
            self.directory.seed_sample = seed_sample;
        }
    }
}
