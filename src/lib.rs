pub mod config;
pub mod contact;
pub mod directory;
pub mod logging;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::{load_config, DaemonConfig};
pub use contact::{
    Contact, ContactError, ContactId, ContactInput, DuplicatePolicy, IdStrategy, StorageError,
};
pub use directory::{ContactDirectory, CreateOutcome, DirectoryInfo};
pub use server::build_router;
pub use storage::{open_store, BackendKind, ContactStore};
