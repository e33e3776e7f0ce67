mod atomic;

pub use atomic::atomic_write;

use std::path::PathBuf;

/// The name of the per-user phonebook folder
pub const PHONEBOOK_FOLDER: &str = ".phonebook";

/// Get the per-user phonebook folder (`~/.phonebook`), falling back to the
/// working directory when no home directory is known.
#[must_use]
pub fn get_phonebook_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PHONEBOOK_FOLDER)
}

/// Get current timestamp in ISO 8601 format
#[must_use]
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    #[test]
    fn test_phonebook_home_ends_with_folder() {
        assert!(get_phonebook_home().ends_with(PHONEBOOK_FOLDER));
    }

    #[test]
    fn test_now_iso_format() {
        let timestamp = now_iso();
        assert!(timestamp.contains('T'));
        assert!(chrono::DateTime::parse_from_rfc3339(&timestamp).is_ok());
    }
}
