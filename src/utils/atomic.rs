//! Whole-file replacement via temp file + rename.

use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace the file at `path` with `content` atomically.
///
/// The content is written to a temp file in the target's directory, synced,
/// and renamed over the target, so readers observe either the old or the new
/// document and never a partial one. The work runs on the blocking pool and
/// finishes even if the awaiting future is dropped.
///
/// # Errors
///
/// Returns an `io::Error` if the path has no parent, the temp file cannot be
/// created or written, or the rename fails. The target is untouched in every
/// failure case.
pub async fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        Some(_) => std::path::PathBuf::from("."),
        None => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        }
    };
    let target_path = path.to_path_buf();
    let bytes = content.as_bytes().to_vec();

    tokio::task::spawn_blocking(move || -> io::Result<()> {
        use std::io::Write;

        let mut temp_file = NamedTempFile::new_in(&parent)?;
        temp_file.write_all(&bytes)?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(&target_path).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(io::Error::other)?
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
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_atomic_write_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("db.json");

        atomic_write(&file_path, r#"{"persons": []}"#).await.unwrap();

        let content = std::fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, r#"{"persons": []}"#);
    }

    #[tokio::test]
    async fn test_atomic_write_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("db.json");
        std::fs::write(&file_path, "initial").unwrap();

        atomic_write(&file_path, "updated").await.unwrap();

        assert_eq!(std::fs::read_to_string(&file_path).unwrap(), "updated");
    }

    #[tokio::test]
    async fn test_atomic_write_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("db.json");

        atomic_write(&file_path, "content").await.unwrap();

        let count = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(count, 1, "only the target file should remain");
    }

    #[tokio::test]
    async fn test_atomic_write_fails_without_parent_dir() {
        let result = atomic_write(Path::new("/nonexistent/deeply/nested/db.json"), "x").await;
        assert!(result.is_err());
    }
}
