//! Filesystem avatar storage.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use quill_core::ports::{AvatarError, AvatarStore};

/// Stores profile pictures as flat files under a configured directory.
///
/// Filenames derive from the owner's login name, so a re-upload with the
/// same extension overwrites in place; callers delete the filename
/// recorded on the user when it differs from the new one.
pub struct FsAvatarStore {
    base_dir: PathBuf,
}

impl FsAvatarStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Strip anything that could escape the storage directory.
    fn sanitize(owner_name: &str) -> String {
        owner_name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect()
    }
}

#[async_trait]
impl AvatarStore for FsAvatarStore {
    async fn save(
        &self,
        data: &[u8],
        owner_name: &str,
        extension: &str,
    ) -> Result<String, AvatarError> {
        let stem = Self::sanitize(owner_name);
        if stem.is_empty() {
            return Err(AvatarError::Storage(
                "owner name yields an empty filename".to_string(),
            ));
        }
        let filename = format!("{stem}.{extension}");

        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| AvatarError::Storage(e.to_string()))?;
        tokio::fs::write(self.base_dir.join(&filename), data)
            .await
            .map_err(|e| AvatarError::Storage(e.to_string()))?;

        tracing::debug!(%filename, "Stored profile picture");
        Ok(filename)
    }

    async fn delete(&self, filename: &str) -> Result<(), AvatarError> {
        // Only flat names ever get recorded; refuse anything else.
        if filename.contains('/') || filename.contains('\\') {
            return Err(AvatarError::Storage(format!(
                "refusing suspicious avatar filename: {filename}"
            )));
        }

        match tokio::fs::remove_file(self.base_dir.join(filename)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AvatarError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAvatarStore::new(dir.path());

        let filename = store.save(b"png-bytes", "alice", "png").await.unwrap();
        assert_eq!(filename, "alice.png");

        let on_disk = tokio::fs::read(dir.path().join(&filename)).await.unwrap();
        assert_eq!(on_disk, b"png-bytes");

        store.delete(&filename).await.unwrap();
        assert!(!dir.path().join(&filename).exists());
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAvatarStore::new(dir.path());

        assert!(store.delete("never-existed.png").await.is_ok());
    }

    #[tokio::test]
    async fn test_filenames_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAvatarStore::new(dir.path());

        let filename = store.save(b"x", "../../etc/passwd", "png").await.unwrap();
        assert_eq!(filename, "etcpasswd.png");

        assert!(store.delete("../outside.png").await.is_err());
    }
}
