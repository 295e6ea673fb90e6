//! Profile picture storage port.

use async_trait::async_trait;

/// Avatar storage boundary.
///
/// Implementations persist the raw bytes and hand back the filename to
/// record on the user. Resizing or other image processing is not part of
/// the contract.
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Store a picture for `owner_name`, returning the stored filename.
    async fn save(
        &self,
        data: &[u8],
        owner_name: &str,
        extension: &str,
    ) -> Result<String, AvatarError>;

    /// Remove a previously stored picture. Deleting a file that is
    /// already gone is not an error.
    async fn delete(&self, filename: &str) -> Result<(), AvatarError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error("Avatar storage failed: {0}")]
    Storage(String),
}
