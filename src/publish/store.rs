use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use sha2::Digest as _;

use crate::foundation::core::ContentAddress;
use crate::foundation::error::{TraitstackError, TraitstackResult};

/// Uploads blobs to a content-addressed store.
///
/// `publish` may be called more than once per run; each call returns the address of exactly the
/// bytes it was given.
pub trait Publisher: Send + Sync {
    /// Upload `bytes` under a display `name` and return the assigned address.
    fn publish(&self, name: &str, bytes: &[u8]) -> TraitstackResult<ContentAddress>;
}

/// Lowercase hex SHA-256 of `bytes`, as a content address.
pub fn sha256_address(bytes: &[u8]) -> TraitstackResult<ContentAddress> {
    ContentAddress::new(hex::encode(sha2::Sha256::digest(bytes)))
}

/// One recorded upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    /// Display name passed to `publish`.
    pub name: String,
    /// Address returned for the upload.
    pub address: ContentAddress,
    /// Uploaded bytes.
    pub bytes: Vec<u8>,
}

/// In-memory store for tests and debugging.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    uploads: Mutex<Vec<Upload>>,
}

impl MemoryPublisher {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of uploads in call order.
    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads
            .lock()
            .map(|u| u.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Bytes stored under `address`, if any.
    pub fn get(&self, address: &ContentAddress) -> Option<Vec<u8>> {
        self.uploads()
            .into_iter()
            .find(|u| &u.address == address)
            .map(|u| u.bytes)
    }
}

impl Publisher for MemoryPublisher {
    fn publish(&self, name: &str, bytes: &[u8]) -> TraitstackResult<ContentAddress> {
        let address = sha256_address(bytes)?;
        let mut uploads = self
            .uploads
            .lock()
            .map_err(|_| TraitstackError::Other(anyhow::anyhow!("memory publisher poisoned")))?;
        uploads.push(Upload {
            name: name.to_string(),
            address: address.clone(),
            bytes: bytes.to_vec(),
        });
        Ok(address)
    }
}

/// Local content-addressed store: each blob lands at `{root}/{sha256}.zip`.
#[derive(Clone, Debug)]
pub struct DirPublisher {
    root: PathBuf,
}

impl DirPublisher {
    /// Store rooted at `root`. The directory is created on first publish.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a blob with `address` is stored at.
    pub fn blob_path(&self, address: &ContentAddress) -> PathBuf {
        self.root.join(format!("{address}.zip"))
    }
}

impl Publisher for DirPublisher {
    #[tracing::instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    fn publish(&self, name: &str, bytes: &[u8]) -> TraitstackResult<ContentAddress> {
        let address = sha256_address(bytes)?;
        let path = self.blob_path(&address);
        if path.exists() {
            tracing::debug!(%address, "blob already stored");
            return Ok(address);
        }

        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("create store dir '{}'", self.root.display()))?;
        let tmp = self.root.join(format!(".{address}.partial"));
        std::fs::write(&tmp, bytes).with_context(|| format!("write blob '{}'", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("move blob into place '{}'", path.display()))?;

        tracing::info!(%address, path = %path.display(), "blob stored");
        Ok(address)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/publish/store.rs"]
mod tests;
