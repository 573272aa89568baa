//! Blob storage abstraction for the profile image.
//!
//! Mirrors the narrow contract of a hosted object store: write bytes at a
//! path and get a URL back, or delete a path. Injected into the account
//! logic the same way the identity provider is.

use crate::errors::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Narrow contract the core depends on for object storage.
#[allow(async_fn_in_trait)]
pub trait BlobStore {
    /// Stores bytes at the given path and returns a URL for the stored blob.
    async fn put_file(&self, path: &str, data: &[u8]) -> Result<String>;

    /// Deletes the blob at the given path.
    async fn delete(&self, path: &str) -> Result<()>;
}

/// Filesystem-backed blob store rooting every path under a configured
/// directory. Used by the binary; tests prefer [`MemoryBlobStore`].
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Creates a store writing beneath `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl BlobStore for FsBlobStore {
    async fn put_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full = self.full_path(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, data)?;
        Ok(format!("file://{}", full.display()))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let full = self.full_path(path);
        fs::remove_file(&full).map_err(|e| Error::Storage {
            message: format!("failed to delete {}: {e}", full.display()),
        })
    }
}

/// In-memory blob store for tests.
#[derive(Default)]
pub struct MemoryBlobStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a blob exists at the given path.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        match self.files.lock() {
            Ok(files) => files.contains_key(path),
            Err(poisoned) => poisoned.into_inner().contains_key(path),
        }
    }
}

impl BlobStore for MemoryBlobStore {
    async fn put_file(&self, path: &str, data: &[u8]) -> Result<String> {
        match self.files.lock() {
            Ok(mut files) => {
                files.insert(path.to_string(), data.to_vec());
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(path.to_string(), data.to_vec());
            }
        }
        Ok(format!("mem://{path}"))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let removed = match self.files.lock() {
            Ok(mut files) => files.remove(path),
            Err(poisoned) => poisoned.into_inner().remove(path),
        };
        if removed.is_none() {
            return Err(Error::Storage {
                message: format!("no blob at {path}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryBlobStore::new();
        let url = store.put_file("profile_images/u1.jpg", b"bytes").await.unwrap();
        assert_eq!(url, "mem://profile_images/u1.jpg");
        assert!(store.contains("profile_images/u1.jpg"));

        store.delete("profile_images/u1.jpg").await.unwrap();
        assert!(!store.contains("profile_images/u1.jpg"));
    }

    #[tokio::test]
    async fn test_memory_store_delete_missing_is_an_error() {
        let store = MemoryBlobStore::new();
        let result = store.delete("profile_images/nobody.jpg").await;
        assert!(matches!(result, Err(Error::Storage { .. })));
    }
}
