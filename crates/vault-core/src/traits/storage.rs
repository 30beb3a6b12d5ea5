//! Storage provider trait for the version and backup stores.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;
use crate::types::Encoding;

/// Metadata about a stored object.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StorageObjectMeta {
    /// Path relative to the provider root.
    pub path: String,
    /// On-disk size in bytes.
    pub size_bytes: u64,
    /// Last modified timestamp.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
    /// Whether this is a directory.
    pub is_directory: bool,
}

/// Aggregate on-disk usage of a provider root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StorageUsage {
    /// Number of regular files below the root.
    pub file_count: u64,
    /// Sum of their on-disk sizes in bytes.
    pub total_bytes: u64,
}

/// Trait for file storage backends rooted at one directory.
///
/// Paths are relative to the provider root. Writes land under a temporary
/// name first and are renamed into place, so readers never observe a
/// partially written object under its final path.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Root directory of this provider.
    fn root(&self) -> &Path;

    /// Absolute location of a relative path.
    fn locate(&self, path: &str) -> PathBuf;

    /// Read an object into memory.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Write bytes to an object, replacing any previous content.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Copy an external file into the store, applying `encoding`.
    ///
    /// Returns the number of bytes stored on disk.
    async fn import_file(&self, path: &str, source: &Path, encoding: Encoding) -> AppResult<u64>;

    /// Copy an object out of the store to an external file, reversing `encoding`.
    ///
    /// Overwrites `target`. Returns the number of decoded bytes written.
    async fn export_file(&self, path: &str, encoding: Encoding, target: &Path) -> AppResult<u64>;

    /// Delete an object. Missing objects are not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether an object or directory exists.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// List the direct children of a directory.
    async fn list(&self, path: &str) -> AppResult<Vec<StorageObjectMeta>>;

    /// Count regular files below the root and sum their sizes.
    async fn usage(&self) -> AppResult<StorageUsage>;
}
