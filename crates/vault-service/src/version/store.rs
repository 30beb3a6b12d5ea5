//! Version store: captures immutable snapshots of artifact files.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::traits::storage::StorageProvider;
use vault_core::types::{ArtifactId, Encoding, VersionId};
use vault_entity::Version;
use vault_storage::checksum;

use crate::history::HistoryIndex;

/// Author recorded when the caller supplies none.
pub const DEFAULT_AUTHOR: &str = "system";

/// Writes version files and records them in the history index.
#[derive(Debug, Clone)]
pub struct VersionStore {
    /// Version store root.
    storage: Arc<dyn StorageProvider>,
    /// History index.
    index: HistoryIndex,
    /// Whether new versions are gzip-compressed.
    compression: bool,
}

impl VersionStore {
    /// Creates a new version store.
    pub fn new(storage: Arc<dyn StorageProvider>, index: HistoryIndex, compression: bool) -> Self {
        Self {
            storage,
            index,
            compression,
        }
    }

    /// Encoding applied to newly stored versions.
    pub fn encoding(&self) -> Encoding {
        Encoding::from_compression(self.compression)
    }

    /// Capture `source` as the next version of `artifact_id`.
    ///
    /// The caller must hold the artifact's lock. The stored file is in place
    /// before the history is updated; if persisting the history fails the
    /// stored file is removed again and no version is recorded.
    pub async fn insert(
        &self,
        artifact_id: &ArtifactId,
        source: &Path,
        description: &str,
        author: &str,
    ) -> AppResult<Version> {
        let source_meta = tokio::fs::metadata(source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Source file not found: {}", source.display()))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to inspect source file: {}", source.display()),
                    e,
                )
            }
        })?;
        if !source_meta.is_file() {
            return Err(AppError::validation(format!(
                "Source is not a regular file: {}",
                source.display()
            )));
        }

        let mut history = self.index.load_fresh(artifact_id).await?;
        let version_number = history.next_version_number();
        let created_at = Utc::now();
        let version_id = VersionId::new(format!(
            "{artifact_id}_v{version_number}_{}",
            created_at.format("%Y%m%d_%H%M%S")
        ));

        let encoding = self.encoding();
        let key = format!(
            "{artifact_id}/{version_id}.{}",
            encoding.extension_for(source)
        );
        if self.storage.exists(&key).await? {
            return Err(AppError::conflict(format!("Version file already exists: {key}")));
        }

        let checksum = checksum::sha256_file(source).await?;
        let stored_bytes = self.storage.import_file(&key, source, encoding).await?;

        let author = author.trim();
        let version = Version {
            version_id,
            artifact_id: artifact_id.clone(),
            version_number,
            source_path: source.to_path_buf(),
            stored_path: self.storage.locate(&key),
            checksum,
            size_bytes: source_meta.len(),
            compressed: encoding.is_compressed(),
            created_at,
            created_by: if author.is_empty() {
                DEFAULT_AUTHOR.to_string()
            } else {
                author.to_string()
            },
            description: description.to_string(),
        };

        history.push(version.clone());
        if let Err(e) = self.index.save(&history).await {
            if let Err(cleanup) = self.storage.delete(&key).await {
                warn!(key, error = %cleanup, "Failed to remove orphaned version file");
            }
            return Err(e);
        }

        info!(
            artifact_id = %artifact_id,
            version = version_number,
            size_bytes = version.size_bytes,
            stored_bytes,
            compressed = version.compressed,
            "Created version"
        );

        Ok(version)
    }
}
