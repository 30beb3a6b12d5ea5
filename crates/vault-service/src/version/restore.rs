//! Restore engine: writes a stored version back out and verifies it.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::storage::StorageProvider;
use vault_core::types::ArtifactId;
use vault_entity::RestoreResult;
use vault_storage::checksum;

use crate::history::HistoryIndex;

/// Restores versions from the version store.
#[derive(Debug, Clone)]
pub struct RestoreEngine {
    /// Version store root.
    storage: Arc<dyn StorageProvider>,
    /// History index.
    index: HistoryIndex,
}

impl RestoreEngine {
    /// Creates a new restore engine.
    pub fn new(storage: Arc<dyn StorageProvider>, index: HistoryIndex) -> Self {
        Self { storage, index }
    }

    /// Write version `version_number` of `artifact_id` to `target`.
    ///
    /// Overwrites `target`. A checksum mismatch is reported through
    /// [`RestoreResult::checksum_valid`], not as an error.
    pub async fn restore(
        &self,
        artifact_id: &ArtifactId,
        version_number: u32,
        target: &Path,
    ) -> AppResult<RestoreResult> {
        let history = self.index.load(artifact_id).await?;
        let version = history.find(version_number).cloned().ok_or_else(|| {
            AppError::not_found(format!(
                "Version {version_number} not found for artifact {artifact_id}"
            ))
        })?;

        let bytes_written = self
            .storage
            .export_file(&version.storage_key(), version.encoding(), target)
            .await?;

        let restored_checksum = checksum::sha256_file(target).await?;
        let checksum_valid = restored_checksum == version.checksum;
        if checksum_valid {
            info!(
                artifact_id = %artifact_id,
                version = version_number,
                target = %target.display(),
                bytes_written,
                "Restored version"
            );
        } else {
            warn!(
                artifact_id = %artifact_id,
                version = version_number,
                expected = %version.checksum,
                actual = %restored_checksum,
                "Restored version failed checksum verification"
            );
        }

        Ok(RestoreResult {
            restored_version: version,
            target_path: target.to_path_buf(),
            restored_at: Utc::now(),
            bytes_written,
            restored_checksum,
            checksum_valid,
        })
    }
}
