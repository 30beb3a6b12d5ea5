//! Backup archiver: self-contained, gzip-compressed backup blobs.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use tracing::{debug, info, warn};

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::traits::storage::StorageProvider;
use vault_core::types::{ArtifactId, BackupId};
use vault_entity::{BackupContentMarker, BackupReceipt, BackupRecord, RestoreResult, Version};
use vault_storage::{checksum, codec, write_atomic};

use crate::history::HistoryIndex;

/// File extension of backup blobs.
pub const BACKUP_EXTENSION: &str = "backup";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";

/// Writes and reads backup blobs in the backup store.
#[derive(Debug, Clone)]
pub struct BackupArchiver {
    /// Backup store root.
    storage: Arc<dyn StorageProvider>,
    /// History index, for backing up recorded versions by number.
    index: HistoryIndex,
}

impl BackupArchiver {
    /// Creates a new backup archiver.
    pub fn new(storage: Arc<dyn StorageProvider>, index: HistoryIndex) -> Self {
        Self { storage, index }
    }

    fn blob_path(backup_id: &BackupId) -> String {
        format!("{backup_id}.{BACKUP_EXTENSION}")
    }

    /// Bundle `version` and its original bytes into a new backup blob.
    ///
    /// When the original file no longer exists the blob is written without
    /// content. When it has changed since the version was recorded, the
    /// bytes come from the stored version file instead.
    pub async fn create_backup(&self, version: &Version) -> AppResult<BackupReceipt> {
        let content = match tokio::fs::read(&version.source_path).await {
            Ok(bytes) if checksum::sha256_hex(&bytes) == version.checksum => Some(bytes),
            Ok(_) => {
                warn!(
                    artifact_id = %version.artifact_id,
                    version = version.version_number,
                    source = %version.source_path.display(),
                    "Source file changed since the version was recorded; using the stored copy"
                );
                stored_content(version).await
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    artifact_id = %version.artifact_id,
                    version = version.version_number,
                    source = %version.source_path.display(),
                    "Source file is gone; writing backup without content"
                );
                None
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read {}", version.source_path.display()),
                    e,
                ));
            }
        };

        // Truncated to the precision the blob name carries.
        let created_at = Utc::now().trunc_subsecs(6);
        let backup_id = BackupId::new(format!(
            "backup_{}_v{}_{}",
            version.artifact_id,
            version.version_number,
            created_at.format(TIMESTAMP_FORMAT)
        ));
        let content_embedded = content.is_some();
        let record = BackupRecord {
            backup_id: backup_id.clone(),
            artifact_id: version.artifact_id.clone(),
            version: version.clone(),
            content,
            created_at,
        };

        let blob = tokio::task::spawn_blocking(move || -> AppResult<Vec<u8>> {
            let json = serde_json::to_vec(&record)?;
            codec::gzip_compress(&json)
        })
        .await
        .map_err(|e| AppError::internal(format!("Backup encoding task failed: {e}")))??;

        let size_bytes = blob.len() as u64;
        let path = Self::blob_path(&backup_id);
        self.storage.write(&path, Bytes::from(blob)).await?;

        info!(
            artifact_id = %version.artifact_id,
            version = version.version_number,
            backup_id = %backup_id,
            size_bytes,
            content_embedded,
            "Created backup"
        );

        Ok(BackupReceipt {
            backup_id,
            artifact_id: version.artifact_id.clone(),
            version_number: version.version_number,
            backup_path: self.storage.locate(&path),
            size_bytes,
            content_embedded,
            created_at,
        })
    }

    /// Back up a recorded version, or the latest one when `version_number` is `None`.
    pub async fn backup_version(
        &self,
        artifact_id: &ArtifactId,
        version_number: Option<u32>,
    ) -> AppResult<BackupReceipt> {
        let history = self.index.load(artifact_id).await?;
        let version = match version_number {
            Some(number) => history.find(number).ok_or_else(|| {
                AppError::not_found(format!(
                    "Version {number} not found for artifact {artifact_id}"
                ))
            })?,
            None => history.latest().ok_or_else(|| {
                AppError::not_found(format!("Artifact {artifact_id} has no versions"))
            })?,
        };
        self.create_backup(version).await
    }

    /// Decode a backup blob.
    pub async fn read_backup(&self, backup_id: &BackupId) -> AppResult<BackupRecord> {
        let raw = backup_id.as_str();
        if raw.is_empty() || raw.contains(['/', '\\']) || raw.contains("..") {
            return Err(AppError::validation(format!("Invalid backup id: {raw:?}")));
        }

        let blob = self
            .storage
            .read_bytes(&Self::blob_path(backup_id))
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    AppError::not_found(format!("Backup not found: {backup_id}"))
                } else {
                    e
                }
            })?;

        tokio::task::spawn_blocking(move || -> AppResult<BackupRecord> {
            let json = codec::gzip_decompress(&blob)?;
            Ok(serde_json::from_slice::<BackupRecord>(&json)?)
        })
        .await
        .map_err(|e| AppError::internal(format!("Backup decoding task failed: {e}")))?
    }

    /// Receipts for stored backups, newest first.
    ///
    /// Artifact, version, and timestamp come from the blob name; only the
    /// content marker is read from the blob. Blobs that cannot be read are
    /// skipped with a warning.
    pub async fn list_backups(
        &self,
        artifact_id: Option<&ArtifactId>,
    ) -> AppResult<Vec<BackupReceipt>> {
        let suffix = format!(".{BACKUP_EXTENSION}");
        let mut receipts = Vec::new();

        for entry in self.storage.list("").await? {
            if entry.is_directory {
                continue;
            }
            let Some(stem) = entry.path.strip_suffix(&suffix) else {
                continue;
            };
            let Some(name) = BlobName::parse(stem) else {
                debug!(path = %entry.path, "Skipping foreign file in backup store");
                continue;
            };
            if artifact_id.is_some_and(|id| *id != name.artifact_id) {
                continue;
            }

            let content_embedded = match self.content_marker(&entry.path).await {
                Ok(marker) => marker.has_content(),
                Err(e) => {
                    warn!(path = %entry.path, error = %e, "Skipping unreadable backup");
                    continue;
                }
            };

            receipts.push(BackupReceipt {
                backup_id: BackupId::new(stem),
                artifact_id: name.artifact_id,
                version_number: name.version_number,
                backup_path: self.storage.locate(&entry.path),
                size_bytes: entry.size_bytes,
                content_embedded,
                created_at: name.created_at,
            });
        }

        receipts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = receipts.len(), "Listed backups");
        Ok(receipts)
    }

    async fn content_marker(&self, path: &str) -> AppResult<BackupContentMarker> {
        let blob = self.storage.read_bytes(path).await?;
        tokio::task::spawn_blocking(move || -> AppResult<BackupContentMarker> {
            Ok(serde_json::from_reader(codec::gzip_reader(&blob))?)
        })
        .await
        .map_err(|e| AppError::internal(format!("Backup decoding task failed: {e}")))?
    }

    /// Write a backup's embedded bytes to `target` and verify them.
    ///
    /// Overwrites `target`. A checksum mismatch is reported through
    /// [`RestoreResult::checksum_valid`], not as an error.
    pub async fn restore_backup(
        &self,
        backup_id: &BackupId,
        target: &Path,
    ) -> AppResult<RestoreResult> {
        let record = self.read_backup(backup_id).await?;
        let content = record.content.ok_or_else(|| {
            AppError::not_found(format!("Backup {backup_id} has no embedded content"))
        })?;

        write_atomic(target, &content).await?;

        let restored_checksum = checksum::sha256_file(target).await?;
        let checksum_valid = restored_checksum == record.version.checksum;
        if checksum_valid {
            info!(
                backup_id = %backup_id,
                target = %target.display(),
                bytes_written = content.len(),
                "Restored backup"
            );
        } else {
            warn!(
                backup_id = %backup_id,
                expected = %record.version.checksum,
                actual = %restored_checksum,
                "Restored backup failed checksum verification"
            );
        }

        Ok(RestoreResult {
            restored_version: record.version,
            target_path: target.to_path_buf(),
            restored_at: Utc::now(),
            bytes_written: content.len() as u64,
            restored_checksum,
            checksum_valid,
        })
    }
}

/// Decoded bytes of the stored version file, when they still match the
/// recorded checksum.
async fn stored_content(version: &Version) -> Option<Vec<u8>> {
    let raw = match tokio::fs::read(&version.stored_path).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(
                stored = %version.stored_path.display(),
                error = %e,
                "Stored version file is unreadable; writing backup without content"
            );
            return None;
        }
    };

    let compressed = version.compressed;
    let expected = version.checksum.clone();
    let decoded = tokio::task::spawn_blocking(move || -> AppResult<Option<Vec<u8>>> {
        let bytes = if compressed { codec::gzip_decompress(&raw)? } else { raw };
        Ok((checksum::sha256_hex(&bytes) == expected).then_some(bytes))
    })
    .await;

    match decoded {
        Ok(Ok(Some(bytes))) => Some(bytes),
        Ok(Ok(None)) => {
            warn!(
                stored = %version.stored_path.display(),
                "Stored version file fails checksum verification; writing backup without content"
            );
            None
        }
        Ok(Err(e)) => {
            warn!(stored = %version.stored_path.display(), error = %e, "Failed to decode stored version file");
            None
        }
        Err(e) => {
            warn!(error = %e, "Stored version decoding task failed");
            None
        }
    }
}

/// Fields encoded in a backup blob name:
/// `backup_{artifact}_v{number}_{%Y%m%d_%H%M%S_%6f}`.
#[derive(Debug, PartialEq, Eq)]
struct BlobName {
    artifact_id: ArtifactId,
    version_number: u32,
    created_at: DateTime<Utc>,
}

impl BlobName {
    fn parse(stem: &str) -> Option<Self> {
        let rest = stem.strip_prefix("backup_")?;
        let mut parts = rest.rsplitn(4, '_');
        let micros = parts.next()?;
        let time = parts.next()?;
        let date = parts.next()?;
        let (artifact, number) = parts.next()?.rsplit_once("_v")?;

        let created_at =
            NaiveDateTime::parse_from_str(&format!("{date}_{time}_{micros}"), TIMESTAMP_FORMAT)
                .ok()?
                .and_utc();
        Some(Self {
            artifact_id: ArtifactId::parse(artifact).ok()?,
            version_number: number.parse().ok()?,
            created_at,
        })
    }
}
