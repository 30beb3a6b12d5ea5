//! `ArtifactVault`: the entry point tying the vault services together.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use vault_cache::{CacheManager, KeyedLocks, keys};
use vault_core::config::{AppConfig, StorageConfig};
use vault_core::result::AppResult;
use vault_core::traits::storage::StorageProvider;
use vault_core::types::{ArtifactId, BackupId};
use vault_entity::{
    BackupReceipt, BackupRecord, BackupStatus, CreatedVersion, RestoreResult, RetentionReport,
    StorageStatistics, Version, VersionDiff, VersionHistory,
};
use vault_storage::LocalStorageProvider;

use crate::backup::BackupArchiver;
use crate::diff::DiffEngine;
use crate::history::HistoryIndex;
use crate::retention::RetentionPolicy;
use crate::stats::StatisticsCollector;
use crate::version::{RestoreEngine, VersionStore};

/// Versioned artifact storage with backups and bounded retention.
///
/// Creation and cleanup for one artifact are serialized by a per-artifact
/// lock; different artifacts proceed in parallel. Reads take no lock.
#[derive(Debug, Clone)]
pub struct ArtifactVault {
    settings: StorageConfig,
    locks: KeyedLocks,
    index: HistoryIndex,
    store: VersionStore,
    restorer: RestoreEngine,
    differ: DiffEngine,
    archiver: BackupArchiver,
    retention: RetentionPolicy,
    stats: StatisticsCollector,
}

impl ArtifactVault {
    /// Build a vault over local version and backup roots from configuration.
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;
        let versions: Arc<dyn StorageProvider> =
            Arc::new(LocalStorageProvider::new(&config.storage.version_root));
        let backups: Arc<dyn StorageProvider> =
            Arc::new(LocalStorageProvider::new(&config.storage.backup_root));
        let cache = CacheManager::new(&config.cache)?;

        info!(
            version_root = %config.storage.version_root,
            backup_root = %config.storage.backup_root,
            max_versions = config.storage.max_versions_per_artifact,
            compression = config.storage.compression,
            auto_backup = config.storage.auto_backup,
            "Opened artifact vault"
        );
        Ok(Self::with_providers(
            config.storage.clone(),
            versions,
            backups,
            cache,
        ))
    }

    /// Build a vault over explicit storage providers and cache.
    pub fn with_providers(
        settings: StorageConfig,
        versions: Arc<dyn StorageProvider>,
        backups: Arc<dyn StorageProvider>,
        cache: CacheManager,
    ) -> Self {
        let index = HistoryIndex::new(versions.clone(), cache);
        Self {
            store: VersionStore::new(versions.clone(), index.clone(), settings.compression),
            restorer: RestoreEngine::new(versions.clone(), index.clone()),
            differ: DiffEngine::new(index.clone()),
            archiver: BackupArchiver::new(backups.clone(), index.clone()),
            retention: RetentionPolicy::new(
                versions.clone(),
                index.clone(),
                settings.max_versions_per_artifact,
            ),
            stats: StatisticsCollector::new(
                versions,
                backups,
                settings.compression,
                settings.auto_backup,
            ),
            locks: KeyedLocks::new(),
            index,
            settings,
        }
    }

    /// Storage settings in effect.
    pub fn settings(&self) -> &StorageConfig {
        &self.settings
    }

    /// Capture `source` as the next version of `artifact_id`.
    ///
    /// Runs the automatic backup (when enabled) and a retention pass
    /// afterwards. Their failures are reported in the result and never undo
    /// the new version.
    pub async fn create_version(
        &self,
        artifact_id: &ArtifactId,
        source: &Path,
        description: &str,
        author: &str,
    ) -> AppResult<CreatedVersion> {
        let guard = self.locks.acquire(&keys::artifact_lock(artifact_id)).await;

        let version = self
            .store
            .insert(artifact_id, source, description, author)
            .await?;

        let backup = if self.settings.auto_backup {
            match self.archiver.create_backup(&version).await {
                Ok(receipt) => BackupStatus::Created(receipt),
                Err(e) => {
                    warn!(
                        artifact_id = %artifact_id,
                        version = version.version_number,
                        error = %e,
                        "Automatic backup failed"
                    );
                    BackupStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        } else {
            BackupStatus::Disabled
        };

        let retention = match self.retention.prune(artifact_id).await {
            Ok(report) => report,
            Err(e) => {
                warn!(artifact_id = %artifact_id, error = %e, "Retention pass failed");
                let retained = self.index.load(artifact_id).await.map(|h| h.len()).unwrap_or(0);
                RetentionReport::untouched(artifact_id.clone(), retained)
            }
        };

        drop(guard);
        self.locks.prune();

        Ok(CreatedVersion {
            version,
            backup,
            retention,
        })
    }

    /// Restore version `version_number` of `artifact_id` to `target`.
    pub async fn restore_version(
        &self,
        artifact_id: &ArtifactId,
        version_number: u32,
        target: &Path,
    ) -> AppResult<RestoreResult> {
        self.restorer.restore(artifact_id, version_number, target).await
    }

    /// The artifact's history; empty when it has never been versioned.
    pub async fn get_version_history(&self, artifact_id: &ArtifactId) -> AppResult<VersionHistory> {
        self.index.load(artifact_id).await
    }

    /// Retained versions of an artifact, oldest first.
    pub async fn list_versions(&self, artifact_id: &ArtifactId) -> AppResult<Vec<Version>> {
        Ok(self.index.load(artifact_id).await?.versions)
    }

    /// Compare version `from` with version `to`.
    pub async fn compare_versions(
        &self,
        artifact_id: &ArtifactId,
        from: u32,
        to: u32,
    ) -> AppResult<VersionDiff> {
        self.differ.compare(artifact_id, from, to).await
    }

    /// Back up an already recorded version.
    pub async fn create_backup(&self, version: &Version) -> AppResult<BackupReceipt> {
        self.archiver.create_backup(version).await
    }

    /// Back up version `version_number`, or the latest version when `None`.
    pub async fn backup_version(
        &self,
        artifact_id: &ArtifactId,
        version_number: Option<u32>,
    ) -> AppResult<BackupReceipt> {
        self.archiver.backup_version(artifact_id, version_number).await
    }

    /// Stored backups, newest first, optionally for one artifact.
    pub async fn list_backups(
        &self,
        artifact_id: Option<&ArtifactId>,
    ) -> AppResult<Vec<BackupReceipt>> {
        self.archiver.list_backups(artifact_id).await
    }

    /// Decode one backup blob.
    pub async fn read_backup(&self, backup_id: &BackupId) -> AppResult<BackupRecord> {
        self.archiver.read_backup(backup_id).await
    }

    /// Write a backup's embedded content to `target`.
    pub async fn restore_backup(
        &self,
        backup_id: &BackupId,
        target: &Path,
    ) -> AppResult<RestoreResult> {
        self.archiver.restore_backup(backup_id, target).await
    }

    /// Run a retention pass for one artifact now.
    pub async fn cleanup_old_versions(&self, artifact_id: &ArtifactId) -> AppResult<RetentionReport> {
        let _guard = self.locks.acquire(&keys::artifact_lock(artifact_id)).await;
        self.retention.prune(artifact_id).await
    }

    /// Aggregate usage of the version and backup stores.
    pub async fn get_storage_statistics(&self) -> StorageStatistics {
        self.stats.collect().await
    }
}
