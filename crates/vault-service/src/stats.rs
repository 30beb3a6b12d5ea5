//! Storage statistics collector.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use vault_core::traits::storage::{StorageProvider, StorageUsage};
use vault_entity::StorageStatistics;

/// Walks the version and backup stores and reports their usage.
#[derive(Debug, Clone)]
pub struct StatisticsCollector {
    versions: Arc<dyn StorageProvider>,
    backups: Arc<dyn StorageProvider>,
    compression: bool,
    auto_backup: bool,
}

impl StatisticsCollector {
    /// Creates a new statistics collector.
    pub fn new(
        versions: Arc<dyn StorageProvider>,
        backups: Arc<dyn StorageProvider>,
        compression: bool,
        auto_backup: bool,
    ) -> Self {
        Self {
            versions,
            backups,
            compression,
            auto_backup,
        }
    }

    /// Collect current usage. A store that cannot be walked counts as empty.
    pub async fn collect(&self) -> StorageStatistics {
        let versions = usage_or_empty(self.versions.as_ref(), "version").await;
        let backups = usage_or_empty(self.backups.as_ref(), "backup").await;

        StorageStatistics {
            version_file_count: versions.file_count,
            version_storage_size: versions.total_bytes,
            backup_file_count: backups.file_count,
            backup_storage_size: backups.total_bytes,
            total_storage_size: versions.total_bytes + backups.total_bytes,
            compression_enabled: self.compression,
            auto_backup_enabled: self.auto_backup,
            collected_at: Utc::now(),
        }
    }
}

async fn usage_or_empty(storage: &dyn StorageProvider, store: &str) -> StorageUsage {
    match storage.usage().await {
        Ok(usage) => usage,
        Err(e) => {
            warn!(store, root = %storage.root().display(), error = %e, "Failed to collect storage usage");
            StorageUsage::default()
        }
    }
}
