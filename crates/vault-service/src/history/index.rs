//! Version history index: `history.json` documents behind the history cache.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use vault_cache::{CacheManager, keys};
use vault_core::result::AppResult;
use vault_core::traits::cache::CacheProvider;
use vault_core::traits::storage::StorageProvider;
use vault_core::types::ArtifactId;
use vault_entity::VersionHistory;

/// File name of the per-artifact history document.
pub const HISTORY_FILE: &str = "history.json";

/// Reads and persists per-artifact version histories.
///
/// Reads are served from the cache when possible. Writes go to disk first
/// and only then refresh the cache, so a cached history is never newer than
/// the one on disk.
#[derive(Debug, Clone)]
pub struct HistoryIndex {
    /// Version store the documents live in.
    storage: Arc<dyn StorageProvider>,
    /// History cache.
    cache: CacheManager,
}

impl HistoryIndex {
    /// Creates a new history index.
    pub fn new(storage: Arc<dyn StorageProvider>, cache: CacheManager) -> Self {
        Self { storage, cache }
    }

    /// Storage path of an artifact's history document.
    pub fn document_path(artifact_id: &ArtifactId) -> String {
        format!("{artifact_id}/{HISTORY_FILE}")
    }

    /// Load an artifact's history for reading.
    ///
    /// Served from the cache when possible. An artifact that has never been
    /// versioned yields an empty history, which is not persisted.
    pub async fn load(&self, artifact_id: &ArtifactId) -> AppResult<VersionHistory> {
        let key = keys::history(artifact_id);
        match self.cache.get_json::<VersionHistory>(&key).await {
            Ok(Some(history)) => {
                debug!(artifact_id = %artifact_id, "History cache hit");
                return Ok(history);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(artifact_id = %artifact_id, error = %e, "Discarding unreadable cached history");
                self.evict(artifact_id).await;
            }
        }

        let Some(history) = self.read_document(artifact_id).await? else {
            return Ok(VersionHistory::new(artifact_id.clone()));
        };

        // A writer may have saved and cached a newer history while the
        // document was being read; never replace its entry.
        if matches!(self.cache.get(&key).await, Ok(None)) {
            if let Err(e) = self.cache.set_json(&key, &history).await {
                warn!(artifact_id = %artifact_id, error = %e, "Failed to cache history");
            }
        }
        Ok(history)
    }

    /// Load an artifact's history from disk, bypassing the cache.
    ///
    /// Used for read-modify-write sequences under the artifact's lock. The
    /// cache entry is replaced with what was read.
    pub async fn load_fresh(&self, artifact_id: &ArtifactId) -> AppResult<VersionHistory> {
        let Some(history) = self.read_document(artifact_id).await? else {
            self.evict(artifact_id).await;
            return Ok(VersionHistory::new(artifact_id.clone()));
        };

        if let Err(e) = self.cache.set_json(&keys::history(artifact_id), &history).await {
            warn!(artifact_id = %artifact_id, error = %e, "Failed to refresh cached history");
            self.evict(artifact_id).await;
        }
        Ok(history)
    }

    async fn read_document(&self, artifact_id: &ArtifactId) -> AppResult<Option<VersionHistory>> {
        match self.storage.read_bytes(&Self::document_path(artifact_id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice::<VersionHistory>(&bytes)?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Persist a history, then refresh its cache entry.
    pub async fn save(&self, history: &VersionHistory) -> AppResult<()> {
        let document = serde_json::to_vec_pretty(history)?;
        self.storage
            .write(&Self::document_path(&history.artifact_id), Bytes::from(document))
            .await?;

        let key = keys::history(&history.artifact_id);
        if let Err(e) = self.cache.set_json(&key, history).await {
            warn!(artifact_id = %history.artifact_id, error = %e, "Failed to refresh cached history");
            self.evict(&history.artifact_id).await;
        }

        debug!(
            artifact_id = %history.artifact_id,
            versions = history.len(),
            "Persisted history"
        );
        Ok(())
    }

    /// Drop an artifact's cached history so the next read goes to disk.
    pub async fn evict(&self, artifact_id: &ArtifactId) {
        if let Err(e) = self.cache.delete(&keys::history(artifact_id)).await {
            warn!(artifact_id = %artifact_id, error = %e, "Failed to evict cached history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_core::config::cache::CacheConfig;
    use vault_storage::LocalStorageProvider;

    use crate::testing::version;

    fn index(dir: &tempfile::TempDir) -> (HistoryIndex, CacheManager) {
        let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorageProvider::new(dir.path()));
        let cache = CacheManager::new(&CacheConfig::default()).unwrap();
        (HistoryIndex::new(storage, cache.clone()), cache)
    }

    #[tokio::test]
    async fn test_unknown_artifact_is_empty_and_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let (index, _) = index(&dir);
        let id = ArtifactId::parse("A1").unwrap();

        let history = index.load(&id).await.unwrap();
        assert!(history.is_empty());
        assert!(!dir.path().join("A1").join(HISTORY_FILE).exists());
    }

    #[tokio::test]
    async fn test_save_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let (index, cache) = index(&dir);
        let id = ArtifactId::parse("A1").unwrap();

        let mut history = VersionHistory::new(id.clone());
        history.push(version(&id, 1));
        index.save(&history).await.unwrap();

        let on_disk: VersionHistory =
            serde_json::from_slice(&std::fs::read(dir.path().join("A1/history.json")).unwrap())
                .unwrap();
        assert_eq!(on_disk, history);

        let cached: Option<VersionHistory> = cache.get_json(&keys::history(&id)).await.unwrap();
        assert_eq!(cached, Some(history));
    }

    #[tokio::test]
    async fn test_load_falls_back_to_disk_after_eviction() {
        let dir = tempfile::tempdir().unwrap();
        let (index, _) = index(&dir);
        let id = ArtifactId::parse("A1").unwrap();

        let mut history = VersionHistory::new(id.clone());
        history.push(version(&id, 1));
        history.push(version(&id, 2));
        index.save(&history).await.unwrap();
        index.evict(&id).await;

        let loaded = index.load(&id).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.latest_version_number, 2);
    }

    #[tokio::test]
    async fn test_load_fresh_replaces_stale_cache_entry() {
        let dir = tempfile::tempdir().unwrap();
        let (index, cache) = index(&dir);
        let id = ArtifactId::parse("A1").unwrap();

        let mut history = VersionHistory::new(id.clone());
        history.push(version(&id, 1));
        let stale = history.clone();
        history.push(version(&id, 2));
        index.save(&history).await.unwrap();
        cache.set_json(&keys::history(&id), &stale).await.unwrap();

        let fresh = index.load_fresh(&id).await.unwrap();
        assert_eq!(fresh, history);
        assert_eq!(index.load(&id).await.unwrap(), history);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (index, _) = index(&dir);
        std::fs::create_dir_all(dir.path().join("A1")).unwrap();
        std::fs::write(dir.path().join("A1/history.json"), b"{not json").unwrap();

        let err = index.load(&ArtifactId::parse("A1").unwrap()).await.unwrap_err();
        assert_eq!(err.kind, vault_core::error::ErrorKind::Serialization);
    }
}
