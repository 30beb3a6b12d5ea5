//! Retention policy: bounds the number of versions kept per artifact.

use std::sync::Arc;

use tracing::{info, warn};

use vault_core::result::AppResult;
use vault_core::traits::storage::StorageProvider;
use vault_core::types::ArtifactId;
use vault_entity::RetentionReport;

use crate::history::HistoryIndex;

/// Removes the oldest versions beyond the configured bound.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    /// Version store root.
    storage: Arc<dyn StorageProvider>,
    /// History index.
    index: HistoryIndex,
    /// Most recent versions to keep.
    max_versions: usize,
}

impl RetentionPolicy {
    /// Creates a new retention policy.
    pub fn new(storage: Arc<dyn StorageProvider>, index: HistoryIndex, max_versions: usize) -> Self {
        Self {
            storage,
            index,
            max_versions: max_versions.max(1),
        }
    }

    /// Prune `artifact_id` down to the newest `max_versions` versions.
    ///
    /// The caller must hold the artifact's lock. A version whose stored file
    /// cannot be deleted stays in the history and is retried by a later pass.
    pub async fn prune(&self, artifact_id: &ArtifactId) -> AppResult<RetentionReport> {
        let mut history = self.index.load_fresh(artifact_id).await?;
        let excess = history.excess(self.max_versions);
        if excess.is_empty() {
            return Ok(RetentionReport::untouched(artifact_id.clone(), history.len()));
        }

        let mut removed = Vec::new();
        let mut failed = Vec::new();
        for version in &excess {
            match self.storage.delete(&version.storage_key()).await {
                Ok(()) => removed.push(version.version_number),
                Err(e) => {
                    warn!(
                        artifact_id = %artifact_id,
                        version = version.version_number,
                        error = %e,
                        "Failed to delete old version file"
                    );
                    failed.push(version.version_number);
                }
            }
        }

        if !removed.is_empty() {
            history.remove(&removed);
            self.index.save(&history).await?;
        }

        info!(
            artifact_id = %artifact_id,
            removed = removed.len(),
            failed = failed.len(),
            retained = history.len(),
            "Applied retention"
        );

        Ok(RetentionReport {
            artifact_id: artifact_id.clone(),
            removed,
            failed,
            retained: history.len(),
        })
    }
}
