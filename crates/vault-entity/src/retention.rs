//! Retention pass report.

use serde::{Deserialize, Serialize};

use vault_core::types::ArtifactId;

/// What one retention pass did for an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionReport {
    /// The artifact that was pruned.
    pub artifact_id: ArtifactId,
    /// Version numbers removed from disk and history.
    pub removed: Vec<u32>,
    /// Version numbers whose stored file could not be deleted; they stay in the history.
    pub failed: Vec<u32>,
    /// Versions retained after the pass.
    pub retained: usize,
}

impl RetentionReport {
    /// A pass that found nothing to prune.
    pub fn untouched(artifact_id: ArtifactId, retained: usize) -> Self {
        Self {
            artifact_id,
            removed: Vec::new(),
            failed: Vec::new(),
            retained,
        }
    }

    /// Whether the pass had nothing to prune.
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.failed.is_empty()
    }
}
