//! Diff engine: metadata-level comparison of two versions.

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::types::ArtifactId;
use vault_entity::{Version, VersionDiff};

use crate::history::HistoryIndex;

/// Compares versions recorded in the history index.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    /// History index.
    index: HistoryIndex,
}

impl DiffEngine {
    /// Creates a new diff engine.
    pub fn new(index: HistoryIndex) -> Self {
        Self { index }
    }

    /// Compare version `from` with version `to` of one artifact.
    pub async fn compare(
        &self,
        artifact_id: &ArtifactId,
        from: u32,
        to: u32,
    ) -> AppResult<VersionDiff> {
        let history = self.index.load(artifact_id).await?;
        let lookup = |number: u32| {
            history.find(number).ok_or_else(|| {
                AppError::not_found(format!(
                    "Version {number} not found for artifact {artifact_id}"
                ))
            })
        };
        Ok(diff_versions(lookup(from)?, lookup(to)?))
    }
}

/// Difference between two versions, read as "from `v1` to `v2`".
pub fn diff_versions(v1: &Version, v2: &Version) -> VersionDiff {
    let size_difference = v2.size_bytes as i64 - v1.size_bytes as i64;
    let time_difference = (v2.created_at - v1.created_at).num_minutes().unsigned_abs();
    let checksum_changed = v1.checksum != v2.checksum;

    let sign = if size_difference > 0 { "+" } else { "" };
    let summary = format!(
        "Version {} → {}: {sign}{size_difference} bytes, {}",
        v1.version_number,
        v2.version_number,
        if checksum_changed {
            "content changed"
        } else {
            "no content change"
        }
    );

    VersionDiff {
        artifact_id: v1.artifact_id.clone(),
        version1: v1.clone(),
        version2: v2.clone(),
        size_difference,
        time_difference,
        checksum_changed,
        summary,
    }
}
