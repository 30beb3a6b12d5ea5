//! Per-artifact version history document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vault_core::types::ArtifactId;

use super::model::Version;

/// Ordered versions of one artifact, persisted as `history.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionHistory {
    /// The artifact this history tracks.
    pub artifact_id: ArtifactId,
    /// Retained versions, ascending by version number.
    pub versions: Vec<Version>,
    /// Highest version number ever issued, including pruned versions.
    #[serde(default)]
    pub latest_version_number: u32,
    /// When the history was first touched.
    pub created_at: DateTime<Utc>,
    /// When the history was last mutated.
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl VersionHistory {
    /// An empty history for an artifact that has never been versioned.
    pub fn new(artifact_id: ArtifactId) -> Self {
        Self {
            artifact_id,
            versions: Vec::new(),
            latest_version_number: 0,
            created_at: Utc::now(),
            last_updated: None,
        }
    }

    /// Number of retained versions.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether no versions are retained.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Look up a retained version by number.
    pub fn find(&self, version_number: u32) -> Option<&Version> {
        self.versions
            .iter()
            .find(|v| v.version_number == version_number)
    }

    /// The most recent retained version.
    pub fn latest(&self) -> Option<&Version> {
        self.versions.iter().max_by_key(|v| v.version_number)
    }

    /// Number the next created version will receive.
    ///
    /// Never reissues a number, even after older versions were pruned.
    pub fn next_version_number(&self) -> u32 {
        let retained = self
            .versions
            .iter()
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0);
        retained.max(self.latest_version_number) + 1
    }

    /// Append a newly created version.
    pub fn push(&mut self, version: Version) {
        self.latest_version_number = self.latest_version_number.max(version.version_number);
        self.last_updated = Some(version.created_at);
        self.versions.push(version);
        self.versions.sort_by_key(|v| v.version_number);
    }

    /// Versions beyond the newest `keep`, oldest first.
    pub fn excess(&self, keep: usize) -> Vec<Version> {
        let excess = self.versions.len().saturating_sub(keep);
        self.versions.iter().take(excess).cloned().collect()
    }

    /// Drop the given version numbers from the history.
    ///
    /// Returns how many versions were removed.
    pub fn remove(&mut self, version_numbers: &[u32]) -> usize {
        let before = self.versions.len();
        self.versions
            .retain(|v| !version_numbers.contains(&v.version_number));
        let removed = before - self.versions.len();
        if removed > 0 {
            self.last_updated = Some(Utc::now());
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::version;

    fn history_with(numbers: &[u32]) -> VersionHistory {
        let mut history = VersionHistory::new(ArtifactId::parse("A1").unwrap());
        for n in numbers {
            history.push(version(*n));
        }
        history
    }

    #[test]
    fn test_next_version_number_starts_at_one() {
        let history = VersionHistory::new(ArtifactId::parse("A1").unwrap());
        assert!(history.is_empty());
        assert_eq!(history.next_version_number(), 1);
        assert!(history.latest().is_none());
    }

    #[test]
    fn test_next_version_number_survives_pruning() {
        let mut history = history_with(&[1, 2, 3]);
        assert_eq!(history.next_version_number(), 4);

        history.remove(&[1, 2, 3]);
        assert!(history.is_empty());
        assert_eq!(history.next_version_number(), 4);
    }

    #[test]
    fn test_legacy_document_without_counter() {
        let mut history = history_with(&[4, 5]);
        history.latest_version_number = 0;
        assert_eq!(history.next_version_number(), 6);
    }

    #[test]
    fn test_excess_selects_oldest() {
        let history = history_with(&[1, 2, 3, 4, 5]);
        let excess: Vec<u32> = history.excess(3).iter().map(|v| v.version_number).collect();
        assert_eq!(excess, vec![1, 2]);
        assert!(history.excess(5).is_empty());
        assert!(history.excess(10).is_empty());
    }

    #[test]
    fn test_find_and_latest() {
        let history = history_with(&[1, 2]);
        assert_eq!(history.find(2).map(|v| v.version_number), Some(2));
        assert!(history.find(3).is_none());
        assert_eq!(history.latest().map(|v| v.version_number), Some(2));
        assert!(history.last_updated.is_some());
    }
}
