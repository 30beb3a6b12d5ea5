//! Version comparison result.

use serde::{Deserialize, Serialize};

use vault_core::types::ArtifactId;

use crate::version::Version;

/// Metadata-level difference between two versions of one artifact.
///
/// Reports that content changed, not what changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDiff {
    /// The artifact both versions belong to.
    pub artifact_id: ArtifactId,
    /// The "from" version.
    pub version1: Version,
    /// The "to" version.
    pub version2: Version,
    /// `size(version2) - size(version1)` in bytes.
    pub size_difference: i64,
    /// Minutes between the two creation times.
    pub time_difference: u64,
    /// Whether the checksums differ.
    pub checksum_changed: bool,
    /// One-line human-readable summary.
    pub summary: String,
}
