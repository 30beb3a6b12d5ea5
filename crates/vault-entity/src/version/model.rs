//! Version entity model.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vault_core::types::{ArtifactId, Encoding, VersionId};

/// One immutable, checksummed snapshot of an artifact's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Unique version identifier.
    pub version_id: VersionId,
    /// The artifact this version belongs to.
    pub artifact_id: ArtifactId,
    /// Sequential version number, starting at 1.
    pub version_number: u32,
    /// Where the original file lived when the version was captured.
    pub source_path: PathBuf,
    /// Where the stored snapshot lives.
    pub stored_path: PathBuf,
    /// SHA-256 of the original bytes, lowercase hex.
    pub checksum: String,
    /// Size of the original content in bytes.
    pub size_bytes: u64,
    /// Whether `stored_path` holds a gzip encoding of the original.
    pub compressed: bool,
    /// When the version was captured.
    pub created_at: DateTime<Utc>,
    /// Who captured it.
    pub created_by: String,
    /// Free-text description of the change.
    pub description: String,
}

impl Version {
    /// Encoding of the stored file.
    pub fn encoding(&self) -> Encoding {
        Encoding::from_compression(self.compressed)
    }

    /// File name of the stored snapshot.
    pub fn stored_file_name(&self) -> Option<&str> {
        self.stored_path.file_name().and_then(|n| n.to_str())
    }

    /// Path of the stored snapshot relative to the version root.
    pub fn storage_key(&self) -> String {
        let name = self
            .stored_file_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.version_id.to_string());
        format!("{}/{}", self.artifact_id, name)
    }
}
