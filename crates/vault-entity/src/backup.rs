//! Backup entities.
//!
//! A [`BackupRecord`] is self-contained: it embeds the version metadata and
//! the original bytes, so it stays restorable after the version store is
//! lost. On disk the record is JSON with the content base64-encoded, wrapped
//! in a gzip stream.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vault_core::types::{ArtifactId, BackupId};

use crate::version::Version;

/// A backup blob's decoded contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    /// Unique backup identifier.
    pub backup_id: BackupId,
    /// The artifact the backed-up version belongs to.
    pub artifact_id: ArtifactId,
    /// Metadata of the backed-up version.
    pub version: Version,
    /// Original file bytes; `None` when the source was gone at backup time.
    #[serde(default, with = "base64_content")]
    pub content: Option<Vec<u8>>,
    /// When the backup was taken.
    pub created_at: DateTime<Utc>,
}

/// Whether a backup blob carries content, decoded without materializing it.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BackupContentMarker {
    #[serde(default)]
    content: Option<serde::de::IgnoredAny>,
}

impl BackupContentMarker {
    /// Whether the original bytes were embedded.
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }
}

/// Summary of a stored backup blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupReceipt {
    /// Unique backup identifier.
    pub backup_id: BackupId,
    /// The artifact the backed-up version belongs to.
    pub artifact_id: ArtifactId,
    /// Which version was backed up.
    pub version_number: u32,
    /// Location of the blob.
    pub backup_path: PathBuf,
    /// Compressed blob size on disk.
    pub size_bytes: u64,
    /// Whether the original bytes were embedded.
    pub content_embedded: bool,
    /// When the backup was taken.
    pub created_at: DateTime<Utc>,
}

/// Outcome of the automatic backup that follows version creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BackupStatus {
    /// Auto-backup is turned off.
    Disabled,
    /// The backup was written.
    Created(BackupReceipt),
    /// The backup could not be written; the version is still recorded.
    Failed {
        /// Why the backup failed.
        reason: String,
    },
}

impl BackupStatus {
    /// The receipt, when a backup was written.
    pub fn receipt(&self) -> Option<&BackupReceipt> {
        match self {
            Self::Created(receipt) => Some(receipt),
            _ => None,
        }
    }
}

mod base64_content {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| STANDARD.decode(encoded).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::version;

    fn record(content: Option<Vec<u8>>) -> BackupRecord {
        BackupRecord {
            backup_id: BackupId::new("backup_A1_v1_20250101_120000_000001"),
            artifact_id: ArtifactId::parse("A1").unwrap(),
            version: version(1),
            content,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_content_is_base64_in_json() {
        let json = serde_json::to_value(record(Some(b"<testsuite/>".to_vec()))).unwrap();
        assert_eq!(json["content"], "PHRlc3RzdWl0ZS8+");

        let back: BackupRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.content.as_deref(), Some(&b"<testsuite/>"[..]));
    }

    #[test]
    fn test_missing_content_roundtrips_as_null() {
        let json = serde_json::to_value(record(None)).unwrap();
        assert!(json["content"].is_null());

        let back: BackupRecord = serde_json::from_value(json).unwrap();
        assert!(back.content.is_none());
    }

    #[test]
    fn test_content_marker_skips_payload() {
        let with: BackupContentMarker =
            serde_json::from_value(serde_json::to_value(record(Some(vec![1, 2, 3]))).unwrap())
                .unwrap();
        assert!(with.has_content());

        let without: BackupContentMarker =
            serde_json::from_value(serde_json::to_value(record(None)).unwrap()).unwrap();
        assert!(!without.has_content());
    }

    #[test]
    fn test_status_tagging() {
        let failed = BackupStatus::Failed {
            reason: "disk full".into(),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert!(failed.receipt().is_none());
        assert_eq!(
            serde_json::to_value(BackupStatus::Disabled).unwrap()["status"],
            "disabled"
        );
    }
}
