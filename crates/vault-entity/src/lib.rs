//! # vault-entity
//!
//! Domain models for Artifact Vault. Persisted models (`Version`,
//! `VersionHistory`, `BackupRecord`) round-trip through JSON on disk; the
//! rest are value objects returned to callers. All derive `Debug`, `Clone`,
//! `Serialize`, and `Deserialize`.

pub mod backup;
pub mod diff;
pub mod retention;
pub mod stats;
pub mod version;

pub use backup::{BackupContentMarker, BackupReceipt, BackupRecord, BackupStatus};
pub use diff::VersionDiff;
pub use retention::RetentionReport;
pub use stats::StorageStatistics;
pub use version::{CreatedVersion, RestoreResult, Version, VersionHistory};

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::PathBuf;

    use chrono::{Duration, TimeZone, Utc};
    use vault_core::types::{ArtifactId, VersionId};

    use crate::Version;

    /// A compressed version of artifact `A1`, created `number` minutes after a fixed epoch.
    pub fn version(number: u32) -> Version {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        Version {
            version_id: VersionId::new(format!("A1_v{number}_20250101_120000")),
            artifact_id: ArtifactId::parse("A1").unwrap(),
            version_number: number,
            source_path: PathBuf::from("/uploads/report.xml"),
            stored_path: PathBuf::from(format!("versions/A1/A1_v{number}_20250101_120000.gz")),
            checksum: "ab".repeat(32),
            size_bytes: 100,
            compressed: true,
            created_at: base + Duration::minutes(i64::from(number)),
            created_by: "alice".into(),
            description: "initial".into(),
        }
    }
}
