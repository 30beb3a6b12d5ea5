//! # vault-service
//!
//! Artifact Vault services. Each service owns one concern and receives its
//! storage providers and history index at construction time via `Arc`
//! references; [`ArtifactVault`] wires them together and serializes
//! mutations per artifact.

pub mod backup;
pub mod diff;
pub mod history;
pub mod retention;
pub mod stats;
pub mod vault;
pub mod version;

pub use backup::BackupArchiver;
pub use diff::{DiffEngine, diff_versions};
pub use history::HistoryIndex;
pub use retention::RetentionPolicy;
pub use stats::StatisticsCollector;
pub use vault::ArtifactVault;
pub use version::{RestoreEngine, VersionStore};

#[cfg(test)]
pub(crate) mod testing {
    use std::path::PathBuf;

    use chrono::{Duration, TimeZone, Utc};
    use vault_core::types::{ArtifactId, VersionId};
    use vault_entity::Version;

    /// A 100-byte compressed version created `number` minutes after a fixed epoch.
    pub fn version(artifact_id: &ArtifactId, number: u32) -> Version {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        Version {
            version_id: VersionId::new(format!("{artifact_id}_v{number}_20250101_120000")),
            artifact_id: artifact_id.clone(),
            version_number: number,
            source_path: PathBuf::from("/uploads/report.xml"),
            stored_path: PathBuf::from(format!("{artifact_id}/{artifact_id}_v{number}.gz")),
            checksum: "ab".repeat(32),
            size_bytes: 100,
            compressed: true,
            created_at: base + Duration::minutes(i64::from(number)),
            created_by: "alice".into(),
            description: "initial".into(),
        }
    }
}
