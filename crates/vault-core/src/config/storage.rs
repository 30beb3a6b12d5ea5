//! Version and backup storage configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Storage roots, retention, and feature flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for per-artifact version trees.
    #[serde(default = "default_version_root")]
    pub version_root: String,
    /// Root directory for backup blobs.
    #[serde(default = "default_backup_root")]
    pub backup_root: String,
    /// Maximum number of versions retained per artifact.
    #[serde(default = "default_max_versions")]
    pub max_versions_per_artifact: usize,
    /// Whether a backup is written after every new version.
    #[serde(default = "default_true")]
    pub auto_backup: bool,
    /// Whether version files are stored gzip-compressed.
    #[serde(default = "default_true")]
    pub compression: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            version_root: default_version_root(),
            backup_root: default_backup_root(),
            max_versions_per_artifact: default_max_versions(),
            auto_backup: true,
            compression: true,
        }
    }
}

impl StorageConfig {
    /// Check roots and the retention bound.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.version_root.trim().is_empty() {
            return Err(AppError::configuration("storage.version_root must not be empty"));
        }
        if self.backup_root.trim().is_empty() {
            return Err(AppError::configuration("storage.backup_root must not be empty"));
        }
        let versions = Path::new(self.version_root.trim());
        let backups = Path::new(self.backup_root.trim());
        if versions.starts_with(backups) || backups.starts_with(versions) {
            return Err(AppError::configuration(
                "storage.version_root and storage.backup_root must not overlap",
            ));
        }
        if self.max_versions_per_artifact == 0 {
            return Err(AppError::configuration(
                "storage.max_versions_per_artifact must be at least 1",
            ));
        }
        Ok(())
    }
}

fn default_version_root() -> String {
    "versions".to_string()
}

fn default_backup_root() -> String {
    "backups".to_string()
}

fn default_max_versions() -> usize {
    10
}

fn default_true() -> bool {
    true
}
