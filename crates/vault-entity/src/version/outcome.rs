//! Results of version creation and restoration.
//!
//! Both carry soft outcomes next to the primary result instead of failing:
//! a backup that could not be written, versions retention could not delete,
//! or restored bytes whose checksum does not match.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::Version;
use crate::backup::BackupStatus;
use crate::retention::RetentionReport;

/// A recorded version plus what happened after it was recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedVersion {
    /// The new version.
    pub version: Version,
    /// Outcome of the automatic backup.
    pub backup: BackupStatus,
    /// Outcome of the retention pass that followed.
    pub retention: RetentionReport,
}

/// Result of restoring a version to a target path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreResult {
    /// The version that was restored.
    pub restored_version: Version,
    /// Where the content was written.
    pub target_path: PathBuf,
    /// When the restore finished.
    pub restored_at: DateTime<Utc>,
    /// Number of bytes written to the target.
    pub bytes_written: u64,
    /// SHA-256 of the restored file.
    pub restored_checksum: String,
    /// Whether the restored checksum matches the recorded one.
    pub checksum_valid: bool,
}
