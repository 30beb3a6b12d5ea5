//! Aggregate storage statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// On-disk usage of the version and backup stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStatistics {
    /// Regular files below the version root (version files and history documents).
    pub version_file_count: u64,
    /// Bytes used below the version root.
    pub version_storage_size: u64,
    /// Backup blobs below the backup root.
    pub backup_file_count: u64,
    /// Bytes used below the backup root.
    pub backup_storage_size: u64,
    /// Sum of both stores.
    pub total_storage_size: u64,
    /// Compression flag in effect.
    pub compression_enabled: bool,
    /// Auto-backup flag in effect.
    pub auto_backup_enabled: bool,
    /// When the walk finished.
    pub collected_at: DateTime<Utc>,
}
