//! Integration tests for storage statistics.

use crate::helpers::{TestVault, artifact, report};

#[tokio::test]
async fn test_empty_vault_reports_zero() {
    let app = TestVault::new();
    let stats = app.vault.get_storage_statistics().await;
    assert_eq!(stats.total_storage_size, 0);
    assert!(stats.compression_enabled);
    assert!(stats.auto_backup_enabled);
}

#[tokio::test]
async fn test_counts_versions_histories_and_backups() {
    let app = TestVault::new();
    let source = app.write_source("report.xml", &report(500));
    app.vault
        .create_version(&artifact("A1"), &source, "", "ci")
        .await
        .unwrap();
    app.vault
        .create_version(&artifact("B2"), &source, "", "ci")
        .await
        .unwrap();

    let stats = app.vault.get_storage_statistics().await;
    // One version file plus one history document per artifact.
    assert_eq!(stats.version_file_count, 4);
    assert_eq!(stats.backup_file_count, 2);
    assert_eq!(
        stats.total_storage_size,
        stats.version_storage_size + stats.backup_storage_size
    );
    assert!(stats.backup_storage_size > 0);
}
