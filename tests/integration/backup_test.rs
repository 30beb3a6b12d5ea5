//! Integration tests for backups.

use vault_core::types::BackupId;

use crate::helpers::{TestVault, artifact, report};

#[tokio::test]
async fn test_backup_restores_after_version_store_is_lost() {
    let app = TestVault::new();
    let id = artifact("A1");
    let source = app.write_source("report.xml", &report(300));

    let created = app.vault.create_version(&id, &source, "initial", "alice").await.unwrap();
    let receipt = created.backup.receipt().cloned().unwrap();
    assert!(receipt.content_embedded);

    std::fs::remove_dir_all(app.version_root()).unwrap();
    std::fs::remove_file(&source).unwrap();

    let record = app.vault.read_backup(&receipt.backup_id).await.unwrap();
    assert_eq!(record.version, created.version);

    let target = app.path("recovered.xml");
    let restored = app.vault.restore_backup(&receipt.backup_id, &target).await.unwrap();
    assert!(restored.checksum_valid);
    assert_eq!(std::fs::read(&target).unwrap(), report(300));
}

#[tokio::test]
async fn test_manual_backup_of_older_version() {
    let app = TestVault::with_config(|c| c.storage.auto_backup = false);
    let id = artifact("A1");
    let first = app.write_source("first.xml", b"first");
    let second = app.write_source("second.xml", b"second");
    app.vault.create_version(&id, &first, "", "ci").await.unwrap();
    app.vault.create_version(&id, &second, "", "ci").await.unwrap();
    assert!(app.vault.list_backups(None).await.unwrap().is_empty());

    let latest = app.vault.backup_version(&id, None).await.unwrap();
    assert_eq!(latest.version_number, 2);
    let older = app.vault.backup_version(&id, Some(1)).await.unwrap();
    assert_eq!(older.version_number, 1);

    let listed = app.vault.list_backups(Some(&id)).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].backup_id, older.backup_id);
}

#[tokio::test]
async fn test_backup_of_older_version_after_source_was_overwritten() {
    let app = TestVault::with_config(|c| c.storage.auto_backup = false);
    let id = artifact("A1");
    let source = app.write_source("report.xml", b"first upload");
    app.vault.create_version(&id, &source, "", "ci").await.unwrap();
    app.write_source("report.xml", b"second upload");
    app.vault.create_version(&id, &source, "", "ci").await.unwrap();

    let receipt = app.vault.backup_version(&id, Some(1)).await.unwrap();
    let target = app.path("restored.xml");
    let restored = app.vault.restore_backup(&receipt.backup_id, &target).await.unwrap();

    assert!(restored.checksum_valid);
    assert_eq!(restored.restored_version.version_number, 1);
    assert_eq!(std::fs::read(&target).unwrap(), b"first upload");
}

#[tokio::test]
async fn test_unknown_backup_is_not_found() {
    let app = TestVault::new();
    let err = app
        .vault
        .restore_backup(&BackupId::new("backup_A1_v1_19700101_000000_000000"), &app.path("x"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
