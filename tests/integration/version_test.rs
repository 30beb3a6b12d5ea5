//! Integration tests for version creation, restore, and retention.

use vault_core::error::ErrorKind;

use crate::helpers::{TestVault, artifact, report};

#[tokio::test]
async fn test_roundtrip_without_compression() {
    let app = TestVault::with_config(|c| c.storage.compression = false);
    let id = artifact("A1");
    let source = app.write_source("results.json", br#"{"passed": 12, "failed": 0}"#);

    let created = app.vault.create_version(&id, &source, "", "ci").await.unwrap();
    assert!(!created.version.compressed);
    assert_eq!(created.version.stored_path.extension().unwrap(), "json");

    let target = app.path("out.json");
    let restored = app.vault.restore_version(&id, 1, &target).await.unwrap();
    assert!(restored.checksum_valid);
    assert_eq!(std::fs::read(&target).unwrap(), std::fs::read(&source).unwrap());
}

#[tokio::test]
async fn test_compressed_version_is_smaller_on_disk() {
    let app = TestVault::new();
    let id = artifact("A1");
    let source = app.write_source("report.xml", &report(64 * 1024));

    let created = app.vault.create_version(&id, &source, "", "ci").await.unwrap();
    let stored = std::fs::metadata(&created.version.stored_path).unwrap().len();
    assert!(stored < created.version.size_bytes);
    assert!(created.version.stored_path.starts_with(app.version_root()));
}

#[tokio::test]
async fn test_history_survives_reopening() {
    let app = TestVault::new();
    let id = artifact("A1");
    let source = app.write_source("report.xml", b"one");
    app.vault.create_version(&id, &source, "", "ci").await.unwrap();

    let reopened = vault_service::ArtifactVault::new(&app.config).unwrap();
    let history = reopened.get_version_history(&id).await.unwrap();
    assert_eq!(history.len(), 1);

    std::fs::write(&source, b"two").unwrap();
    let next = reopened.create_version(&id, &source, "", "ci").await.unwrap();
    assert_eq!(next.version.version_number, 2);
}

#[tokio::test]
async fn test_retention_keeps_most_recent_and_never_reuses_numbers() {
    let app = TestVault::with_config(|c| {
        c.storage.max_versions_per_artifact = 3;
        c.storage.auto_backup = false;
    });
    let id = artifact("A1");
    let source = app.write_source("report.xml", b"");

    for n in 1..=5u32 {
        std::fs::write(&source, format!("run {n}")).unwrap();
        let created = app.vault.create_version(&id, &source, "", "ci").await.unwrap();
        assert_eq!(created.version.version_number, n);
    }

    let numbers: Vec<u32> = app
        .vault
        .list_versions(&id)
        .await
        .unwrap()
        .iter()
        .map(|v| v.version_number)
        .collect();
    assert_eq!(numbers, vec![3, 4, 5]);

    let err = app
        .vault
        .restore_version(&id, 1, &app.path("gone.xml"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    std::fs::write(&source, b"run 6").unwrap();
    let created = app.vault.create_version(&id, &source, "", "ci").await.unwrap();
    assert_eq!(created.version.version_number, 6);
    assert_eq!(created.retention.removed, vec![3]);
}

#[tokio::test]
async fn test_missing_source_fails_without_recording() {
    let app = TestVault::new();
    let id = artifact("A1");

    let err = app
        .vault
        .create_version(&id, &app.path("absent.xml"), "", "ci")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(app.vault.list_versions(&id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_compare_requires_both_versions() {
    let app = TestVault::new();
    let id = artifact("A1");
    let source = app.write_source("report.xml", b"one");
    app.vault.create_version(&id, &source, "", "ci").await.unwrap();

    let err = app.vault.compare_versions(&id, 1, 2).await.unwrap_err();
    assert!(err.is_not_found());

    let same = app.vault.compare_versions(&id, 1, 1).await.unwrap();
    assert_eq!(same.size_difference, 0);
    assert!(!same.checksum_changed);
}

#[tokio::test]
async fn test_artifacts_are_independent() {
    let app = TestVault::with_config(|c| c.storage.auto_backup = false);
    let a = artifact("A1");
    let b = artifact("B2");
    let source = app.write_source("report.xml", b"shared");

    let (first, second) = tokio::join!(
        app.vault.create_version(&a, &source, "", "ci"),
        app.vault.create_version(&b, &source, "", "ci"),
    );
    assert_eq!(first.unwrap().version.version_number, 1);
    assert_eq!(second.unwrap().version.version_number, 1);
}

#[tokio::test]
async fn test_manual_cleanup_after_lowering_bound() {
    let app = TestVault::with_config(|c| c.storage.auto_backup = false);
    let id = artifact("A1");
    let source = app.write_source("report.xml", b"");
    for n in 1..=4 {
        std::fs::write(&source, format!("run {n}")).unwrap();
        app.vault.create_version(&id, &source, "", "ci").await.unwrap();
    }

    let mut config = app.config.clone();
    config.storage.max_versions_per_artifact = 2;
    let stricter = vault_service::ArtifactVault::new(&config).unwrap();

    let report = stricter.cleanup_old_versions(&id).await.unwrap();
    assert_eq!(report.removed, vec![1, 2]);
    assert_eq!(report.retained, 2);
    assert_eq!(stricter.list_versions(&id).await.unwrap().len(), 2);
}
