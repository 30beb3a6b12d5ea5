//! End-to-end walk through the main version lifecycle of one artifact.

use crate::helpers::{TestVault, artifact, report};

#[tokio::test]
async fn test_two_versions_compare_and_restore() {
    let app = TestVault::new();
    let id = artifact("A1");
    let source = app.write_source("report.xml", &report(100));

    let first = app
        .vault
        .create_version(&id, &source, "initial", "alice")
        .await
        .unwrap();
    assert_eq!(first.version.version_number, 1);
    assert_eq!(first.version.size_bytes, 100);
    assert_eq!(first.version.created_by, "alice");
    assert_eq!(first.version.description, "initial");
    assert!(first.backup.receipt().is_some());

    std::fs::write(&source, report(150)).unwrap();
    let second = app
        .vault
        .create_version(&id, &source, "rerun", "alice")
        .await
        .unwrap();
    assert_eq!(second.version.version_number, 2);
    assert_eq!(second.version.size_bytes, 150);

    let diff = app.vault.compare_versions(&id, 1, 2).await.unwrap();
    assert_eq!(diff.size_difference, 50);
    assert!(diff.checksum_changed);
    assert_eq!(diff.summary, "Version 1 → 2: +50 bytes, content changed");

    let target = app.path("restored/report.xml");
    let restored = app.vault.restore_version(&id, 1, &target).await.unwrap();
    assert!(restored.checksum_valid);
    assert_eq!(restored.bytes_written, 100);
    assert_eq!(std::fs::read(&target).unwrap(), report(100));

    let history = app.vault.get_version_history(&id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.last_updated.is_some());
}
