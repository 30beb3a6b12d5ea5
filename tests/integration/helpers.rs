//! Shared test helpers for integration tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use vault_core::config::AppConfig;
use vault_core::types::ArtifactId;
use vault_service::ArtifactVault;

/// Test vault rooted in a temporary directory
pub struct TestVault {
    /// The vault under test
    pub vault: ArtifactVault,
    /// Configuration it was built from
    pub config: AppConfig,
    /// Temporary directory holding both stores and scratch files
    pub dir: TempDir,
}

impl TestVault {
    /// Create a vault with default settings
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a vault after adjusting the default configuration
    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = AppConfig::default();
        config.storage.version_root = dir.path().join("versions").display().to_string();
        config.storage.backup_root = dir.path().join("backups").display().to_string();
        adjust(&mut config);

        let vault = ArtifactVault::new(&config).expect("Failed to open vault");
        Self { vault, config, dir }
    }

    /// Path inside the scratch area
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join("scratch").join(name)
    }

    /// Write `content` to a scratch file and return its path
    pub fn write_source(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::create_dir_all(path.parent().expect("scratch path has a parent"))
            .expect("Failed to create scratch dir");
        std::fs::write(&path, content).expect("Failed to write source file");
        path
    }

    /// Version store root
    pub fn version_root(&self) -> &Path {
        Path::new(&self.config.storage.version_root)
    }
}

/// Parse an artifact id
pub fn artifact(id: &str) -> ArtifactId {
    ArtifactId::parse(id).expect("valid artifact id")
}

/// Deterministic report body of exactly `len` bytes
pub fn report(len: usize) -> Vec<u8> {
    b"<testcase name=\"login\" status=\"passed\"/>\n"
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}
