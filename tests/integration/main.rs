//! Integration tests for Artifact Vault, driven through the `ArtifactVault` facade.

mod backup_test;
mod helpers;
mod scenario_test;
mod stats_test;
mod version_test;
