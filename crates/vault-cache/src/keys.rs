//! Cache key builders for all vault cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use vault_core::types::ArtifactId;

/// Prefix applied to all vault cache keys.
const PREFIX: &str = "vault";

/// Cache key for an artifact's version history.
pub fn history(artifact_id: &ArtifactId) -> String {
    format!("{PREFIX}:history:{artifact_id}")
}

/// Lock key guarding mutations of an artifact's history.
pub fn artifact_lock(artifact_id: &ArtifactId) -> String {
    format!("{PREFIX}:lock:{artifact_id}")
}
