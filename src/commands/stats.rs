//! Storage statistics command.

use vault_core::result::AppResult;
use vault_service::ArtifactVault;

use crate::output::{self, OutputFormat};

/// Execute `stats`
pub async fn execute(vault: &ArtifactVault, format: OutputFormat) -> AppResult<()> {
    let stats = vault.get_storage_statistics().await;
    let settings = vault.settings();

    output::print_item(&stats, format, |stats| {
        output::print_kv(
            "Versions",
            &format!(
                "{} files, {} ({})",
                stats.version_file_count,
                output::format_bytes(stats.version_storage_size),
                settings.version_root
            ),
        );
        output::print_kv(
            "Backups",
            &format!(
                "{} files, {} ({})",
                stats.backup_file_count,
                output::format_bytes(stats.backup_storage_size),
                settings.backup_root
            ),
        );
        output::print_kv("Total", &output::format_bytes(stats.total_storage_size));
        output::print_kv("Compression", &stats.compression_enabled.to_string());
        output::print_kv("Auto-backup", &stats.auto_backup_enabled.to_string());
        output::print_kv(
            "Max versions",
            &settings.max_versions_per_artifact.to_string(),
        );
    });
    Ok(())
}
