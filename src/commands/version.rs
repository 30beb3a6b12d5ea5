//! Version commands: create, restore, history, compare, cleanup.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use vault_core::result::AppResult;
use vault_core::types::ArtifactId;
use vault_entity::{BackupStatus, RetentionReport, Version};
use vault_service::ArtifactVault;

use crate::output::{self, OutputFormat};

/// Arguments for `create`
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Artifact identifier
    pub artifact: ArtifactId,
    /// File to capture
    pub source: PathBuf,
    /// Description of the change
    #[arg(short, long, default_value = "")]
    pub description: String,
    /// Author recorded on the version
    #[arg(short, long, default_value = "")]
    pub author: String,
}

/// Arguments for `restore`
#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// Artifact identifier
    pub artifact: ArtifactId,
    /// Version number to restore
    pub version: u32,
    /// Where to write the restored file
    pub target: PathBuf,
}

/// Arguments for `history`
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Artifact identifier
    pub artifact: ArtifactId,
}

/// Arguments for `compare`
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Artifact identifier
    pub artifact: ArtifactId,
    /// Version to compare from
    pub from: u32,
    /// Version to compare to
    pub to: u32,
}

/// Arguments for `cleanup`
#[derive(Debug, Args)]
pub struct CleanupArgs {
    /// Artifact identifier
    pub artifact: ArtifactId,
}

/// Version display row
#[derive(Debug, Serialize, Tabled)]
struct VersionRow {
    /// Version number
    version: u32,
    /// Creation time
    created: String,
    /// Author
    author: String,
    /// Original size
    size: String,
    /// Stored gzip-compressed
    compressed: String,
    /// Checksum prefix
    checksum: String,
    /// Description
    description: String,
}

impl From<&Version> for VersionRow {
    fn from(v: &Version) -> Self {
        Self {
            version: v.version_number,
            created: v.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            author: v.created_by.clone(),
            size: output::format_bytes(v.size_bytes),
            compressed: output::flag(v.compressed),
            checksum: v.checksum.chars().take(12).collect(),
            description: v.description.clone(),
        }
    }
}

/// Execute `create`
pub async fn create(args: &CreateArgs, vault: &ArtifactVault, format: OutputFormat) -> AppResult<()> {
    let created = vault
        .create_version(&args.artifact, &args.source, &args.description, &args.author)
        .await?;

    output::print_item(&created, format, |created| {
        let v = &created.version;
        output::print_success(&format!(
            "Recorded version {} of {}",
            v.version_number, v.artifact_id
        ));
        output::print_kv("Version ID", v.version_id.as_str());
        output::print_kv("Checksum", &v.checksum);
        output::print_kv("Size", &output::format_bytes(v.size_bytes));
        output::print_kv("Stored at", &v.stored_path.display().to_string());
        match &created.backup {
            BackupStatus::Created(receipt) => {
                output::print_kv("Backup", receipt.backup_id.as_str());
            }
            BackupStatus::Disabled => output::print_kv("Backup", "disabled"),
            BackupStatus::Failed { reason } => {
                output::print_warning(&format!("Backup failed: {reason}"));
            }
        }
        print_retention(&created.retention);
    });
    Ok(())
}

/// Execute `restore`
pub async fn restore(args: &RestoreArgs, vault: &ArtifactVault, format: OutputFormat) -> AppResult<()> {
    let result = vault
        .restore_version(&args.artifact, args.version, &args.target)
        .await?;

    output::print_item(&result, format, |result| {
        if result.checksum_valid {
            output::print_success(&format!(
                "Restored version {} to {}",
                result.restored_version.version_number,
                result.target_path.display()
            ));
        } else {
            output::print_warning(&format!(
                "Restored version {} to {}, but its checksum does not match",
                result.restored_version.version_number,
                result.target_path.display()
            ));
            output::print_kv("Expected", &result.restored_version.checksum);
            output::print_kv("Actual", &result.restored_checksum);
        }
        output::print_kv("Bytes written", &result.bytes_written.to_string());
    });
    Ok(())
}

/// Execute `history`
pub async fn history(args: &HistoryArgs, vault: &ArtifactVault, format: OutputFormat) -> AppResult<()> {
    let history = vault.get_version_history(&args.artifact).await?;

    match format {
        OutputFormat::Json => output::print_item(&history, format, |_| {}),
        OutputFormat::Table => {
            output::print_kv("Artifact", history.artifact_id.as_str());
            output::print_kv("Versions", &history.len().to_string());
            output::print_kv(
                "Latest number",
                &history.latest_version_number.to_string(),
            );
            if let Some(updated) = history.last_updated {
                output::print_kv("Last updated", &updated.to_rfc3339());
            }
            let rows: Vec<VersionRow> = history.versions.iter().map(VersionRow::from).collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}

/// Execute `compare`
pub async fn compare(args: &CompareArgs, vault: &ArtifactVault, format: OutputFormat) -> AppResult<()> {
    let diff = vault
        .compare_versions(&args.artifact, args.from, args.to)
        .await?;

    output::print_item(&diff, format, |diff| {
        println!("{}", diff.summary);
        output::print_kv("Size difference", &output::format_delta(diff.size_difference));
        output::print_kv("Minutes apart", &diff.time_difference.to_string());
        output::print_kv("Checksum changed", &diff.checksum_changed.to_string());
    });
    Ok(())
}

/// Execute `cleanup`
pub async fn cleanup(args: &CleanupArgs, vault: &ArtifactVault, format: OutputFormat) -> AppResult<()> {
    let report = vault.cleanup_old_versions(&args.artifact).await?;
    output::print_item(&report, format, print_retention);
    Ok(())
}

fn print_retention(report: &RetentionReport) {
    if report.is_noop() {
        output::print_kv("Retention", &format!("{} versions kept", report.retained));
        return;
    }
    if !report.removed.is_empty() {
        output::print_success(&format!(
            "Removed versions {:?} of {}",
            report.removed, report.artifact_id
        ));
    }
    if !report.failed.is_empty() {
        output::print_warning(&format!(
            "Could not remove versions {:?}; they remain in the history",
            report.failed
        ));
    }
    output::print_kv("Retained", &report.retained.to_string());
}
