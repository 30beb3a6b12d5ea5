//! Backup commands: backup, backups, backup-restore.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use vault_core::result::AppResult;
use vault_core::types::{ArtifactId, BackupId};
use vault_entity::BackupReceipt;
use vault_service::ArtifactVault;

use crate::output::{self, OutputFormat};

/// Arguments for `backup`
#[derive(Debug, Args)]
pub struct BackupArgs {
    /// Artifact identifier
    pub artifact: ArtifactId,
    /// Version to back up; the latest when omitted
    #[arg(short, long)]
    pub version: Option<u32>,
}

/// Arguments for `backups`
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only list backups of this artifact
    #[arg(short, long)]
    pub artifact: Option<ArtifactId>,
}

/// Arguments for `backup-restore`
#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// Backup identifier
    pub backup_id: String,
    /// Where to write the restored file
    pub target: PathBuf,
}

/// Backup display row
#[derive(Debug, Serialize, Tabled)]
struct BackupRow {
    /// Backup ID
    backup_id: String,
    /// Artifact
    artifact: String,
    /// Version number
    version: u32,
    /// Blob size
    size: String,
    /// Original bytes embedded
    content: String,
    /// Creation time
    created: String,
}

impl From<&BackupReceipt> for BackupRow {
    fn from(r: &BackupReceipt) -> Self {
        Self {
            backup_id: r.backup_id.to_string(),
            artifact: r.artifact_id.to_string(),
            version: r.version_number,
            size: output::format_bytes(r.size_bytes),
            content: output::flag(r.content_embedded),
            created: r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Execute `backup`
pub async fn backup(args: &BackupArgs, vault: &ArtifactVault, format: OutputFormat) -> AppResult<()> {
    let receipt = vault.backup_version(&args.artifact, args.version).await?;

    output::print_item(&receipt, format, |receipt| {
        output::print_success(&format!(
            "Backed up version {} of {}",
            receipt.version_number, receipt.artifact_id
        ));
        output::print_kv("Backup ID", receipt.backup_id.as_str());
        output::print_kv("Path", &receipt.backup_path.display().to_string());
        output::print_kv("Size", &output::format_bytes(receipt.size_bytes));
        if !receipt.content_embedded {
            output::print_warning("Source file was missing; the backup holds metadata only");
        }
    });
    Ok(())
}

/// Execute `backups`
pub async fn list(args: &ListArgs, vault: &ArtifactVault, format: OutputFormat) -> AppResult<()> {
    let receipts = vault.list_backups(args.artifact.as_ref()).await?;
    match format {
        OutputFormat::Json => output::print_item(&receipts, format, |_| {}),
        OutputFormat::Table => {
            let rows: Vec<BackupRow> = receipts.iter().map(BackupRow::from).collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}

/// Execute `backup-restore`
pub async fn restore(args: &RestoreArgs, vault: &ArtifactVault, format: OutputFormat) -> AppResult<()> {
    let backup_id = BackupId::new(args.backup_id.clone());
    let result = vault.restore_backup(&backup_id, &args.target).await?;

    output::print_item(&result, format, |result| {
        if result.checksum_valid {
            output::print_success(&format!(
                "Restored backup {backup_id} to {}",
                result.target_path.display()
            ));
        } else {
            output::print_warning(&format!(
                "Restored backup {backup_id} to {}, but its checksum does not match",
                result.target_path.display()
            ));
        }
        output::print_kv(
            "Version",
            &format!(
                "{} v{}",
                result.restored_version.artifact_id, result.restored_version.version_number
            ),
        );
        output::print_kv("Bytes written", &result.bytes_written.to_string());
    });
    Ok(())
}
