//! CLI command definitions and dispatch.

pub mod backup;
pub mod stats;
pub mod version;

use clap::{Parser, Subcommand};

use vault_core::result::AppResult;
use vault_service::ArtifactVault;

use crate::output::OutputFormat;

/// Artifact Vault: versioned artifact storage with backups
#[derive(Debug, Parser)]
#[command(name = "vault", version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a file as the next version of an artifact
    Create(version::CreateArgs),
    /// Restore a version to a path
    Restore(version::RestoreArgs),
    /// Show an artifact's version history
    History(version::HistoryArgs),
    /// Compare two versions of an artifact
    Compare(version::CompareArgs),
    /// Back up a recorded version
    Backup(backup::BackupArgs),
    /// List stored backups
    Backups(backup::ListArgs),
    /// Restore a file from a backup
    BackupRestore(backup::RestoreArgs),
    /// Prune versions beyond the retention bound
    Cleanup(version::CleanupArgs),
    /// Show storage usage
    Stats,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, vault: &ArtifactVault) -> AppResult<()> {
        match &self.command {
            Commands::Create(args) => version::create(args, vault, self.format).await,
            Commands::Restore(args) => version::restore(args, vault, self.format).await,
            Commands::History(args) => version::history(args, vault, self.format).await,
            Commands::Compare(args) => version::compare(args, vault, self.format).await,
            Commands::Backup(args) => backup::backup(args, vault, self.format).await,
            Commands::Backups(args) => backup::list(args, vault, self.format).await,
            Commands::BackupRestore(args) => backup::restore(args, vault, self.format).await,
            Commands::Cleanup(args) => version::cleanup(args, vault, self.format).await,
            Commands::Stats => stats::execute(vault, self.format).await,
        }
    }
}
