//! Backup creation, inspection, and restore.

pub mod archiver;

pub use archiver::BackupArchiver;
