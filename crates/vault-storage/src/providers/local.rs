//! Local filesystem storage provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::traits::storage::{StorageObjectMeta, StorageProvider, StorageUsage};
use vault_core::types::Encoding;

use crate::codec;

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored files.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    ///
    /// The root is created lazily by the first write, so a provider for a
    /// store that has never been written reports empty usage.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root_path.into(),
        }
    }

    /// Resolve a relative path to an absolute path within the root.
    fn resolve(&self, path: &str) -> PathBuf {
        let clean = path.trim_start_matches('/');
        self.root.join(clean)
    }

}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, path: &str) -> PathBuf {
        self.resolve(path)
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path);
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read file: {path}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        write_atomic(&self.resolve(path), &data).await?;
        debug!(path, bytes = data.len(), "Wrote file");
        Ok(())
    }

    async fn import_file(&self, path: &str, source: &Path, encoding: Encoding) -> AppResult<u64> {
        let full_path = self.resolve(path);
        ensure_parent(&full_path).await?;

        let temp = codec::temp_sibling(&full_path);
        let stored = match codec::encode_file(source, &temp, encoding).await {
            Ok(stored) => stored,
            Err(e) => {
                discard(&temp).await;
                return Err(e);
            }
        };
        commit(&temp, &full_path).await?;

        debug!(path, source = %source.display(), bytes = stored, ?encoding, "Imported file");
        Ok(stored)
    }

    async fn export_file(&self, path: &str, encoding: Encoding, target: &Path) -> AppResult<u64> {
        let full_path = self.resolve(path);
        if !fs::try_exists(&full_path).await.unwrap_or(false) {
            return Err(AppError::not_found(format!("File not found: {path}")));
        }
        ensure_parent(target).await?;

        let temp = codec::temp_sibling(target);
        let written = match codec::decode_file(&full_path, &temp, encoding).await {
            Ok(written) => written,
            Err(e) => {
                discard(&temp).await;
                return Err(e);
            }
        };
        commit(&temp, target).await?;

        debug!(path, target = %target.display(), bytes = written, ?encoding, "Exported file");
        Ok(written)
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path);
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {path}"),
                e,
            )),
        }
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path);
        fs::try_exists(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to check existence: {path}"),
                e,
            )
        })
    }

    async fn list(&self, path: &str) -> AppResult<Vec<StorageObjectMeta>> {
        let full_path = self.resolve(path);
        let mut dir = match fs::read_dir(&full_path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to list directory: {path}"),
                    e,
                ));
            }
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let entry_meta = entry.metadata().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to get entry metadata", e)
            })?;

            let name = entry.file_name().to_string_lossy().to_string();
            let entry_path = if path.is_empty() || path == "/" {
                name
            } else {
                format!("{}/{}", path.trim_end_matches('/'), name)
            };

            entries.push(StorageObjectMeta {
                path: entry_path,
                size_bytes: entry_meta.len(),
                last_modified: entry_meta
                    .modified()
                    .ok()
                    .map(chrono::DateTime::<chrono::Utc>::from),
                is_directory: entry_meta.is_dir(),
            });
        }

        entries.sort_by(|a, b| {
            b.is_directory
                .cmp(&a.is_directory)
                .then(a.path.cmp(&b.path))
        });

        Ok(entries)
    }

    async fn usage(&self) -> AppResult<StorageUsage> {
        let mut usage = StorageUsage::default();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) if dir == self.root => {
                    return Err(AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to walk {}", dir.display()),
                        e,
                    ));
                }
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                    continue;
                }
            };

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        warn!(dir = %dir.display(), error = %e, "Stopped reading directory");
                        break;
                    }
                };
                let file_type = match entry.file_type().await {
                    Ok(file_type) => file_type,
                    Err(e) => {
                        warn!(path = %entry.path().display(), error = %e, "Skipping entry");
                        continue;
                    }
                };

                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    usage.file_count += 1;
                    usage.total_bytes += entry.metadata().await.map(|m| m.len()).unwrap_or(0);
                }
            }
        }

        Ok(usage)
    }
}

/// Write `data` to `target` through a temporary sibling and a rename.
///
/// Creates missing parent directories. On failure the temporary file is
/// removed and `target` is left as it was.
pub async fn write_atomic(target: &Path, data: &[u8]) -> AppResult<()> {
    ensure_parent(target).await?;

    let temp = codec::temp_sibling(target);
    let written = async {
        let mut file = fs::File::create(&temp).await?;
        file.write_all(data).await?;
        file.sync_all().await
    }
    .await;

    if let Err(e) = written {
        discard(&temp).await;
        return Err(AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to write {}", target.display()),
            e,
        ));
    }
    commit(&temp, target).await
}

/// Move a finished temp file onto its final path, removing it on failure.
async fn commit(temp: &Path, target: &Path) -> AppResult<()> {
    if let Err(e) = fs::rename(temp, target).await {
        discard(temp).await;
        return Err(AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to move {} into place", target.display()),
            e,
        ));
    }
    Ok(())
}

async fn ensure_parent(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create parent directory: {}", parent.display()),
                e,
            )
        })?;
    }
    Ok(())
}

async fn discard(temp: &Path) {
    if let Err(e) = fs::remove_file(temp).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %temp.display(), error = %e, "Failed to remove temp file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(dir: &tempfile::TempDir) -> LocalStorageProvider {
        LocalStorageProvider::new(dir.path().join("store"))
    }

    #[tokio::test]
    async fn test_write_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir);

        let data = Bytes::from("hello world");
        provider.write("A1/history.json", data.clone()).await.unwrap();
        assert!(provider.exists("A1/history.json").await.unwrap());

        let read_back = provider.read_bytes("A1/history.json").await.unwrap();
        assert_eq!(read_back, data);

        provider.delete("A1/history.json").await.unwrap();
        assert!(!provider.exists("A1/history.json").await.unwrap());
        provider.delete("A1/history.json").await.unwrap();
    }

    #[tokio::test]
    async fn test_write_replaces_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir);

        provider.write("doc.json", Bytes::from("one")).await.unwrap();
        provider.write("doc.json", Bytes::from("two")).await.unwrap();

        assert_eq!(provider.read_bytes("doc.json").await.unwrap(), Bytes::from("two"));
        let entries = provider.list("").await.unwrap();
        assert_eq!(entries.len(), 1, "temp files must not survive: {entries:?}");
    }

    #[tokio::test]
    async fn test_import_export_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir);
        let source = dir.path().join("report.xml");
        let content = "<testsuite tests=\"3\"/>\n".repeat(40);
        tokio::fs::write(&source, &content).await.unwrap();

        let stored = provider
            .import_file("A1/v1.gz", &source, Encoding::Gzip)
            .await
            .unwrap();
        assert!(stored < content.len() as u64);

        let target = dir.path().join("out/restored.xml");
        let written = provider
            .export_file("A1/v1.gz", Encoding::Gzip, &target)
            .await
            .unwrap();
        assert_eq!(written, content.len() as u64);
        assert_eq!(tokio::fs::read_to_string(&target).await.unwrap(), content);
    }

    #[tokio::test]
    async fn test_import_missing_source_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir);

        let err = provider
            .import_file("A1/v1.gz", &dir.path().join("absent.xml"), Encoding::Gzip)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(provider.list("A1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir);
        let err = provider
            .export_file("A1/none.gz", Encoding::Gzip, &dir.path().join("t"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_directories_first() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir);

        provider.write("listdir/a.txt", Bytes::from("a")).await.unwrap();
        provider.write("listdir/b.txt", Bytes::from("b")).await.unwrap();
        provider.write("listdir/subdir/c.txt", Bytes::from("c")).await.unwrap();

        let entries = provider.list("listdir").await.unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_directory);
        assert!(provider.list("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_atomic_replaces_external_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("restored/report.xml");

        write_atomic(&target, b"first").await.unwrap();
        write_atomic(&target, b"second").await.unwrap();

        assert_eq!(tokio::fs::read(&target).await.unwrap(), b"second");
        let names: Vec<_> = std::fs::read_dir(dir.path().join("restored"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("report.xml")]);
    }

    #[tokio::test]
    async fn test_usage_walks_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir);
        assert_eq!(provider.usage().await.unwrap(), StorageUsage::default());

        provider.write("A1/one", Bytes::from("12345")).await.unwrap();
        provider.write("A1/two", Bytes::from("123")).await.unwrap();
        provider.write("B2/deep/three", Bytes::from("1")).await.unwrap();

        let usage = provider.usage().await.unwrap();
        assert_eq!(usage.file_count, 3);
        assert_eq!(usage.total_bytes, 9);
    }
}
