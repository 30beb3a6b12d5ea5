//! SHA-256 content checksums, rendered as lowercase hex.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;

const BUFFER_SIZE: usize = 8192;

/// Hash a file by streaming it through SHA-256.
pub async fn sha256_file(path: &Path) -> AppResult<String> {
    let mut file = tokio::fs::File::open(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found(format!("File not found: {}", path.display()))
        } else {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to open file for hashing: {}", path.display()),
                e,
            )
        }
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let read = file.read(&mut buffer).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read file for hashing: {}", path.display()),
                e,
            )
        })?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hash an in-memory buffer.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
