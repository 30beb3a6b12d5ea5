//! Gzip codec for stored versions and backup blobs.
//!
//! File-to-file transforms stream through `flate2` on the blocking thread
//! pool so large artifacts never sit in memory. Buffer helpers are used for
//! backup blobs, which are built in memory anyway.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::types::Encoding;

/// Gzip-compress a buffer.
pub fn gzip_compress(data: &[u8]) -> AppResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompress a gzip buffer.
pub fn gzip_decompress(data: &[u8]) -> AppResult<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| AppError::with_source(ErrorKind::Integrity, "Corrupt gzip stream", e))?;
    Ok(decompressed)
}

/// Streaming reader over a gzip buffer.
pub fn gzip_reader(data: &[u8]) -> impl Read + '_ {
    GzDecoder::new(data)
}

/// Copy `source` to `target`, applying `encoding`.
///
/// Returns the size of `target` in bytes.
pub async fn encode_file(source: &Path, target: &Path, encoding: Encoding) -> AppResult<u64> {
    let (source, target) = (source.to_path_buf(), target.to_path_buf());
    run_blocking(move || encode_blocking(&source, &target, encoding)).await
}

/// Copy `source` to `target`, reversing `encoding`.
///
/// Returns the number of decoded bytes written to `target`.
pub async fn decode_file(source: &Path, target: &Path, encoding: Encoding) -> AppResult<u64> {
    let (source, target) = (source.to_path_buf(), target.to_path_buf());
    run_blocking(move || decode_blocking(&source, &target, encoding)).await
}

fn encode_blocking(source: &Path, target: &Path, encoding: Encoding) -> AppResult<u64> {
    let mut reader = BufReader::new(open_source(source)?);
    let writer = BufWriter::new(create_target(target)?);

    match encoding {
        Encoding::Identity => {
            let mut writer = writer;
            io::copy(&mut reader, &mut writer)?;
            finish(writer, target)?;
        }
        Encoding::Gzip => {
            let mut encoder = GzEncoder::new(writer, Compression::default());
            io::copy(&mut reader, &mut encoder)?;
            finish(encoder.finish()?, target)?;
        }
    }

    Ok(std::fs::metadata(target)?.len())
}

fn decode_blocking(source: &Path, target: &Path, encoding: Encoding) -> AppResult<u64> {
    let reader = BufReader::new(open_source(source)?);
    let mut writer = BufWriter::new(create_target(target)?);

    let written = match encoding {
        Encoding::Identity => {
            let mut reader = reader;
            io::copy(&mut reader, &mut writer)?
        }
        Encoding::Gzip => {
            let mut decoder = GzDecoder::new(reader);
            io::copy(&mut decoder, &mut writer).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Integrity,
                    format!("Failed to decompress {}", source.display()),
                    e,
                )
            })?
        }
    };

    finish(writer, target)?;
    Ok(written)
}

fn open_source(path: &Path) -> AppResult<File> {
    File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            AppError::not_found(format!("File not found: {}", path.display()))
        } else {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to open {}", path.display()),
                e,
            )
        }
    })
}

fn create_target(path: &Path) -> AppResult<File> {
    File::create(path).map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to create {}", path.display()),
            e,
        )
    })
}

fn finish(writer: BufWriter<File>, target: &Path) -> AppResult<()> {
    let file = writer.into_inner().map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to flush {}", target.display()),
            e.into_error(),
        )
    })?;
    file.sync_all()?;
    Ok(())
}

async fn run_blocking<F>(task: F) -> AppResult<u64>
where
    F: FnOnce() -> AppResult<u64> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::internal(format!("Codec task failed: {e}")))?
}

/// Temporary sibling path used while a file is being written.
pub fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
}
