//! On-disk encodings of stored version content.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// How a version's bytes are laid out in its stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Byte-for-byte copy of the original.
    Identity,
    /// Gzip stream of the original.
    Gzip,
}

impl Encoding {
    /// Pick the encoding for the compression feature flag.
    pub fn from_compression(enabled: bool) -> Self {
        if enabled { Self::Gzip } else { Self::Identity }
    }

    /// Whether the stored bytes differ from the original.
    pub fn is_compressed(self) -> bool {
        matches!(self, Self::Gzip)
    }

    /// File extension for a stored version whose original lives at `source`.
    ///
    /// Compressed versions always use `gz`; raw copies keep the source
    /// extension, falling back to `bin`.
    pub fn extension_for(self, source: &Path) -> String {
        match self {
            Self::Gzip => "gz".to_string(),
            Self::Identity => source
                .extension()
                .and_then(|e| e.to_str())
                .filter(|e| !e.is_empty())
                .map(|e| e.to_lowercase())
                .unwrap_or_else(|| "bin".to_string()),
        }
    }
}
