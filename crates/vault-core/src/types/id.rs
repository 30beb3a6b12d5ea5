//! Newtype wrappers around `String` for vault identifiers.
//!
//! Using distinct types prevents accidentally passing a `BackupId` where a
//! `VersionId` is expected. [`ArtifactId`] is validated on construction and
//! on deserialization because it names a directory on disk.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted artifact identifier.
pub const MAX_ARTIFACT_ID_LEN: usize = 128;

/// Macro to define a newtype key wrapper around `String`.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an already generated key.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_key!(
    /// Identifier of one stored version, e.g. `A1_v3_20250101_120000`.
    VersionId
);

define_key!(
    /// Identifier of one backup blob, e.g. `backup_A1_v3_20250101_120000_123456`.
    BackupId
);

/// Opaque identifier of an externally owned artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Validate and wrap an artifact identifier.
    ///
    /// The id must be non-empty, at most [`MAX_ARTIFACT_ID_LEN`] characters,
    /// and free of path separators, `..`, and control characters.
    pub fn parse(value: impl Into<String>) -> Result<Self, AppError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::validation("Artifact id must not be empty"));
        }
        if value.chars().count() > MAX_ARTIFACT_ID_LEN {
            return Err(AppError::validation(format!(
                "Artifact id exceeds {MAX_ARTIFACT_ID_LEN} characters"
            )));
        }
        if value == "." || value.contains("..") {
            return Err(AppError::validation(format!(
                "Artifact id must not contain '..': {value}"
            )));
        }
        if value
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control())
        {
            return Err(AppError::validation(format!(
                "Artifact id contains a path separator or control character: {value:?}"
            )));
        }
        Ok(Self(value))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArtifactId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ArtifactId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> String {
        id.0
    }
}
