//! # vault-storage
//!
//! Storage primitives for Artifact Vault: the local filesystem provider
//! backing both the version store and the backup store, streamed SHA-256
//! checksums, and the gzip codec used for stored versions and backup blobs.

pub mod checksum;
pub mod codec;
pub mod providers;

pub use providers::{LocalStorageProvider, write_atomic};
