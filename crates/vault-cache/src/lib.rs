//! # vault-cache
//!
//! Cache support for Artifact Vault:
//!
//! - **memory**: bounded in-process cache using [moka](https://crates.io/crates/moka)
//! - **locks**: keyed async mutexes serializing mutations of one artifact
//!
//! The provider is selected at runtime based on configuration.

pub mod keys;
pub mod locks;
pub mod memory;
pub mod provider;

pub use locks::KeyedLocks;
pub use provider::CacheManager;
