//! Core type definitions used across the vault workspace.

pub mod encoding;
pub mod id;

pub use encoding::Encoding;
pub use id::*;
