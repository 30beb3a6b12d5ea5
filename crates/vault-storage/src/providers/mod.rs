//! Storage provider implementations.

pub mod local;

pub use local::{LocalStorageProvider, write_atomic};
