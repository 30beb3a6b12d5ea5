//! Version creation and restoration.

pub mod restore;
pub mod store;

pub use restore::RestoreEngine;
pub use store::VersionStore;
