//! Version domain entities.

pub mod history;
pub mod model;
pub mod outcome;

pub use history::VersionHistory;
pub use model::Version;
pub use outcome::{CreatedVersion, RestoreResult};
