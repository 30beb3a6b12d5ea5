//! Per-artifact version history index.

pub mod index;

pub use index::HistoryIndex;
