//! Test Utilities
//!
//! Shared fixtures for the standalone test targets. Each target pulls
//! this module in with a `#[path]` attribute.

pub mod fixtures;

pub use fixtures::{sample_markdown, DeclineAll, RecordingSurface, StaticDocument};
