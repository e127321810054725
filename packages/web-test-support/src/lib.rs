//! Test support shared by the workspace crates
//!
//! Unified logging initialization plus helpers for unique test data.

pub mod test_logging;
pub mod unique;

pub use unique::unique_str;
