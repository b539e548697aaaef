//! Reporting utilities: terminal text and JSON output.

pub mod format;

pub use format::*;
