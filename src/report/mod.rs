//! Reporting: run summary and the per-well result table.

pub mod format;

pub use format::*;
