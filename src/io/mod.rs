//! Input/output helpers.
//!
//! - plate CSV ingest + validation (`ingest`)
//! - result-table exports (`export`)
//! - per-well curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use ingest::*;
