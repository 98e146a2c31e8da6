//! Data sources.
//!
//! Real runs ingest a plate CSV (`crate::io::ingest`); this module provides
//! the seeded synthetic plate used by `odg sample` for demos and validation.

pub mod sample;

pub use sample::*;
