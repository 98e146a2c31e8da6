//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration enums (`FilterKind`, `RateMode`, `TimeUnit`)
//! - the validated plate model (`Plate`, `WellSeries`, `WellId`)
//! - estimator outputs (`GrowthEstimate`, `WellFit`, `PredictionLine`)

pub mod types;

pub use types::*;
