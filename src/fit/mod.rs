//! The growth-rate estimator.
//!
//! Responsibilities:
//!
//! - reduce a raw series to fit-eligible points (`filter`)
//! - fit a degree-5 smoothing spline and its analytic derivative (`spline`)
//! - select the peak growth rate and build the prediction line (`peak`)
//! - run the whole per-well pipeline (`estimator`)

pub mod estimator;
pub mod filter;
pub mod peak;
pub mod spline;

pub use estimator::*;
pub use filter::*;
pub use peak::*;
pub use spline::*;
