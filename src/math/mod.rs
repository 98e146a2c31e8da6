//! Mathematical utilities: B-spline primitives and penalized least squares.

pub mod bspline;
pub mod lsq;

pub use bspline::*;
pub use lsq::*;
