//! Gaussian fitting.
//!
//! Responsibilities:
//!
//! - derive a start point from the raw samples (`estimate`)
//! - refine it by nonlinear least squares and estimate covariance (`fitter`)
//! - evaluate tail probabilities under the fitted curve (`tail`)

pub mod estimate;
pub mod fitter;
pub mod tail;

pub use estimate::*;
pub use fitter::*;
pub use tail::*;
