//! Numerical utilities: the Levenberg–Marquardt solver and least-squares covariance.

pub mod covariance;
pub mod lm;

pub use covariance::*;
pub use lm::*;
