//! The Gaussian peak model.
//!
//! Implemented as small, pure functions so that fitting, reporting and
//! plotting code can share them.

pub mod model;

pub use model::*;
