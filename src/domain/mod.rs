//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - sample observations (`Sample`, `SampleStats`)
//! - model parameters and fit outputs (`GaussianParams`, `FitResult`, `FitSummary`)
//! - run configuration (`FitConfig`, `SynthConfig`)
//! - the portable curve file (`CurveFile`)

pub mod types;

pub use types::*;
