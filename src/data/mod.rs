//! Data sources other than measurement files.

pub mod synth;

pub use synth::*;
