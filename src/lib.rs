//! `gaussfit` library crate.
//!
//! The binary (`gaussfit`) is a thin wrapper around this library so that:
//!
//! - the fitting core is testable without spawning processes
//! - the reader, fitter and reporters can be reused on their own

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
