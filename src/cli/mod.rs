//! Command-line parsing for the Gaussian fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gaussfit", version, about = "Fit a Gaussian to two-column (x, y) sample data")]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace). `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a sample file, print parameters/covariance/tail probability, and plot.
    Fit(FitArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
    /// Write a synthetic (noisy) Gaussian sample file.
    Synth(SynthArgs),
}

/// Options for fitting a sample file.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Two-column text file of whitespace-separated `x y` pairs.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Show the interactive chart instead of the ASCII plot.
    #[arg(long)]
    pub tui: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 24)]
    pub height: usize,

    /// Solver iteration cap.
    #[arg(long, default_value_t = 200)]
    pub max_iterations: usize,

    /// Export the fitted curve (params + covariance + grid) to JSON.
    #[arg(long = "export-curve", value_name = "JSON")]
    pub export_curve: Option<PathBuf>,

    /// Export per-sample fitted values and residuals to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

/// Options for plotting a saved curve.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Curve JSON file produced by `gaussfit fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 24)]
    pub height: usize,
}

/// Options for synthetic sample generation.
#[derive(Debug, Parser)]
pub struct SynthArgs {
    /// Output file.
    #[arg(long, value_name = "FILE")]
    pub out: PathBuf,

    /// Peak location.
    #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
    pub x0: f64,

    /// Peak amplitude.
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub a: f64,

    /// Width (standard deviation).
    #[arg(long, default_value_t = 2.0)]
    pub sigma: f64,

    /// First x value.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub x_min: f64,

    /// Last x value.
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub x_max: f64,

    /// Grid spacing.
    #[arg(long, default_value_t = 1.0)]
    pub step: f64,

    /// Standard deviation of additive noise on y (0 = noiseless).
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fit_with_defaults() {
        let cli = Cli::parse_from(["gaussfit", "fit", "data.txt"]);
        assert_eq!(cli.log_level, "warn");
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.input, PathBuf::from("data.txt"));
        assert!(!args.no_plot && !args.tui);
        assert_eq!(args.max_iterations, 200);
        assert!(args.export_curve.is_none());
    }

    #[test]
    fn parses_synth_with_negative_numbers() {
        let cli = Cli::parse_from(["gaussfit", "synth", "--out", "s.txt", "--x0", "-3", "--x-min", "-10", "--noise", "0.5"]);
        let Command::Synth(args) = cli.command else {
            panic!("expected synth");
        };
        assert_eq!(args.x0, -3.0);
        assert_eq!(args.x_min, -10.0);
        assert_eq!(args.noise, 0.5);
        assert_eq!(args.seed, 42);
    }
}
