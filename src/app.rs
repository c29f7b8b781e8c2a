//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - reads samples and runs the Gaussian fit
//! - prints the report and plots
//! - writes optional exports

use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use log::debug;

use crate::cli::{Command, FitArgs, PlotArgs, SynthArgs};
use crate::domain::{FitConfig, GaussianParams, SynthConfig};
use crate::error::{AppError, EXIT_INPUT};

pub mod pipeline;

/// Entry point for the `gaussfit` binary.
pub fn run() -> Result<(), AppError> {
    // `gaussfit FILE` is the classic single-argument form; clap needs a
    // subcommand name, so rewrite argv before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let _logger = init_logging(&cli.log_level)?;

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Plot(args) => handle_plot(args),
        Command::Synth(args) => handle_synth(args),
    }
}

/// Start the logger on stderr so stdout carries only the report.
///
/// `RUST_LOG` overrides `level` when set. Keep the handle alive for the run.
pub fn init_logging(level: &str) -> Result<LoggerHandle, AppError> {
    Logger::try_with_env_or_str(level)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid log level '{level}': {e}")))?
        .start()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Logger initialization failed: {e}")))
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    debug!("fit config: {config:?}");
    let run = pipeline::run_fit(&config)?;

    println!("{}", crate::report::format_run_header(&run.ingest));
    print!("{}", crate::report::format_fit_report(&run.summary));
    print!("{}", crate::report::format_diagnostics(&run.summary));

    // Exports happen before the (blocking) interactive view.
    if let Some(path) = &config.export_curve {
        crate::io::curve::write_curve_json(path, &run.summary, &run.ingest)?;
    }
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.residuals)?;
    }

    let title = run.ingest.path.display().to_string();
    if config.tui {
        crate::tui::run(crate::tui::FitView {
            title,
            samples: run.ingest.samples,
            summary: run.summary,
        })?;
    } else if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.ingest.samples,
            &run.summary.fit.params,
            config.plot_width,
            config.plot_height,
            &title,
        );
        println!();
        println!("{plot}");
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;
    let plot = crate::plot::render_curve_file(&curve, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let config = synth_config_from_args(&args);
    let samples = crate::data::generate_samples(&config)?;
    crate::data::write_samples(&args.out, &samples, &config)?;
    println!("Wrote {} samples to {}", samples.len(), args.out.display());
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        input: args.input.clone(),
        max_iterations: args.max_iterations,
        plot: !args.no_plot,
        tui: args.tui,
        plot_width: args.width,
        plot_height: args.height,
        export_curve: args.export_curve.clone(),
        export_results: args.export.clone(),
    }
}

pub fn synth_config_from_args(args: &SynthArgs) -> SynthConfig {
    SynthConfig {
        params: GaussianParams::new(args.x0, args.a, args.sigma),
        x_min: args.x_min,
        x_max: args.x_max,
        step: args.step,
        noise: args.noise,
        seed: args.seed,
    }
}

/// Rewrite argv so `gaussfit FILE` means `gaussfit fit FILE`.
///
/// Rules:
/// - `gaussfit FILE ...`                -> `gaussfit fit FILE ...`
/// - `gaussfit fit|plot|synth ...`      -> unchanged
/// - `gaussfit`, `--help/--version/-h`  -> unchanged (clap shows help/errors)
/// - leading global flags are skipped when looking for the first positional
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let mut idx = 1;
    while let Some(arg) = argv.get(idx) {
        if arg == "--log-level" {
            idx += 2;
            continue;
        }
        if arg.starts_with("--log-level=") {
            idx += 1;
            continue;
        }
        break;
    }

    let Some(arg) = argv.get(idx) else {
        return argv;
    };

    let is_subcommand = matches!(arg.as_str(), "fit" | "plot" | "synth" | "help");
    if is_subcommand || arg.starts_with('-') {
        return argv;
    }

    argv.insert(idx, "fit".to_string());
    argv
}
