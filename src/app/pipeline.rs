//! Shared "fit pipeline" logic.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! read samples -> initial estimate -> least-squares fit -> tail probability -> residuals
//!
//! Front-ends (text report, ASCII plot, TUI) focus on presentation.

use log::info;

use crate::domain::{FitConfig, FitSummary, SampleResidual};
use crate::error::FitError;
use crate::fit::{FitOptions, fit_samples};
use crate::io::ingest::{IngestedData, load_samples};
use crate::report::compute_residuals;

/// All computed outputs of a single `gaussfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub summary: FitSummary,
    pub residuals: Vec<SampleResidual>,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, FitError> {
    let ingest = load_samples(&config.input)?;
    run_fit_with_samples(config, ingest)
}

/// Execute the pipeline on already ingested samples.
pub fn run_fit_with_samples(config: &FitConfig, ingest: IngestedData) -> Result<RunOutput, FitError> {
    let opts = FitOptions::with_max_iterations(config.max_iterations);
    let summary = fit_samples(&ingest.samples, &opts)?;
    info!(
        "fit: x0={} a={} sigma={} (sse={:e}, {} iterations)",
        summary.fit.params.x0,
        summary.fit.params.a,
        summary.fit.params.sigma,
        summary.fit.sse,
        summary.fit.iterations
    );

    let residuals = compute_residuals(&ingest.samples, &summary.fit.params)?;

    Ok(RunOutput {
        ingest,
        summary,
        residuals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GaussianParams;
    use crate::models::gaussian;
    use std::path::PathBuf;

    fn config(input: PathBuf) -> FitConfig {
        FitConfig {
            input,
            max_iterations: 200,
            plot: false,
            tui: false,
            plot_width: 80,
            plot_height: 24,
            export_curve: None,
            export_results: None,
        }
    }

    #[test]
    fn end_to_end_from_file() {
        let p = GaussianParams::new(5.0, 10.0, 2.0);
        let mut text = String::from("# noiseless bump\n\n");
        for i in 0..=10 {
            let x = f64::from(i);
            text.push_str(&format!("{x}\t{}\n", gaussian(x, &p)));
        }
        let path = std::env::temp_dir().join(format!("gaussfit_pipeline_{}.txt", std::process::id()));
        std::fs::write(&path, text).unwrap();

        let run = run_fit(&config(path.clone()));
        std::fs::remove_file(&path).ok();
        let run = run.unwrap();

        assert_eq!(run.ingest.samples.len(), 11);
        assert_eq!(run.residuals.len(), 11);
        let fit = &run.summary.fit.params;
        assert!((fit.x0 - 5.0).abs() < 1e-6);
        assert!((fit.a - 10.0).abs() < 1e-6);
        assert!((fit.sigma - 2.0).abs() < 1e-6);
        assert!(run.residuals.iter().all(|r| r.residual.abs() < 1e-6));
        assert_eq!(run.summary.x_max, 10.0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = run_fit(&config(PathBuf::from("/no/such/gaussfit/input.txt"))).unwrap_err();
        assert!(matches!(err, FitError::Io { .. }));
    }
}
