//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fit:
//! - fitted parameters, covariance, SSE and tail probability
//! - the source file and the samples that were fitted
//! - a precomputed grid of the fitted curve for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::Utc;
use log::info;

use crate::domain::{CurveFile, CurveGrid, FitSummary, GaussianParams};
use crate::error::FitError;
use crate::io::ingest::IngestedData;
use crate::models::gaussian;

/// Number of grid points written to curve files.
pub const GRID_POINTS: usize = 201;

/// Build the curve file contents for a fit.
pub fn build_curve_file(summary: &FitSummary, ingest: &IngestedData) -> CurveFile {
    let grid = build_grid(&summary.fit.params, ingest.stats.x_min, ingest.stats.x_max, GRID_POINTS);
    CurveFile {
        tool: "gaussfit".to_string(),
        generated: Utc::now(),
        source: ingest.path.display().to_string(),
        params: summary.fit.params,
        covariance: summary.fit.covariance,
        sse: summary.fit.sse,
        x_max: summary.x_max,
        tail_probability: summary.tail_probability,
        samples: ingest.samples.clone(),
        grid,
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, summary: &FitSummary, ingest: &IngestedData) -> Result<(), FitError> {
    let file = File::create(path).map_err(|e| FitError::io(path, e))?;
    let curve = build_curve_file(summary, ingest);
    serde_json::to_writer_pretty(BufWriter::new(file), &curve).map_err(|e| FitError::io(path, e))?;
    info!("wrote curve JSON to '{}'", path.display());
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, FitError> {
    let file = File::open(path).map_err(|e| FitError::io(path, e))?;
    let curve: CurveFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| FitError::input(format!("invalid curve JSON '{}': {e}", path.display())))?;
    if curve.grid.x.len() != curve.grid.y.len() {
        return Err(FitError::input(format!(
            "curve JSON '{}' has mismatched grid lengths ({} vs {})",
            path.display(),
            curve.grid.x.len(),
            curve.grid.y.len()
        )));
    }
    Ok(curve)
}

/// Evaluate the model on `n` evenly spaced points over `[x_min, x_max]`.
pub fn build_grid(params: &GaussianParams, x_min: f64, x_max: f64, n: usize) -> CurveGrid {
    let n = n.max(2);
    let mut x0 = x_min;
    let mut x1 = x_max;
    if !(x0.is_finite() && x1.is_finite()) || x1 < x0 {
        x0 = params.x0 - 3.0 * params.sigma.abs();
        x1 = params.x0 + 3.0 * params.sigma.abs();
    }
    if (x1 - x0).abs() < 1e-9 {
        x0 -= 0.5;
        x1 += 0.5;
    }

    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let x = x0 + u * (x1 - x0);
        xs.push(x);
        ys.push(gaussian(x, params));
    }

    CurveGrid { x: xs, y: ys }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitResult, Sample, SampleStats};
    use std::path::PathBuf;

    fn fixture() -> (FitSummary, IngestedData) {
        let params = GaussianParams::new(5.0, 10.0, 2.0);
        let samples: Vec<Sample> = (0..=10)
            .map(|i| Sample::new(f64::from(i), gaussian(f64::from(i), &params)))
            .collect();
        let stats = SampleStats::from_samples(&samples).unwrap();
        let summary = FitSummary {
            initial: params,
            fit: FitResult {
                params,
                covariance: [[1e-4, 0.0, 0.0], [0.0, 2e-4, 0.0], [0.0, 0.0, 3e-4]],
                sse: 1e-20,
                n: samples.len(),
                iterations: 4,
            },
            x_max: 10.0,
            tail_probability: 4.0e-4,
        };
        let ingest = IngestedData {
            path: PathBuf::from("bump.txt"),
            samples,
            stats,
            lines_read: 11,
            comments_skipped: 0,
        };
        (summary, ingest)
    }

    #[test]
    fn grid_spans_sample_range() {
        let (summary, ingest) = fixture();
        let curve = build_curve_file(&summary, &ingest);
        assert_eq!(curve.grid.x.len(), GRID_POINTS);
        assert_eq!(curve.grid.x[0], 0.0);
        assert_eq!(curve.grid.x[GRID_POINTS - 1], 10.0);
        assert_eq!(curve.grid.y[100], 10.0);
        assert_eq!(curve.source, "bump.txt");
    }

    #[test]
    fn degenerate_range_is_widened() {
        let grid = build_grid(&GaussianParams::new(1.0, 1.0, 1.0), 2.0, 2.0, 3);
        assert_eq!(grid.x, vec![1.5, 2.0, 2.5]);
    }

    #[test]
    fn json_round_trip() {
        let (summary, ingest) = fixture();
        let path = std::env::temp_dir().join(format!("gaussfit_curve_{}.json", std::process::id()));
        write_curve_json(&path, &summary, &ingest).unwrap();
        let back = read_curve_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.params, summary.fit.params);
        assert_eq!(back.covariance, summary.fit.covariance);
        assert_eq!(back.samples, ingest.samples);
        // Re-evaluating the stored parameters reproduces the stored grid.
        for (x, y) in back.grid.x.iter().zip(back.grid.y.iter()) {
            assert_eq!(gaussian(*x, &back.params), *y);
        }
    }
}
