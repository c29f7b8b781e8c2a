//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single `(x, y)` observation.
///
/// `x` is the measured value, `y` the observed count (or weight) at that value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Gaussian parameters in solver order `(x0, a, sigma)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianParams {
    /// Peak location.
    pub x0: f64,
    /// Peak amplitude.
    pub a: f64,
    /// Standard deviation (width).
    pub sigma: f64,
}

impl GaussianParams {
    pub fn new(x0: f64, a: f64, sigma: f64) -> Self {
        Self { x0, a, sigma }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x0, self.a, self.sigma]
    }

    pub fn from_array(p: [f64; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }

    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.a.is_finite() && self.sigma.is_finite()
    }
}

/// Parameter covariance, rows/columns in `(x0, a, sigma)` order.
pub type Covariance = [[f64; 3]; 3];

/// Output of a converged least-squares fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub params: GaussianParams,
    pub covariance: Covariance,
    /// Sum of squared residuals at `params`.
    pub sse: f64,
    /// Number of samples the fit used.
    pub n: usize,
    /// Solver iterations (accepted + rejected steps).
    pub iterations: usize,
}

impl FitResult {
    /// One-sigma parameter uncertainties (square roots of the diagonal).
    pub fn std_errors(&self) -> [f64; 3] {
        [
            self.covariance[0][0].sqrt(),
            self.covariance[1][1].sqrt(),
            self.covariance[2][2].sqrt(),
        ]
    }
}

/// Everything a single fit run reports.
#[derive(Debug, Clone, PartialEq)]
pub struct FitSummary {
    pub initial: GaussianParams,
    pub fit: FitResult,
    /// Largest sample x (where the tail probability is evaluated).
    pub x_max: f64,
    /// `erfc((x_max - x0) / sigma)` under the fitted curve.
    pub tail_probability: f64,
}

/// Summary stats about an ingested sample set.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleStats {
    pub n: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub y_sum: f64,
}

impl SampleStats {
    /// Compute stats for a sample set. Returns `None` when the set is empty.
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut stats = SampleStats {
            n: samples.len(),
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
            y_sum: 0.0,
        };
        for s in samples {
            stats.x_min = stats.x_min.min(s.x);
            stats.x_max = stats.x_max.max(s.x);
            stats.y_min = stats.y_min.min(s.y);
            stats.y_max = stats.y_max.max(s.y);
            stats.y_sum += s.y;
        }
        Some(stats)
    }
}

/// A fitted value and residual for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleResidual {
    pub sample: Sample,
    pub y_fit: f64,
    pub residual: f64,
}

/// Run configuration for `gaussfit fit`.
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub input: PathBuf,
    pub max_iterations: usize,
    pub plot: bool,
    pub tui: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_curve: Option<PathBuf>,
    pub export_results: Option<PathBuf>,
}

/// Settings for synthetic sample generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub params: GaussianParams,
    pub x_min: f64,
    pub x_max: f64,
    pub step: f64,
    /// Standard deviation of additive Gaussian noise on y.
    pub noise: f64,
    pub seed: u64,
}

/// Portable JSON representation of a fitted curve.
///
/// Written by `gaussfit fit --export-curve`, read by `gaussfit plot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub source: String,
    pub params: GaussianParams,
    pub covariance: Covariance,
    pub sse: f64,
    pub x_max: f64,
    pub tail_probability: f64,
    pub samples: Vec<Sample>,
    pub grid: CurveGrid,
}

/// Fitted curve evaluated on a regular grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}
