//! Gaussian least-squares fit.
//!
//! Given samples `(x_i, y_i)` and a start point, we:
//! - refine `(x0, a, sigma)` with Levenberg–Marquardt on the analytic Jacobian
//! - estimate the parameter covariance from `JᵀJ` at convergence
//! - normalise the sign of `sigma` (the model is even in sigma)

use log::debug;
use nalgebra::{Matrix3, Vector3};

use crate::domain::{Covariance, FitResult, FitSummary, GaussianParams, Sample};
use crate::error::FitError;
use crate::fit::estimate::estimate_initial;
use crate::fit::tail::tail_probability;
use crate::math::{CovarianceError, DEFAULT_TOL, LmOptions, least_squares_covariance, levenberg_marquardt};
use crate::models::gaussian_with_gradient;

/// Minimum sample count for a 3-parameter fit.
pub const MIN_SAMPLES: usize = 3;

/// Relative spread of the fitted values at or below which the curve is flat.
const FLAT_TOL: f64 = DEFAULT_TOL;

/// Fitting options.
#[derive(Debug, Clone, Default)]
pub struct FitOptions {
    pub solver: LmOptions,
}

impl FitOptions {
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            solver: LmOptions {
                max_iterations,
                ..LmOptions::default()
            },
        }
    }
}

/// Fit a Gaussian to `samples` starting from `initial`.
pub fn fit(samples: &[Sample], initial: &GaussianParams, opts: &FitOptions) -> Result<FitResult, FitError> {
    let n = samples.len();
    if n < MIN_SAMPLES {
        return Err(FitError::input(format!(
            "need at least {MIN_SAMPLES} samples for a 3-parameter fit (got {n})"
        )));
    }

    let xs: Vec<f64> = samples.iter().map(|s| s.x).collect();
    let ys: Vec<f64> = samples.iter().map(|s| s.y).collect();

    let model = |x: f64, p: &Vector3<f64>| {
        let (y, g) = gaussian_with_gradient(x, &to_params(p));
        (y, Vector3::from(g))
    };

    let start = Vector3::from(initial.to_array());
    let outcome = levenberg_marquardt(model, &xs, &ys, start, &opts.solver).map_err(|f| {
        debug!("solver failed after reaching {:?}: {}", f.last.as_slice(), f.reason);
        FitError::Convergence {
            reason: f.reason,
            last: to_params(&f.last),
        }
    })?;

    let params = to_params(&outcome.params);
    debug!(
        "converged in {} iterations ({:?}): x0={} a={} sigma={} sse={:e}",
        outcome.iterations, outcome.stop, params.x0, params.a, params.sigma, outcome.sse
    );

    // Constant data is fitted by letting sigma run off; the width is then
    // undetermined even though the Jacobian stays numerically full rank.
    if is_flat_over(&xs, &params) {
        return Err(FitError::Convergence {
            reason: "fitted curve is flat over the samples (sigma undetermined)".to_string(),
            last: params,
        });
    }

    let cov = least_squares_covariance(&outcome.jtj, outcome.sse, n).map_err(|e| match e {
        CovarianceError::Singular { condition } => FitError::Convergence {
            reason: format!("singular Jacobian at solution (condition number {condition:e})"),
            last: params,
        },
    })?;

    let (params, cov) = normalise_sigma(params, cov);
    Ok(FitResult {
        params,
        covariance: to_covariance(&cov),
        sse: outcome.sse,
        n,
        iterations: outcome.iterations,
    })
}

/// Estimate, fit, and evaluate the tail probability at the largest sample x.
pub fn fit_samples(samples: &[Sample], opts: &FitOptions) -> Result<FitSummary, FitError> {
    let initial = estimate_initial(samples)?;
    debug!(
        "initial estimate: x0={} a={} sigma={}",
        initial.x0, initial.a, initial.sigma
    );
    let fit = fit(samples, &initial, opts)?;
    let x_max = samples.iter().map(|s| s.x).fold(f64::NEG_INFINITY, f64::max);
    let tail_probability = tail_probability(x_max, fit.params.x0, fit.params.sigma)?;

    Ok(FitSummary {
        initial,
        fit,
        x_max,
        tail_probability,
    })
}

/// Sum of squared residuals of `params` on `samples`.
pub fn sum_squared_residuals(samples: &[Sample], params: &GaussianParams) -> f64 {
    samples
        .iter()
        .map(|s| {
            let r = s.y - crate::models::gaussian(s.x, params);
            r * r
        })
        .sum()
}

/// `true` when `(max f - min f) / max |f|` over `xs` is at most `FLAT_TOL`.
fn is_flat_over(xs: &[f64], params: &GaussianParams) -> bool {
    let (lo, hi) = xs
        .iter()
        .map(|&x| crate::models::gaussian(x, params))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let peak = lo.abs().max(hi.abs());
    !(hi - lo > FLAT_TOL * peak)
}

fn to_params(p: &Vector3<f64>) -> GaussianParams {
    GaussianParams::new(p[0], p[1], p[2])
}

fn to_covariance(m: &Matrix3<f64>) -> Covariance {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = m[(i, j)];
        }
    }
    out
}

/// Flip a negative sigma to positive, negating its cross-covariances.
fn normalise_sigma(params: GaussianParams, mut cov: Matrix3<f64>) -> (GaussianParams, Matrix3<f64>) {
    if params.sigma >= 0.0 {
        return (params, cov);
    }
    for k in 0..2 {
        cov[(k, 2)] = -cov[(k, 2)];
        cov[(2, k)] = -cov[(2, k)];
    }
    (GaussianParams::new(params.x0, params.a, -params.sigma), cov)
}
