//! Levenberg–Marquardt solver for small nonlinear least-squares problems.
//!
//! We minimize
//!
//! ```text
//! SSE(p) = Σ (y_i - f(x_i; p))²
//! ```
//!
//! over a 3-parameter vector `p`, given a model callback that returns both
//! `f(x; p)` and its gradient `∂f/∂p`.
//!
//! Each iteration solves the damped normal equations
//!
//! ```text
//! (JᵀJ + λ·diag(JᵀJ)) δ = Jᵀr
//! ```
//!
//! with a Cholesky factorization. A step is accepted when it lowers the SSE
//! (λ shrinks), otherwise λ grows and the step is retried from the same point.
//!
//! Stopping rules follow the MINPACK conventions:
//! - `ftol`: relative SSE reduction of an accepted step
//! - `xtol`: relative step length
//! - `gtol`: cosine between the residual vector and the Jacobian columns
//! - an exactly zero SSE is a perfect fit

use log::trace;
use nalgebra::{Matrix3, Vector3};

/// Default relative tolerance (`sqrt(f64::EPSILON)`), as in MINPACK.
pub const DEFAULT_TOL: f64 = 1.490_116_119_384_765_6e-8;

/// λ beyond which the solver gives up on finding a descent step.
const MAX_LAMBDA: f64 = 1e32;
/// Lower clamp for λ so it can always grow back.
const MIN_LAMBDA: f64 = 1e-15;
/// Floor for Marquardt scaling when a Jacobian column vanishes.
const DIAG_FLOOR: f64 = 1e-30;

/// Solver settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LmOptions {
    pub max_iterations: usize,
    pub ftol: f64,
    pub xtol: f64,
    pub gtol: f64,
    pub initial_lambda: f64,
    pub lambda_up: f64,
    pub lambda_down: f64,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            ftol: DEFAULT_TOL,
            xtol: DEFAULT_TOL,
            gtol: 0.0,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
        }
    }
}

/// Why the solver stopped successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LmStop {
    ExactFit,
    Ftol,
    Xtol,
    Gtol,
}

/// Converged solver state.
#[derive(Debug, Clone, PartialEq)]
pub struct LmOutcome {
    pub params: Vector3<f64>,
    pub sse: f64,
    /// `JᵀJ` evaluated at `params` (undamped).
    pub jtj: Matrix3<f64>,
    pub iterations: usize,
    pub stop: LmStop,
}

/// Solver failure with the last accepted iterate.
#[derive(Debug, Clone, PartialEq)]
pub struct LmFailure {
    pub reason: String,
    pub last: Vector3<f64>,
}

/// Run Levenberg–Marquardt from `initial`.
///
/// `model(x, p)` returns `(f(x; p), ∂f/∂p)`.
pub fn levenberg_marquardt<F>(
    model: F,
    xs: &[f64],
    ys: &[f64],
    initial: Vector3<f64>,
    opts: &LmOptions,
) -> Result<LmOutcome, LmFailure>
where
    F: Fn(f64, &Vector3<f64>) -> (f64, Vector3<f64>),
{
    let mut p = initial;
    let Some(mut state) = normal_equations(&model, xs, ys, &p) else {
        return Err(LmFailure {
            reason: "model is not finite at the initial estimate".to_string(),
            last: p,
        });
    };

    let mut lambda = opts.initial_lambda;
    let mut iterations = 0usize;

    let done = |p: Vector3<f64>, state: &NormalEquations, iterations: usize, stop: LmStop| LmOutcome {
        params: p,
        sse: state.sse,
        jtj: state.jtj,
        iterations,
        stop,
    };

    loop {
        if state.sse == 0.0 {
            return Ok(done(p, &state, iterations, LmStop::ExactFit));
        }
        if opts.gtol > 0.0 && gradient_cosine(&state) <= opts.gtol {
            return Ok(done(p, &state, iterations, LmStop::Gtol));
        }
        if iterations >= opts.max_iterations {
            return Err(LmFailure {
                reason: format!("iteration limit ({}) reached", opts.max_iterations),
                last: p,
            });
        }
        iterations += 1;

        let mut damped = state.jtj;
        for i in 0..3 {
            damped[(i, i)] += lambda * state.jtj[(i, i)].max(DIAG_FLOOR);
        }

        let Some(chol) = damped.cholesky() else {
            trace!("iter {iterations}: damped system not positive definite (lambda={lambda:e})");
            lambda *= opts.lambda_up;
            if lambda > MAX_LAMBDA {
                return Err(LmFailure {
                    reason: "damping overflow: normal equations are singular".to_string(),
                    last: p,
                });
            }
            continue;
        };
        let delta = chol.solve(&state.jtr);
        let candidate = p + delta;
        let small_step = delta.norm() <= opts.xtol * (p.norm() + opts.xtol);

        match normal_equations(&model, xs, ys, &candidate) {
            Some(next) if next.sse < state.sse => {
                let reduction = (state.sse - next.sse) / state.sse;
                trace!(
                    "iter {iterations}: accept sse={:e} -> {:e} (lambda={lambda:e})",
                    state.sse,
                    next.sse
                );
                p = candidate;
                state = next;
                lambda = (lambda * opts.lambda_down).max(MIN_LAMBDA);

                if small_step {
                    return Ok(done(p, &state, iterations, LmStop::Xtol));
                }
                if reduction <= opts.ftol {
                    return Ok(done(p, &state, iterations, LmStop::Ftol));
                }
            }
            _ => {
                trace!("iter {iterations}: reject step (lambda={lambda:e})");
                if small_step {
                    return Ok(done(p, &state, iterations, LmStop::Xtol));
                }
                lambda *= opts.lambda_up;
                if lambda > MAX_LAMBDA {
                    return Err(LmFailure {
                        reason: "damping overflow: no descent direction found".to_string(),
                        last: p,
                    });
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct NormalEquations {
    jtj: Matrix3<f64>,
    jtr: Vector3<f64>,
    sse: f64,
}

/// Accumulate `JᵀJ`, `Jᵀr` and the SSE at `p`. `None` if anything is non-finite.
fn normal_equations<F>(model: &F, xs: &[f64], ys: &[f64], p: &Vector3<f64>) -> Option<NormalEquations>
where
    F: Fn(f64, &Vector3<f64>) -> (f64, Vector3<f64>),
{
    let mut jtj = Matrix3::<f64>::zeros();
    let mut jtr = Vector3::<f64>::zeros();
    let mut sse = 0.0;

    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let (f, g) = model(x, p);
        let r = y - f;
        jtj += g * g.transpose();
        jtr += g * r;
        sse += r * r;
    }

    if sse.is_finite() && jtj.iter().all(|v| v.is_finite()) && jtr.iter().all(|v| v.is_finite()) {
        Some(NormalEquations { jtj, jtr, sse })
    } else {
        None
    }
}

/// Largest cosine between the residual vector and a Jacobian column.
fn gradient_cosine(state: &NormalEquations) -> f64 {
    let rnorm = state.sse.sqrt();
    (0..3)
        .filter(|&i| state.jtj[(i, i)] > 0.0)
        .map(|i| state.jtr[i].abs() / (state.jtj[(i, i)].sqrt() * rnorm))
        .fold(0.0, f64::max)
}
