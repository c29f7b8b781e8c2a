//! Tail probability under the fitted Gaussian.

use statrs::function::erf::erfc;

use crate::error::FitError;

/// `erfc((x_eval - x0) / sigma)`.
///
/// Fails with `FitError::Domain` when `sigma` is zero or not finite.
pub fn tail_probability(x_eval: f64, x0: f64, sigma: f64) -> Result<f64, FitError> {
    if sigma == 0.0 || !sigma.is_finite() {
        return Err(FitError::Domain(format!(
            "tail probability needs a finite non-zero sigma (got {sigma})"
        )));
    }
    Ok(erfc((x_eval - x0) / sigma))
}
