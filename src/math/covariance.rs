//! Least-squares parameter covariance.
//!
//! At a converged least-squares solution the standard estimate is
//!
//! ```text
//! cov = s² · (JᵀJ)⁻¹,   s² = SSE / (n - p)
//! ```
//!
//! The columns of `J` carry the units of their parameters, so `JᵀJ` is first
//! equilibrated to unit diagonal (`D·JᵀJ·D`, `D = diag(1/sqrt(JᵀJ_ii))`). The
//! rank check and the inverse run on that matrix and the result is scaled back
//! with `D`. A Jacobian with (numerically) dependent columns means at least one
//! parameter is not determined by the data and the covariance is meaningless.

use nalgebra::{Matrix3, Vector3};

/// Singular values below `RANK_TOL × largest` count as zero.
pub const RANK_TOL: f64 = 1e-12;

/// Why a covariance could not be formed.
#[derive(Debug, Clone, PartialEq)]
pub enum CovarianceError {
    Singular { condition: f64 },
}

/// Compute `s² (JᵀJ)⁻¹` for `n` observations and 3 parameters.
///
/// With zero degrees of freedom (`n == 3`) every entry is `+inf`.
pub fn least_squares_covariance(jtj: &Matrix3<f64>, sse: f64, n: usize) -> Result<Matrix3<f64>, CovarianceError> {
    let diag = jtj.diagonal();
    if diag.iter().any(|d| !(*d > 0.0) || !d.is_finite()) {
        return Err(CovarianceError::Singular {
            condition: f64::INFINITY,
        });
    }
    let scale = Matrix3::from_diagonal(&Vector3::from_iterator(diag.iter().map(|d| 1.0 / d.sqrt())));
    let scaled = scale * jtj * scale;

    let svd = scaled.svd(false, false);
    let s_max = svd.singular_values.max();
    let s_min = svd.singular_values.min();
    if !(s_max > 0.0) || s_min <= RANK_TOL * s_max {
        let condition = if s_min > 0.0 { s_max / s_min } else { f64::INFINITY };
        return Err(CovarianceError::Singular { condition });
    }

    let Some(inv) = scaled.try_inverse() else {
        return Err(CovarianceError::Singular {
            condition: s_max / s_min,
        });
    };

    if n <= 3 {
        return Ok(Matrix3::from_element(f64::INFINITY));
    }
    let s2 = sse / (n - 3) as f64;
    Ok(scale * inv * scale * s2)
}
