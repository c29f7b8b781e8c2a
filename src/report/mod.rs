//! Reporting utilities: residuals and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{GaussianParams, Sample, SampleResidual};
use crate::error::FitError;
use crate::models::gaussian;

pub mod format;

pub use format::*;

/// Compute fitted values and residuals for each sample.
pub fn compute_residuals(samples: &[Sample], params: &GaussianParams) -> Result<Vec<SampleResidual>, FitError> {
    let mut out = Vec::with_capacity(samples.len());
    for s in samples {
        let y_fit = gaussian(s.x, params);
        if !y_fit.is_finite() {
            return Err(FitError::Domain(format!(
                "non-finite model value at x={} during residual computation",
                s.x
            )));
        }
        out.push(SampleResidual {
            sample: *s,
            y_fit,
            residual: s.y - y_fit,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_residuals_basic() {
        let params = GaussianParams::new(0.0, 2.0, 1.0);
        let samples = vec![Sample::new(0.0, 2.5), Sample::new(10.0, 0.0)];
        let residuals = compute_residuals(&samples, &params).unwrap();
        assert_eq!(residuals.len(), 2);
        assert_eq!(residuals[0].y_fit, 2.0);
        assert!((residuals[0].residual - 0.5).abs() < 1e-12);
        assert!(residuals[1].residual.abs() < 1e-20);
    }

    #[test]
    fn zero_width_center_is_rejected() {
        let params = GaussianParams::new(1.0, 2.0, 0.0);
        let err = compute_residuals(&[Sample::new(1.0, 1.0)], &params).unwrap_err();
        assert!(matches!(err, FitError::Domain(_)));
    }
}
