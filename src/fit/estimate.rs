//! Initial parameter estimates from the raw samples.
//!
//! - `x0`: x at the largest y (first occurrence on ties)
//! - `a`: the largest y
//! - `sigma`: y-weighted standard deviation of x about `x0`

use crate::domain::{GaussianParams, Sample};
use crate::error::FitError;

/// Estimate `(x0, a, sigma)` for the fitter's start point.
///
/// Requires a non-empty sample set with `Σ y > 0`.
pub fn estimate_initial(samples: &[Sample]) -> Result<GaussianParams, FitError> {
    let Some(first) = samples.first() else {
        return Err(FitError::input("cannot estimate parameters from an empty sample set"));
    };

    let mut peak = *first;
    for s in &samples[1..] {
        if s.y > peak.y {
            peak = *s;
        }
    }

    let y_sum: f64 = samples.iter().map(|s| s.y).sum();
    if !(y_sum > 0.0) || !y_sum.is_finite() {
        return Err(FitError::input(format!("sum of y must be positive (got {y_sum})")));
    }

    let weighted: f64 = samples
        .iter()
        .map(|s| {
            let d = s.x - peak.x;
            s.y * d * d
        })
        .sum();

    Ok(GaussianParams::new(peak.x, peak.y, (weighted / y_sum).sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::gaussian;

    fn bump() -> Vec<Sample> {
        let p = GaussianParams::new(5.0, 10.0, 2.0);
        (0..=10)
            .map(|i| {
                let x = f64::from(i);
                Sample::new(x, gaussian(x, &p))
            })
            .collect()
    }

    #[test]
    fn estimates_peak_and_width() {
        let est = estimate_initial(&bump()).unwrap();
        assert_eq!(est.x0, 5.0);
        assert_eq!(est.a, 10.0);
        assert!((est.sigma - 2.0).abs() < 0.1, "sigma={}", est.sigma);
    }

    #[test]
    fn scaling_y_scales_only_amplitude() {
        let samples = bump();
        let base = estimate_initial(&samples).unwrap();
        for &k in &[2.0, 0.5, 8.0] {
            let scaled: Vec<Sample> = samples.iter().map(|s| Sample::new(s.x, k * s.y)).collect();
            let est = estimate_initial(&scaled).unwrap();
            assert_eq!(est.x0, base.x0);
            assert!((est.sigma - base.sigma).abs() < 1e-12);
            assert!((est.a - k * base.a).abs() < 1e-12);
        }
    }

    #[test]
    fn ties_take_first_maximum() {
        let samples = vec![
            Sample::new(1.0, 1.0),
            Sample::new(2.0, 4.0),
            Sample::new(3.0, 4.0),
            Sample::new(4.0, 1.0),
        ];
        let est = estimate_initial(&samples).unwrap();
        assert_eq!(est.x0, 2.0);
        assert_eq!(est.a, 4.0);
    }

    #[test]
    fn rejects_empty_and_zero_weight_inputs() {
        assert!(matches!(estimate_initial(&[]), Err(FitError::Input { .. })));
        let zeros = vec![Sample::new(0.0, 0.0), Sample::new(1.0, 0.0)];
        assert!(matches!(estimate_initial(&zeros), Err(FitError::Input { .. })));
    }
}
