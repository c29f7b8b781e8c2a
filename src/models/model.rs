//! Gaussian model evaluation.
//!
//! The fitter relies on two primitive operations:
//! - predict `y(x)` given parameters (for residuals/plots)
//! - the gradient of `y(x)` with respect to `(x0, a, sigma)` (Jacobian rows)
//!
//! With `t = (x - x0) / sigma` and `e = exp(-t²/2)`:
//!
//! - `y     = a·e`
//! - `∂y/∂x0    = a·e·t / sigma`
//! - `∂y/∂a     = e`
//! - `∂y/∂sigma = a·e·t² / sigma`

use crate::domain::GaussianParams;

/// Evaluate `a · exp(-((x - x0) / sigma)² / 2)`.
///
/// `sigma = 0` yields `NaN` at `x = x0` and `0` elsewhere; callers validate
/// sigma before relying on the value.
pub fn gaussian(x: f64, p: &GaussianParams) -> f64 {
    let t = (x - p.x0) / p.sigma;
    p.a * (-t * t / 2.0).exp()
}

/// Evaluate the model and its gradient at `x`.
pub fn gaussian_with_gradient(x: f64, p: &GaussianParams) -> (f64, [f64; 3]) {
    let t = (x - p.x0) / p.sigma;
    let e = (-t * t / 2.0).exp();
    let y = p.a * e;
    let d_x0 = y * t / p.sigma;
    let d_sigma = y * t * t / p.sigma;
    (y, [d_x0, e, d_sigma])
}

/// Evaluate the model at every x in `xs`.
pub fn predict_all(xs: &[f64], p: &GaussianParams) -> Vec<f64> {
    xs.iter().map(|&x| gaussian(x, p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_and_one_sigma_values() {
        let p = GaussianParams::new(5.0, 10.0, 2.0);
        assert_eq!(gaussian(5.0, &p), 10.0);
        let one_sigma = gaussian(7.0, &p);
        assert!((one_sigma - 10.0 * (-0.5f64).exp()).abs() < 1e-12);
        assert_eq!(gaussian(3.0, &p), one_sigma);
    }

    #[test]
    fn model_is_even_in_sigma() {
        let p = GaussianParams::new(1.0, 3.0, 0.7);
        let q = GaussianParams::new(1.0, 3.0, -0.7);
        for &x in &[-2.0, 0.0, 0.5, 1.0, 4.0] {
            assert_eq!(gaussian(x, &p), gaussian(x, &q));
        }
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let p = GaussianParams::new(2.0, 4.0, 1.5);
        let h = 1e-6;
        for &x in &[-1.0, 1.2, 2.0, 3.7, 6.0] {
            let (y, grad) = gaussian_with_gradient(x, &p);
            assert!((y - gaussian(x, &p)).abs() < 1e-15);

            let base = p.to_array();
            for (k, g) in grad.iter().enumerate() {
                let mut hi = base;
                let mut lo = base;
                hi[k] += h;
                lo[k] -= h;
                let fd = (gaussian(x, &GaussianParams::from_array(hi))
                    - gaussian(x, &GaussianParams::from_array(lo)))
                    / (2.0 * h);
                assert!((fd - g).abs() < 1e-6, "param {k} at x={x}: fd={fd}, analytic={g}");
            }
        }
    }

    #[test]
    fn serialized_params_reproduce_curve_values() {
        let p = GaussianParams::new(5.0, 10.0, 2.0);
        let xs: Vec<f64> = (0..=10).map(f64::from).collect();
        let before = predict_all(&xs, &p);

        let json = serde_json::to_string(&p).unwrap();
        let back: GaussianParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert_eq!(predict_all(&xs, &back), before);
    }
}
