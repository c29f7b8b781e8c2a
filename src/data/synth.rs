//! Synthetic Gaussian sample generation.
//!
//! Produces noisy histogram-like data on a regular x grid so the fitter can be
//! exercised without a measurement file. Noise is additive `N(0, noise²)` and
//! the result is clamped at zero (counts cannot be negative).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{Sample, SynthConfig};
use crate::error::FitError;
use crate::models::gaussian;

/// Generate samples for `config`. Deterministic for a given seed.
pub fn generate_samples(config: &SynthConfig) -> Result<Vec<Sample>, FitError> {
    validate(config)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise)
        .map_err(|e| FitError::input(format!("noise distribution error: {e}")))?;

    // Index-based so rounding in `step` never drops the last point.
    let count = ((config.x_max - config.x_min) / config.step + 1e-9).floor() as usize + 1;
    let mut samples = Vec::with_capacity(count);
    for i in 0..count {
        let x = config.x_min + i as f64 * config.step;
        let clean = gaussian(x, &config.params);
        let y = if config.noise > 0.0 {
            (clean + normal.sample(&mut rng)).max(0.0)
        } else {
            clean
        };
        samples.push(Sample::new(x, y));
    }
    Ok(samples)
}

/// Write samples in the two-column format the ingest reader accepts.
pub fn write_samples(path: &Path, samples: &[Sample], config: &SynthConfig) -> Result<(), FitError> {
    let file = File::create(path).map_err(|e| FitError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_sample_text(&mut out, samples, config).map_err(|e| FitError::io(path, e))?;
    out.flush().map_err(|e| FitError::io(path, e))?;
    info!("wrote {} synthetic samples to '{}'", samples.len(), path.display());
    Ok(())
}

fn write_sample_text<W: Write>(out: &mut W, samples: &[Sample], config: &SynthConfig) -> std::io::Result<()> {
    writeln!(
        out,
        "# synthetic gaussian: x0={} a={} sigma={} noise={} seed={}",
        config.params.x0, config.params.a, config.params.sigma, config.noise, config.seed
    )?;
    for s in samples {
        writeln!(out, "{} {}", s.x, s.y)?;
    }
    Ok(())
}

fn validate(config: &SynthConfig) -> Result<(), FitError> {
    if !(config.step.is_finite() && config.step > 0.0) {
        return Err(FitError::input("step must be > 0"));
    }
    if !(config.x_min.is_finite() && config.x_max.is_finite() && config.x_max > config.x_min) {
        return Err(FitError::input("x range must satisfy x_min < x_max"));
    }
    if !(config.params.is_finite() && config.params.sigma > 0.0) {
        return Err(FitError::input("gaussian parameters must be finite with sigma > 0"));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(FitError::input("noise must be >= 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GaussianParams;
    use crate::io::ingest::parse_samples;

    fn config(noise: f64, seed: u64) -> SynthConfig {
        SynthConfig {
            params: GaussianParams::new(5.0, 10.0, 2.0),
            x_min: 0.0,
            x_max: 10.0,
            step: 1.0,
            noise,
            seed,
        }
    }

    #[test]
    fn noiseless_grid_is_exact() {
        let samples = generate_samples(&config(0.0, 0)).unwrap();
        assert_eq!(samples.len(), 11);
        assert_eq!(samples[0].x, 0.0);
        assert_eq!(samples[10].x, 10.0);
        assert_eq!(samples[5].y, 10.0);
    }

    #[test]
    fn noise_is_seeded_and_non_negative() {
        let a = generate_samples(&config(1.0, 9)).unwrap();
        let b = generate_samples(&config(1.0, 9)).unwrap();
        let c = generate_samples(&config(1.0, 10)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|s| s.y >= 0.0));
    }

    #[test]
    fn fractional_step_keeps_endpoint() {
        let cfg = SynthConfig {
            step: 0.1,
            x_max: 1.0,
            ..config(0.0, 0)
        };
        let samples = generate_samples(&cfg).unwrap();
        assert_eq!(samples.len(), 11);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let bad_step = SynthConfig { step: 0.0, ..config(0.0, 0) };
        assert!(generate_samples(&bad_step).is_err());
        let bad_range = SynthConfig { x_max: -1.0, ..config(0.0, 0) };
        assert!(generate_samples(&bad_range).is_err());
        let bad_noise = config(-1.0, 0);
        assert!(generate_samples(&bad_noise).is_err());
    }

    #[test]
    fn written_text_reads_back() {
        let cfg = config(0.5, 3);
        let samples = generate_samples(&cfg).unwrap();
        let mut buf = Vec::new();
        write_sample_text(&mut buf, &samples, &cfg).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let data = parse_samples(&text, Path::new("mem")).unwrap();
        assert_eq!(data.samples, samples);
        assert_eq!(data.comments_skipped, 1);
    }
}
