//! Export per-sample results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::domain::SampleResidual;
use crate::error::FitError;

/// Write `x,y_obs,y_fit,residual` rows to a CSV file.
pub fn write_results_csv(path: &Path, residuals: &[SampleResidual]) -> Result<(), FitError> {
    let file = File::create(path).map_err(|e| FitError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_results(&mut out, residuals).map_err(|e| FitError::io(path, e))?;
    out.flush().map_err(|e| FitError::io(path, e))?;
    info!("wrote {} result rows to '{}'", residuals.len(), path.display());
    Ok(())
}

fn write_results<W: Write>(out: &mut W, residuals: &[SampleResidual]) -> std::io::Result<()> {
    writeln!(out, "x,y_obs,y_fit,residual")?;
    for r in residuals {
        writeln!(out, "{},{},{},{}", r.sample.x, r.sample.y, r.y_fit, r.residual)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sample;

    #[test]
    fn writes_header_and_rows() {
        let rows = vec![
            SampleResidual {
                sample: Sample::new(1.0, 2.0),
                y_fit: 1.5,
                residual: 0.5,
            },
            SampleResidual {
                sample: Sample::new(2.0, 3.0),
                y_fit: 3.25,
                residual: -0.25,
            },
        ];
        let mut buf = Vec::new();
        write_results(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "x,y_obs,y_fit,residual\n1,2,1.5,0.5\n2,3,3.25,-0.25\n");
    }
}
