//! Sample file ingest.
//!
//! The input is a plain text file with one `(x, y)` pair per line, separated by
//! whitespace:
//!
//! ```text
//! # value  count
//! 0   0.0044
//! 1   0.0439
//! ```
//!
//! Rules:
//! - lines that are blank (after trimming) are skipped
//! - lines whose first character is `#` are comments and are skipped
//! - every other line must hold exactly two finite numbers
//!
//! Unlike a lenient CSV import, a malformed line is fatal: the fit is only
//! meaningful on the complete data set.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::domain::{Sample, SampleStats};
use crate::error::FitError;

/// Ingest output: samples + stats + line accounting.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub path: PathBuf,
    pub samples: Vec<Sample>,
    pub stats: SampleStats,
    pub lines_read: usize,
    /// Blank and `#` comment lines.
    pub comments_skipped: usize,
}

/// Read and parse a sample file.
pub fn load_samples(path: &Path) -> Result<IngestedData, FitError> {
    let text = fs::read_to_string(path).map_err(|e| FitError::io(path, e))?;
    let data = parse_samples(&text, path)?;
    info!(
        "read {} samples from '{}' ({} lines, {} skipped)",
        data.samples.len(),
        path.display(),
        data.lines_read,
        data.comments_skipped
    );
    Ok(data)
}

/// Parse sample text. `path` is only recorded for reporting.
pub fn parse_samples(text: &str, path: &Path) -> Result<IngestedData, FitError> {
    let mut samples = Vec::new();
    let mut lines_read = 0usize;
    let mut comments_skipped = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        lines_read += 1;

        if line.trim().is_empty() || line.starts_with('#') {
            comments_skipped += 1;
            continue;
        }

        samples.push(parse_line(line, line_no)?);
    }

    let Some(stats) = SampleStats::from_samples(&samples) else {
        return Err(FitError::input(format!("no samples in '{}'", path.display())));
    };
    debug!(
        "x=[{}, {}] y=[{}, {}] sum(y)={}",
        stats.x_min, stats.x_max, stats.y_min, stats.y_max, stats.y_sum
    );

    Ok(IngestedData {
        path: path.to_path_buf(),
        samples,
        stats,
        lines_read,
        comments_skipped,
    })
}

fn parse_line(line: &str, line_no: usize) -> Result<Sample, FitError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [x, y] = fields.as_slice() else {
        return Err(FitError::input_at(
            line_no,
            format!("expected 2 fields, found {}", fields.len()),
        ));
    };
    Ok(Sample::new(parse_field(x, "x", line_no)?, parse_field(y, "y", line_no)?))
}

fn parse_field(raw: &str, name: &str, line_no: usize) -> Result<f64, FitError> {
    let v: f64 = raw
        .parse()
        .map_err(|_| FitError::input_at(line_no, format!("{name} value '{raw}' is not a number")))?;
    if !v.is_finite() {
        return Err(FitError::input_at(line_no, format!("{name} value '{raw}' is not finite")));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GaussianParams;
    use crate::models::gaussian;

    fn noiseless_file() -> String {
        let p = GaussianParams::new(5.0, 10.0, 2.0);
        let mut text = String::from("# x y\n");
        for i in 0..=10 {
            let x = f64::from(i);
            text.push_str(&format!("{x} {}\n", gaussian(x, &p)));
            if i == 4 {
                text.push('\n');
            }
        }
        text
    }

    #[test]
    fn skips_comment_and_blank_lines() {
        let data = parse_samples(&noiseless_file(), Path::new("mem")).unwrap();
        assert_eq!(data.samples.len(), 11);
        assert_eq!(data.lines_read, 13);
        assert_eq!(data.comments_skipped, 2);
        assert_eq!(data.samples[5], Sample::new(5.0, 10.0));
        assert_eq!(data.stats.x_max, 10.0);
        assert_eq!(data.stats.y_max, 10.0);
    }

    #[test]
    fn tabs_and_padding_are_accepted() {
        let data = parse_samples("  1\t2 \n3    4\r\n", Path::new("mem")).unwrap();
        assert_eq!(data.samples, vec![Sample::new(1.0, 2.0), Sample::new(3.0, 4.0)]);
    }

    #[test]
    fn malformed_lines_report_line_numbers() {
        let err = parse_samples("# h\n1 2\n3\n", Path::new("mem")).unwrap_err();
        assert_eq!(
            err,
            FitError::input_at(3, "expected 2 fields, found 1")
        );

        let err = parse_samples("1 2 3\n", Path::new("mem")).unwrap_err();
        assert!(matches!(err, FitError::Input { line: Some(1), .. }));

        let err = parse_samples("1 2\n4 abc\n", Path::new("mem")).unwrap_err();
        assert!(matches!(err, FitError::Input { line: Some(2), .. }));
        assert!(err.to_string().contains("'abc'"));

        let err = parse_samples("1 inf\n", Path::new("mem")).unwrap_err();
        assert!(matches!(err, FitError::Input { line: Some(1), .. }));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = parse_samples("# only a comment\n\n", Path::new("empty.txt")).unwrap_err();
        assert!(matches!(err, FitError::Input { line: None, .. }));
        assert!(err.to_string().contains("empty.txt"));
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join(format!("gaussfit_ingest_{}.txt", std::process::id()));
        fs::write(&path, noiseless_file()).unwrap();
        let data = load_samples(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(data.samples.len(), 11);
        assert_eq!(data.path, path);

        let missing = load_samples(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(missing, FitError::Io { .. }));
    }
}
