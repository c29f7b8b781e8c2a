//! Error types.
//!
//! - `FitError` is what the library returns (reader, fitter, exports).
//! - `AppError` is the process-level error: a message plus the exit code `main`
//!   should return. Every `FitError` maps onto one.

use std::fmt;
use std::path::PathBuf;

use crate::domain::GaussianParams;

/// Exit code for bad input, unreadable files and usage problems.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for solver failures.
pub const EXIT_CONVERGENCE: u8 = 3;
/// Exit code for math domain errors (e.g. zero width).
pub const EXIT_DOMAIN: u8 = 4;
/// Exit code for terminal/rendering failures.
pub const EXIT_TERMINAL: u8 = 5;

/// Failures of the fitting core and its I/O shell.
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// A file could not be opened, read or written.
    Io { path: PathBuf, message: String },
    /// Malformed or insufficient input data.
    ///
    /// `line` is the 1-based line number when the problem is tied to a line.
    Input { line: Option<usize>, message: String },
    /// The least-squares solver gave up; `last` is the final iterate.
    Convergence { reason: String, last: GaussianParams },
    /// A function was evaluated outside its domain.
    Domain(String),
}

impl FitError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            line: None,
            message: message.into(),
        }
    }

    pub fn input_at(line: usize, message: impl Into<String>) -> Self {
        Self::Input {
            line: Some(line),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            FitError::Io { .. } | FitError::Input { .. } => EXIT_INPUT,
            FitError::Convergence { .. } => EXIT_CONVERGENCE,
            FitError::Domain(_) => EXIT_DOMAIN,
        }
    }
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitError::Io { path, message } => write!(f, "I/O error on '{}': {message}", path.display()),
            FitError::Input {
                line: Some(line),
                message,
            } => write!(f, "Input error at line {line}: {message}"),
            FitError::Input { line: None, message } => write!(f, "Input error: {message}"),
            FitError::Convergence { reason, last } => write!(
                f,
                "Fit did not converge: {reason} (last iterate x0={}, a={}, sigma={})",
                last.x0, last.a, last.sigma
            ),
            FitError::Domain(message) => write!(f, "Domain error: {message}"),
        }
    }
}

impl std::error::Error for FitError {}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_errors_map_to_exit_codes() {
        let last = GaussianParams::new(1.0, 2.0, 3.0);
        assert_eq!(FitError::input("x").exit_code(), EXIT_INPUT);
        assert_eq!(FitError::io("a.txt", "nope").exit_code(), EXIT_INPUT);
        assert_eq!(
            FitError::Convergence {
                reason: "cap".to_string(),
                last
            }
            .exit_code(),
            EXIT_CONVERGENCE
        );
        assert_eq!(FitError::Domain("zero".to_string()).exit_code(), EXIT_DOMAIN);

        let app: AppError = FitError::input_at(7, "bad field").into();
        assert_eq!(app.exit_code(), EXIT_INPUT);
        assert_eq!(app.to_string(), "Input error at line 7: bad field");
    }

    #[test]
    fn convergence_error_reports_last_iterate() {
        let err = FitError::Convergence {
            reason: "iteration limit reached".to_string(),
            last: GaussianParams::new(5.0, 10.0, 2.0),
        };
        let msg = err.to_string();
        assert!(msg.contains("iteration limit reached"));
        assert!(msg.contains("x0=5"));
        assert!(msg.contains("sigma=2"));
    }
}
