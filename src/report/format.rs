//! Formatted terminal output.

use crate::domain::{Covariance, FitSummary, GaussianParams};
use crate::io::ingest::IngestedData;

/// Format the dataset header (source, counts, ranges).
pub fn format_run_header(ingest: &IngestedData) -> String {
    let s = &ingest.stats;
    let mut out = String::new();
    out.push_str(&format!("=== gaussfit - {} ===\n", ingest.path.display()));
    out.push_str(&format!(
        "Samples: n={} | x=[{}, {}] | y=[{}, {}] | sum(y)={}\n",
        s.n, s.x_min, s.x_max, s.y_min, s.y_max, s.y_sum
    ));
    out
}

/// Format the fit report: parameters, covariance and tail probability.
///
/// ```text
/// x0: 5.0
/// a: 10.0
/// sigma: 2.0
/// pcov:
/// [[ ... ]
///  [ ... ]
///  [ ... ]]
/// erfc(10.0)=0.0004069520174449589
/// ```
pub fn format_fit_report(summary: &FitSummary) -> String {
    let p = &summary.fit.params;
    let mut out = String::new();
    out.push_str(&format!("x0: {}\n", fmt_float(p.x0)));
    out.push_str(&format!("a: {}\n", fmt_float(p.a)));
    out.push_str(&format!("sigma: {}\n", fmt_float(p.sigma)));
    out.push_str("pcov:\n");
    out.push_str(&format_matrix(&summary.fit.covariance));
    out.push_str(&format!(
        "erfc({})={}\n",
        fmt_float(summary.x_max),
        fmt_float(summary.tail_probability)
    ));
    out.push('\n');
    out
}

/// Format fit diagnostics (start point, SSE, iterations, standard errors).
pub fn format_diagnostics(summary: &FitSummary) -> String {
    let i = &summary.initial;
    let se = summary.fit.std_errors();
    let mut out = String::new();
    out.push_str(&format!("initial: x0={} a={} sigma={}\n", i.x0, i.a, i.sigma));
    out.push_str(&format!(
        "fit: n={} iterations={} sse={:.6e}\n",
        summary.fit.n, summary.fit.iterations, summary.fit.sse
    ));
    out.push_str(&format!(
        "std errors: x0=±{:.4e} a=±{:.4e} sigma=±{:.4e}\n",
        se[0], se[1], se[2]
    ));
    out
}

/// Short parameter annotation used by the plots.
pub fn format_annotation(p: &GaussianParams) -> Vec<String> {
    vec![
        format!("x0={:.2}", p.x0),
        format!("a={}", fmt_sig(p.a, 4)),
        format!("σ={:.2}", p.sigma),
    ]
}

/// Format a 3×3 matrix in a bracketed, column-aligned layout.
pub fn format_matrix(m: &Covariance) -> String {
    let mut out = String::new();
    for (i, row) in m.iter().enumerate() {
        out.push_str(if i == 0 { "[[" } else { " [" });
        let cells: Vec<String> = row.iter().map(|v| format!("{v:>13.6e}")).collect();
        out.push_str(&cells.join(" "));
        out.push(']');
        if i + 1 == m.len() {
            out.push(']');
        }
        out.push('\n');
    }
    out
}

/// Shortest round-trip form that always reads as a float: `10.0`, `0.25`,
/// `1e-07`, `1.5e+16`.
pub fn fmt_float(v: f64) -> String {
    let s = format!("{v:?}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

/// Format `v` with `digits` significant digits, dropping trailing zeros.
pub fn fmt_sig(v: f64, digits: usize) -> String {
    if v == 0.0 || !v.is_finite() {
        return format!("{v}");
    }
    let magnitude = v.abs().log10().floor() as i32;
    let digits = digits.max(1) as i32;
    if magnitude < -5 || magnitude >= digits {
        let s = format!("{:.*e}", (digits - 1) as usize, v);
        return trim_mantissa(&s);
    }
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    let s = format!("{v:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

fn trim_mantissa(s: &str) -> String {
    match s.split_once('e') {
        Some((mantissa, exp)) if mantissa.contains('.') => {
            format!("{}e{exp}", mantissa.trim_end_matches('0').trim_end_matches('.'))
        }
        _ => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FitResult;

    fn summary() -> FitSummary {
        let params = GaussianParams::new(5.0, 10.0, 2.0);
        FitSummary {
            initial: GaussianParams::new(5.0, 10.0, 1.98),
            fit: FitResult {
                params,
                covariance: [[1.0, 0.0, 0.0], [0.0, 2.0, 0.5], [0.0, 0.5, 3.0]],
                sse: 0.0,
                n: 11,
                iterations: 5,
            },
            x_max: 10.0,
            tail_probability: 0.25,
        }
    }

    #[test]
    fn fit_report_layout() {
        let txt = format_fit_report(&summary());
        let expected = concat!(
            "x0: 5.0\n",
            "a: 10.0\n",
            "sigma: 2.0\n",
            "pcov:\n",
            "[[   1.000000e0    0.000000e0    0.000000e0]\n",
            " [   0.000000e0    2.000000e0   5.000000e-1]\n",
            " [   0.000000e0   5.000000e-1    3.000000e0]]\n",
            "erfc(10.0)=0.25\n",
            "\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn annotation_formats() {
        let lines = format_annotation(&GaussianParams::new(5.004, 1234.5678, 2.0));
        assert_eq!(lines, vec!["x0=5.00", "a=1235", "σ=2.00"]);
        assert_eq!(fmt_sig(0.012346, 4), "0.01235");
        assert_eq!(fmt_sig(98766.0, 4), "9.877e4");
        assert_eq!(fmt_sig(10.0, 4), "10");
    }

    #[test]
    fn floats_keep_a_decimal_point() {
        assert_eq!(fmt_float(10.0), "10.0");
        assert_eq!(fmt_float(-3.0), "-3.0");
        assert_eq!(fmt_float(0.0004069520174449589), "0.0004069520174449589");
        assert_eq!(fmt_float(1e-7), "1e-07");
        assert_eq!(fmt_float(2.5e-12), "2.5e-12");
        assert_eq!(fmt_float(1.5e16), "1.5e+16");
        assert_eq!(fmt_float(f64::INFINITY), "inf");
    }

    #[test]
    fn diagnostics_mention_iterations() {
        let txt = format_diagnostics(&summary());
        assert!(txt.contains("iterations=5"));
        assert!(txt.contains("initial: x0=5 a=10 sigma=1.98"));
    }
}
