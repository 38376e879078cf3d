//! Uncertainty-aware number formatting for typeset tables.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScicatError};

use super::numstr::{
    format_exponential, format_fixed, least_significant_digit_place,
    most_significant_digit_place, round_to_sig_figs, NumParts,
};

/// Marker emitted for cells without data.
pub const NO_DATA: &str = r"\nodata";

/// Default number of significant figures shown on errors.
pub const DEFAULT_ERROR_SIG_FIGS: usize = 2;

/// Mantissa precision used to find a value's order of magnitude.
const LEADING_PRECISION: usize = 6;

// Format tokens: "{:.3f}", ".3f", "3g", "e", ...
static FORMAT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\{:?)?\.?(\d*)([fFeEgG])\}?$").unwrap());

/// An explicit number format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    /// Fixed-point with the given number of decimals.
    Fixed(usize),
    /// Rounded to the given number of significant figures.
    General(usize),
    /// Scientific notation with the given number of mantissa decimals.
    Scientific(usize),
}

impl FromStr for NumberFormat {
    type Err = ScicatError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = FORMAT_TOKEN
            .captures(s.trim())
            .ok_or_else(|| ScicatError::Format(format!("format '{}' not understood", s)))?;

        let precision = match &caps[1] {
            "" => 6,
            digits => digits
                .parse()
                .map_err(|_| ScicatError::Format(format!("bad precision in format '{}'", s)))?,
        };

        match caps[2].to_ascii_lowercase().as_str() {
            "f" => Ok(NumberFormat::Fixed(precision)),
            "g" => Ok(NumberFormat::General(precision)),
            _ => Ok(NumberFormat::Scientific(precision)),
        }
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberFormat::Fixed(p) => write!(f, ".{}f", p),
            NumberFormat::General(n) => write!(f, ".{}g", n),
            NumberFormat::Scientific(p) => write!(f, ".{}e", p),
        }
    }
}

/// Formatter configuration.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Significant figures shown on errors.
    pub error_sig_figs: usize,
    /// Apply the explicit format even when errors are given.
    pub force_format: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            error_sig_figs: DEFAULT_ERROR_SIG_FIGS,
            force_format: false,
        }
    }
}

impl FormatterConfig {
    /// Set the number of significant figures shown on errors.
    pub fn with_error_sig_figs(mut self, sig_figs: usize) -> Self {
        self.error_sig_figs = sig_figs;
        self
    }

    /// Always use the explicit format when one is given.
    pub fn with_force_format(mut self, force: bool) -> Self {
        self.force_format = force;
        self
    }
}

/// Renders a value and its errors as typeset markup.
///
/// With errors, precision comes from the errors: each is rounded to
/// `error_sig_figs`, the value is shown down to the finer of the two error
/// digits, and the shorter of fixed-point and scientific layouts wins.
///
/// ```
/// use scicat::format::Formatter;
///
/// let formatter = Formatter::new();
/// let tex = formatter.format(1.2345, Some(0.021), Some(0.034), None).unwrap();
/// assert_eq!(tex, "$1.234_{-0.021}^{+0.034}$");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    config: FormatterConfig,
}

impl Formatter {
    /// Create a formatter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with custom configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Format `value` with optional negative and positive errors.
    ///
    /// A non-finite value renders as [`NO_DATA`]. When only one error is given it is
    /// used for both sides. Without errors an explicit `format` is required.
    pub fn format(
        &self,
        value: f64,
        err_neg: Option<f64>,
        err_pos: Option<f64>,
        format: Option<&NumberFormat>,
    ) -> Result<String> {
        if !value.is_finite() {
            return Ok(NO_DATA.to_string());
        }

        let err_neg = err_neg.filter(|e| e.is_finite());
        let err_pos = err_pos.filter(|e| e.is_finite());
        let errors = match (err_neg, err_pos) {
            (Some(neg), Some(pos)) => Some((neg, pos)),
            (Some(e), None) | (None, Some(e)) => Some((e, e)),
            (None, None) => None,
        };

        match (errors, format) {
            (None, None) => Err(ScicatError::Config(
                "a format is required for values without an error".to_string(),
            )),
            (None, Some(format)) => Ok(format_bare(value, format)),
            (Some((neg, pos)), Some(format)) if self.config.force_format => {
                Ok(forced_layout(value, neg, pos, format).render())
            }
            (Some((neg, pos)), _) => Ok(self.precision_layout(value, neg, pos).render()),
        }
    }

    /// Lay out a value at the precision implied by its errors.
    fn precision_layout(&self, value: f64, err_neg: f64, err_pos: f64) -> Layout {
        let sig_figs_err = self.config.error_sig_figs.max(1);
        let min_place = [err_neg, err_pos]
            .iter()
            .map(|&e| least_significant_digit_place(&round_to_sig_figs(e, sig_figs_err)))
            .min()
            .unwrap_or(0);

        let leading = format_exponential(value, LEADING_PRECISION);
        let max_place = most_significant_digit_place(&leading);
        let sig_figs = (max_place - min_place + 1).max(1) as usize;
        let leading_parts = NumParts::split(&leading);
        let exponent = typeset_exponent(leading_parts.exponent.unwrap_or(""));

        let precision = (-min_place).max(0) as usize;
        let fixed = format_fixed(value, precision);
        let scientific_len = sig_figs as f64 + 4.0 + 0.5 * exponent.len() as f64;

        if (fixed.len() as f64) < scientific_len {
            Layout {
                value: fixed,
                err_neg: format_fixed(err_neg, precision),
                err_pos: format_fixed(err_pos, precision),
                exponent: None,
            }
        } else {
            let scale = 10f64.powi(-leading_parts.exponent_value());
            let decimals = sig_figs - 1;
            Layout {
                value: format_fixed(value * scale, decimals),
                err_neg: format_fixed(err_neg * scale, decimals),
                err_pos: format_fixed(err_pos * scale, decimals),
                exponent: Some(exponent),
            }
        }
    }
}

/// Apply an explicit format to a value that has no error.
fn format_bare(value: f64, format: &NumberFormat) -> String {
    match *format {
        NumberFormat::Fixed(precision) => format_fixed(value, precision),
        NumberFormat::General(sig_figs) => round_to_sig_figs(value, sig_figs),
        NumberFormat::Scientific(precision) => {
            let rendered = format_exponential(value, precision);
            let parts = NumParts::split(&rendered);
            let mantissa = NumParts {
                exponent: None,
                ..parts
            }
            .join();
            format!(
                "${} \\times 10^{{{}}}$",
                mantissa,
                typeset_exponent(parts.exponent.unwrap_or(""))
            )
        }
    }
}

/// Apply an explicit format to a value and both errors.
fn forced_layout(value: f64, err_neg: f64, err_pos: f64, format: &NumberFormat) -> Layout {
    match *format {
        NumberFormat::Fixed(precision) => Layout {
            value: format_fixed(value, precision),
            err_neg: format_fixed(err_neg, precision),
            err_pos: format_fixed(err_pos, precision),
            exponent: None,
        },
        NumberFormat::General(sig_figs) => Layout {
            value: round_to_sig_figs(value, sig_figs),
            err_neg: round_to_sig_figs(err_neg, sig_figs),
            err_pos: round_to_sig_figs(err_pos, sig_figs),
            exponent: None,
        },
        NumberFormat::Scientific(precision) => {
            let rendered = format_exponential(value, precision);
            let parts = NumParts::split(&rendered);
            let scale = 10f64.powi(-parts.exponent_value());
            Layout {
                value: NumParts {
                    exponent: None,
                    ..parts
                }
                .join(),
                err_neg: format_fixed(err_neg * scale, precision),
                err_pos: format_fixed(err_pos * scale, precision),
                exponent: Some(typeset_exponent(parts.exponent.unwrap_or(""))),
            }
        }
    }
}

fn typeset_exponent(exponent: &str) -> String {
    exponent.trim_start_matches('+').to_string()
}

/// Rendered pieces of a value with errors.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Layout {
    value: String,
    err_neg: String,
    err_pos: String,
    /// Power of ten for scientific layout.
    exponent: Option<String>,
}

impl Layout {
    /// Symmetric when the rendered errors are identical strings.
    fn render(&self) -> String {
        let symmetric = self.err_neg == self.err_pos;
        match (&self.exponent, symmetric) {
            (None, true) => format!("$ {} \\pm {} $", self.value, self.err_neg),
            (None, false) => format!(
                "${}_{{-{}}}^{{+{}}}$",
                self.value, self.err_neg, self.err_pos
            ),
            (Some(exp), true) => format!(
                "$({} \\pm {}) \\times 10^{{{}}}$",
                self.value, self.err_neg, exp
            ),
            (Some(exp), false) => format!(
                "${}_{{-{}}}^{{+{}}} \\times 10^{{{}}}$",
                self.value, self.err_neg, self.err_pos, exp
            ),
        }
    }
}
