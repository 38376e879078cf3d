//! Decimal string helpers: printf-style rendering, significant-figure rounding and
//! digit-place arithmetic.
//!
//! Digit places follow `round()` conventions: the units place is 0, tens is 1,
//! tenths is -1.

use std::iter;

/// A numeric string split into integer part, fractional part and exponent.
///
/// `fraction` is `Some("")` when the string carries a bare decimal point (`"10."`),
/// which marks the units digit as significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumParts<'a> {
    pub integer: &'a str,
    pub fraction: Option<&'a str>,
    pub exponent: Option<&'a str>,
}

impl<'a> NumParts<'a> {
    /// Split a decimal or scientific string.
    pub fn split(numstr: &'a str) -> Self {
        let (mantissa, exponent) = match numstr.find(['e', 'E']) {
            Some(i) => (&numstr[..i], Some(&numstr[i + 1..])),
            None => (numstr, None),
        };
        let (integer, fraction) = match mantissa.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (mantissa, None),
        };
        Self {
            integer,
            fraction,
            exponent,
        }
    }

    /// Exponent as an integer, 0 when absent.
    pub fn exponent_value(&self) -> i32 {
        self.exponent
            .and_then(|e| e.parse::<i32>().ok())
            .unwrap_or(0)
    }

    /// Integer digits without a sign.
    fn integer_digits(&self) -> &'a str {
        self.integer.trim_start_matches(['-', '+'])
    }

    /// Reassemble into a string.
    pub fn join(&self) -> String {
        let mut s = self.integer.to_string();
        if let Some(fraction) = self.fraction {
            s.push('.');
            s.push_str(fraction);
        }
        if let Some(exponent) = self.exponent {
            s.push('e');
            s.push_str(exponent);
        }
        s
    }
}

/// Fixed-point rendering with `precision` decimals.
pub fn format_fixed(x: f64, precision: usize) -> String {
    format!("{:.*}", precision, x)
}

/// Scientific rendering with `precision` mantissa decimals and a signed, two-digit
/// exponent (`1.234500e+00`).
pub fn format_exponential(x: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, x);
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            format!("{}e{}", mantissa, signed_exponent(exp))
        }
        None => raw,
    }
}

/// General rendering with `sig_figs` significant figures.
///
/// Chooses fixed-point when the decimal exponent lies in `[-4, sig_figs)` and
/// scientific otherwise, then drops trailing zeros and a dangling decimal point.
pub fn format_general(x: f64, sig_figs: usize) -> String {
    let n = sig_figs.max(1);
    if !x.is_finite() {
        return x.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{:.*e}", n - 1, x);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= n as i32 {
        format!("{}e{}", strip_trailing_zeros(mantissa), signed_exponent(exp))
    } else {
        let precision = (n as i32 - 1 - exp) as usize;
        strip_trailing_zeros(&format_fixed(x, precision)).to_string()
    }
}

/// Round `x` to `sig_figs` significant figures.
///
/// General rendering drops trailing zeros; they are restored here so the result
/// shows exactly `sig_figs` digits. A bare decimal point is appended when a
/// trailing zero of an integer result is itself significant, so `9.96` at two
/// figures is `"10."` and at three figures `"9.96"`, while `9.996` at three
/// figures is `"10.0"`.
pub fn round_to_sig_figs(x: f64, sig_figs: usize) -> String {
    let n = sig_figs.max(1);
    let general = format_general(x, n);
    if !x.is_finite() {
        return general;
    }

    let parts = NumParts::split(&general);
    let shown = significant_digit_count(&parts);
    let has_leading_digit = !parts.integer_digits().trim_start_matches('0').is_empty();

    if shown < n {
        let padded: String = parts
            .fraction
            .unwrap_or("")
            .chars()
            .chain(iter::repeat('0').take(n - shown))
            .collect();
        NumParts {
            fraction: Some(&padded),
            ..parts
        }
        .join()
    } else if parts.fraction.is_none() && has_leading_digit && parts.integer.ends_with('0') {
        NumParts {
            fraction: Some(""),
            ..parts
        }
        .join()
    } else {
        general
    }
}

/// Place of the least significant digit shown in `numstr`.
///
/// With a decimal point present the last fractional digit is significant; without
/// one, trailing integer zeros are treated as placeholders.
pub fn least_significant_digit_place(numstr: &str) -> i32 {
    let parts = NumParts::split(numstr);
    let exp = parts.exponent_value();
    match parts.fraction {
        Some(fraction) => exp - fraction.len() as i32,
        None => {
            let digits = parts.integer_digits();
            let kept = digits.trim_end_matches('0');
            if kept.is_empty() {
                exp
            } else {
                exp + (digits.len() - kept.len()) as i32
            }
        }
    }
}

/// Place of the most significant digit shown in `numstr`.
pub fn most_significant_digit_place(numstr: &str) -> i32 {
    let parts = NumParts::split(numstr);
    let exp = parts.exponent_value();
    let leading = parts.integer_digits().trim_start_matches('0');
    if !leading.is_empty() {
        return exp + leading.len() as i32 - 1;
    }
    // zero integer part: count the zeros that open the fraction
    let fraction = parts.fraction.unwrap_or("");
    let zeros = fraction.len() - fraction.trim_start_matches('0').len();
    exp - zeros as i32 - 1
}

/// Exponent with an explicit sign and at least two digits.
fn signed_exponent(exp: i32) -> String {
    format!("{}{:02}", if exp < 0 { '-' } else { '+' }, exp.unsigned_abs())
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Count the significant digits a rendering shows, ignoring leading zeros.
fn significant_digit_count(parts: &NumParts<'_>) -> usize {
    let fraction = parts.fraction.unwrap_or("");
    let digits: String = parts.integer_digits().chars().chain(fraction.chars()).collect();
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        fraction.len().max(1)
    } else {
        significant.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        let parts = NumParts::split("-1.25e-03");
        assert_eq!(parts.integer, "-1");
        assert_eq!(parts.fraction, Some("25"));
        assert_eq!(parts.exponent, Some("-03"));
        assert_eq!(parts.exponent_value(), -3);
        assert_eq!(parts.join(), "-1.25e-03");

        let parts = NumParts::split("10.");
        assert_eq!(parts.fraction, Some(""));
        assert_eq!(parts.exponent, None);
    }

    #[test]
    fn test_format_exponential() {
        assert_eq!(format_exponential(1.2345, 6), "1.234500e+00");
        assert_eq!(format_exponential(0.0000123, 6), "1.230000e-05");
        assert_eq!(format_exponential(-45000.0, 2), "-4.50e+04");
        assert_eq!(format_exponential(0.0, 6), "0.000000e+00");
    }

    #[test]
    fn test_format_general() {
        assert_eq!(format_general(9.96, 2), "10");
        assert_eq!(format_general(9.96, 1), "1e+01");
        assert_eq!(format_general(0.5, 3), "0.5");
        assert_eq!(format_general(4e-7, 2), "4e-07");
        assert_eq!(format_general(0.0001234, 2), "0.00012");
        assert_eq!(format_general(123456.0, 3), "1.23e+05");
        assert_eq!(format_general(0.0, 2), "0");
    }

    #[test]
    fn test_round_to_sig_figs() {
        assert_eq!(round_to_sig_figs(9.96, 2), "10.");
        assert_eq!(round_to_sig_figs(9.96, 3), "9.96");
        assert_eq!(round_to_sig_figs(9.996, 3), "10.0");
        assert_eq!(round_to_sig_figs(0.02, 1), "0.02");
        assert_eq!(round_to_sig_figs(0.5, 3), "0.500");
        assert_eq!(round_to_sig_figs(2.0, 3), "2.00");
        assert_eq!(round_to_sig_figs(4e-7, 2), "4.0e-07");
        assert_eq!(round_to_sig_figs(0.0346, 2), "0.035");
        assert_eq!(round_to_sig_figs(1234.0, 2), "1.2e+03");
        assert_eq!(round_to_sig_figs(0.0, 2), "0.0");
    }

    #[test]
    fn test_least_significant_digit_place() {
        assert_eq!(least_significant_digit_place("0.02"), -2);
        assert_eq!(least_significant_digit_place("4"), 0);
        assert_eq!(least_significant_digit_place("1200"), 2);
        assert_eq!(least_significant_digit_place("10."), 0);
        assert_eq!(least_significant_digit_place("4e-07"), -7);
        assert_eq!(least_significant_digit_place("4.0e-07"), -8);
        assert_eq!(least_significant_digit_place("1.2e+03"), 2);
    }

    #[test]
    fn test_most_significant_digit_place() {
        assert_eq!(most_significant_digit_place("1.234500e+00"), 0);
        assert_eq!(most_significant_digit_place("1.230000e-05"), -5);
        assert_eq!(most_significant_digit_place("12.3"), 1);
        assert_eq!(most_significant_digit_place("0.0035"), -3);
        assert_eq!(most_significant_digit_place("-450"), 2);
        assert_eq!(most_significant_digit_place("0"), -1);
    }
}
