//! Typeset formatting of values with asymmetric uncertainties.
//!
//! The number of digits shown is driven by the errors: each error is rounded to
//! a fixed count of significant figures and the value is shown down to the
//! finest error digit, in fixed-point or scientific layout, whichever is shorter.

mod formatter;
mod numstr;

pub use formatter::{
    Formatter, FormatterConfig, NumberFormat, DEFAULT_ERROR_SIG_FIGS, NO_DATA,
};
pub use numstr::{
    format_exponential, format_fixed, format_general, least_significant_digit_place,
    most_significant_digit_place, round_to_sig_figs, NumParts,
};
