//! Fuzz target for the uncertainty formatter.
//!
//! Checks that formatting never panics for any value, error pair, significant
//! figure count or format token.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scicat::format::{Formatter, FormatterConfig, NumberFormat};

#[derive(Debug, Arbitrary)]
struct Input {
    value: f64,
    err_neg: Option<f64>,
    err_pos: Option<f64>,
    sig_figs: u8,
    force: bool,
    format: String,
}

fuzz_target!(|input: Input| {
    // Keep digit counts small enough to format quickly
    let sig_figs = usize::from(input.sig_figs % 8);
    let format = input
        .format
        .parse::<NumberFormat>()
        .ok()
        .filter(|f| match *f {
            NumberFormat::Fixed(p) | NumberFormat::General(p) | NumberFormat::Scientific(p) => {
                p < 32
            }
        });

    let formatter = Formatter::with_config(
        FormatterConfig::default()
            .with_error_sig_figs(sig_figs)
            .with_force_format(input.force),
    );
    let _ = formatter.format(input.value, input.err_neg, input.err_pos, format.as_ref());
});
