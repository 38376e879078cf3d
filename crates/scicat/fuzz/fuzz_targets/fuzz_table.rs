//! Fuzz target for catalog table and reference dictionary parsing.
//!
//! Malformed files must produce errors, never panics.

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use scicat::catalog::ReferenceDictionary;
use scicat::storage::parse_grid;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let path = Path::new("fuzz.csv");
    if let Ok(grid) = parse_grid(data, path) {
        assert_eq!(grid.rows().len(), grid.row_count());
        assert!(grid.rows().iter().all(|row| row.len() == grid.column_count()));
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = ReferenceDictionary::parse(text, Path::new("reference_dictionary.txt"));
    }
});
