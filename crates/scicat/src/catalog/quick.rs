//! Single-cell reads that skip loading the whole catalog.

use std::path::Path;

use crate::datum::{Datum, Field};
use crate::error::{Result, ScicatError};
use crate::storage::read_grid;

use super::layout::{parse_reference, CatalogLayout};

/// Read one field of one entry straight from its table file.
///
/// Only the table holding `field` is read, no lock is taken and the reference
/// dictionary is ignored.
pub fn quick_lookup(
    root: impl AsRef<Path>,
    row: &str,
    column: &str,
    field: Field,
) -> Result<Datum> {
    let layout = CatalogLayout::new(root.as_ref());
    let table = read_grid(layout.table(field))?;

    let r = table
        .row_position(row)
        .ok_or_else(|| ScicatError::UnknownRow(row.to_string()))?;
    let c = table
        .column_position(column)
        .ok_or_else(|| ScicatError::UnknownColumn(column.to_string()))?;
    let raw = table.get_at(r, c).map(String::as_str).unwrap_or_default();

    Ok(match field {
        Field::Reference => parse_reference(raw).map_or(Datum::Null, Datum::Text),
        Field::Value => Datum::from_cell(raw),
        Field::ErrPos | Field::ErrNeg => Datum::parse(raw),
    })
}
