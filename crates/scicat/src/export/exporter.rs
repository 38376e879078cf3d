//! Render tables of values, errors, notes and references as AASTeX data blocks.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::datum::{is_null_text, Datum};
use crate::error::{Result, ScicatError};
use crate::format::{Formatter, FormatterConfig, NumberFormat, DEFAULT_ERROR_SIG_FIGS, NO_DATA};

use super::notes::{split_keys, NoteMarks, ReferenceNumbers};

const START_DATA: &str = r"\startdata";
const END_DATA: &str = r"\enddata";
const COLUMN_SEPARATOR: &str = " & ";
const ROW_END: &str = r"\\";

/// Export configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Number references and list them after the data block instead of citing inline.
    pub compact_refs: bool,
    /// Significant figures shown on errors.
    pub error_sig_figs: usize,
    /// Explicit format per column. Required for numeric columns without errors.
    pub column_formats: Option<Vec<Option<NumberFormat>>>,
    /// Use the column format even for values with errors.
    pub force_format: bool,
    /// Text placed verbatim above the data block.
    pub header: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            compact_refs: false,
            error_sig_figs: DEFAULT_ERROR_SIG_FIGS,
            column_formats: None,
            force_format: false,
            header: None,
        }
    }
}

impl ExportConfig {
    pub fn with_compact_refs(mut self, compact: bool) -> Self {
        self.compact_refs = compact;
        self
    }

    pub fn with_error_sig_figs(mut self, sig_figs: usize) -> Self {
        self.error_sig_figs = sig_figs;
        self
    }

    pub fn with_column_formats(mut self, formats: Vec<Option<NumberFormat>>) -> Self {
        self.column_formats = Some(formats);
        self
    }

    pub fn with_force_format(mut self, force: bool) -> Self {
        self.force_format = force;
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

/// Error tables accompanying the values.
#[derive(Debug, Clone, Copy)]
pub enum ErrorTables<'a> {
    /// One table used for both sides.
    Symmetric(&'a [Vec<Option<f64>>]),
    /// Separate negative and positive tables.
    Asymmetric {
        negative: &'a [Vec<Option<f64>>],
        positive: &'a [Vec<Option<f64>>],
    },
}

impl<'a> ErrorTables<'a> {
    fn at(&self, row: usize, column: usize) -> (Option<f64>, Option<f64>) {
        let cell = |table: &[Vec<Option<f64>>]| table[row][column];
        match *self {
            ErrorTables::Symmetric(table) => (cell(table), cell(table)),
            ErrorTables::Asymmetric { negative, positive } => (cell(negative), cell(positive)),
        }
    }

    fn tables(&self) -> Vec<(&'static str, &'a [Vec<Option<f64>>])> {
        match *self {
            ErrorTables::Symmetric(table) => vec![("errors", table)],
            ErrorTables::Asymmetric { negative, positive } => {
                vec![("negative errors", negative), ("positive errors", positive)]
            }
        }
    }
}

/// The row-major data of one table to export.
#[derive(Debug, Clone, Copy)]
pub struct ExportTable<'a> {
    values: &'a [Vec<Datum>],
    errors: Option<ErrorTables<'a>>,
    notes: Option<&'a [Vec<Option<String>>]>,
    references: Option<&'a [Vec<Option<String>>]>,
}

impl<'a> ExportTable<'a> {
    pub fn new(values: &'a [Vec<Datum>]) -> Self {
        Self {
            values,
            errors: None,
            notes: None,
            references: None,
        }
    }

    /// One error table applied to both sides.
    pub fn with_errors(mut self, errors: &'a [Vec<Option<f64>>]) -> Self {
        self.errors = Some(ErrorTables::Symmetric(errors));
        self
    }

    /// Separate negative and positive error tables.
    pub fn with_asymmetric_errors(
        mut self,
        negative: &'a [Vec<Option<f64>>],
        positive: &'a [Vec<Option<f64>>],
    ) -> Self {
        self.errors = Some(ErrorTables::Asymmetric { negative, positive });
        self
    }

    /// Footnote text per cell.
    pub fn with_notes(mut self, notes: &'a [Vec<Option<String>>]) -> Self {
        self.notes = Some(notes);
        self
    }

    /// Comma-separated reference keys per cell.
    pub fn with_references(mut self, references: &'a [Vec<Option<String>>]) -> Self {
        self.references = Some(references);
        self
    }

    fn column_count(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    /// Check that every supplied table matches the shape of the values.
    fn validate(&self) -> Result<()> {
        let (rows, columns) = (self.values.len(), self.column_count());

        fn check<T>(name: &str, table: &[Vec<T>], rows: usize, columns: usize) -> Result<()> {
            if table.len() != rows {
                return Err(ScicatError::Dimension(format!(
                    "{} has {} rows, values have {}",
                    name,
                    table.len(),
                    rows
                )));
            }
            match table.iter().position(|row| row.len() != columns) {
                Some(i) => Err(ScicatError::Dimension(format!(
                    "row {} of {} has {} cells, expected {}",
                    i,
                    name,
                    table[i].len(),
                    columns
                ))),
                None => Ok(()),
            }
        }

        check("values", self.values, rows, columns)?;
        if let Some(errors) = &self.errors {
            for (name, table) in errors.tables() {
                check(name, table, rows, columns)?;
            }
        }
        if let Some(notes) = self.notes {
            check("notes", notes, rows, columns)?;
        }
        if let Some(references) = self.references {
            check("references", references, rows, columns)?;
        }
        Ok(())
    }
}

/// Renders tables as the body of an AASTeX `deluxetable`.
///
/// Each output row is the cells joined by ` & ` and terminated by `\\`. A cell
/// is followed by a reference cell when its column has any references. Note
/// and reference legends follow `\enddata`.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render the table as lines, without writing anything.
    pub fn render(&self, table: &ExportTable<'_>) -> Result<Vec<String>> {
        table.validate()?;
        let columns = table.column_count();
        if let Some(formats) = &self.config.column_formats {
            if formats.len() != columns {
                return Err(ScicatError::Dimension(format!(
                    "{} column formats for {} columns",
                    formats.len(),
                    columns
                )));
            }
        }

        let formatter = Formatter::with_config(
            FormatterConfig::default()
                .with_error_sig_figs(self.config.error_sig_figs)
                .with_force_format(self.config.force_format),
        );

        let has_refs: Vec<bool> = (0..columns)
            .map(|c| {
                table.references.is_some_and(|refs| {
                    refs.iter()
                        .any(|row| row[c].as_deref().is_some_and(|r| !is_null_text(r)))
                })
            })
            .collect();

        let mut notes = NoteMarks::new();
        let mut numbers = ReferenceNumbers::new();
        let mut lines: Vec<String> = self.config.header.iter().cloned().collect();
        lines.push(START_DATA.to_string());

        for (r, row) in table.values.iter().enumerate() {
            let mut items = Vec::with_capacity(columns * 2);
            for (c, value) in row.iter().enumerate() {
                let mut item = self.render_value(&formatter, table, value, r, c)?;
                let note = table.notes.and_then(|n| n[r][c].as_deref());
                if let Some(mark) = notes.mark(note) {
                    item.push_str(&format!("\\tablenotemark{{{}}}", mark));
                }
                items.push(item);

                if has_refs[c] {
                    let cell = table
                        .references
                        .and_then(|refs| refs[r][c].as_deref())
                        .filter(|cell| !is_null_text(cell))
                        .unwrap_or_default();
                    items.push(self.render_references(cell, &mut numbers));
                }
            }
            lines.push(format!("{}{}", items.join(COLUMN_SEPARATOR), ROW_END));
        }

        lines.push(END_DATA.to_string());
        lines.push(String::new());
        for (mark, note) in notes.legend() {
            lines.push(format!("\\tablenotetext{{{}}}{{{}}}", mark, note));
        }
        lines.push(String::new());

        if self.config.compact_refs && table.references.is_some() {
            let legend: Vec<String> = numbers
                .keys()
                .enumerate()
                .map(|(i, key)| format!("({}) \\citealt{{{}}}", i + 1, key))
                .collect();
            lines.push(format!("\\tablerefs{{{}}}", legend.join("; ")));
            lines.push(String::new());
        }

        debug!(rows = table.values.len(), columns, notes = !notes.is_empty(), "rendered table");
        Ok(lines)
    }

    /// Render the table and write it to `writer`.
    pub fn write_to<W: Write>(&self, table: &ExportTable<'_>, mut writer: W) -> Result<()> {
        let lines = self.render(table)?;
        writer
            .write_all(lines.join("\n").as_bytes())
            .and_then(|()| writer.flush())
            .map_err(ScicatError::Write)
    }

    /// Render the table and write it to a file, replacing any existing one.
    ///
    /// Nothing is created when the table fails validation.
    pub fn export(&self, path: impl AsRef<Path>, table: &ExportTable<'_>) -> Result<()> {
        let path = path.as_ref();
        let lines = self.render(table)?;
        let file = File::create(path).map_err(|e| ScicatError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(lines.join("\n").as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| ScicatError::io(path, e))?;
        debug!(path = %path.display(), "exported table");
        Ok(())
    }

    fn render_value(
        &self,
        formatter: &Formatter,
        table: &ExportTable<'_>,
        value: &Datum,
        row: usize,
        column: usize,
    ) -> Result<String> {
        match value {
            Datum::Text(text) if !is_null_text(text) => Ok(text.clone()),
            Datum::Number(x) => {
                let (err_neg, err_pos) = table
                    .errors
                    .map_or((None, None), |errors| errors.at(row, column));
                let format = self
                    .config
                    .column_formats
                    .as_ref()
                    .and_then(|formats| formats[column].as_ref());
                formatter.format(*x, err_neg, err_pos, format)
            }
            _ => Ok(NO_DATA.to_string()),
        }
    }

    fn render_references(&self, cell: &str, numbers: &mut ReferenceNumbers) -> String {
        let keys = split_keys(cell);
        if self.config.compact_refs {
            keys.iter()
                .map(|key| numbers.number(key).to_string())
                .collect::<Vec<_>>()
                .join(",")
        } else {
            keys.iter()
                .map(|key| format!("\\citet{{{}}}", key))
                .collect::<Vec<_>>()
                .join(",")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(precision: usize) -> Option<NumberFormat> {
        Some(NumberFormat::Fixed(precision))
    }

    #[test]
    fn test_render_plain_table() {
        let values = vec![
            vec![Datum::Text("GJ 876".to_string()), Datum::Number(0.334)],
            vec![Datum::Text("none".to_string()), Datum::Null],
        ];
        let config = ExportConfig::default().with_column_formats(vec![None, fixed(2)]);
        let exporter = Exporter::with_config(config);
        let lines = exporter.render(&ExportTable::new(&values)).unwrap();

        assert_eq!(
            lines,
            vec![
                r"\startdata",
                r"GJ 876 & 0.33\\",
                r"\nodata & \nodata\\",
                r"\enddata",
                "",
                "",
            ]
        );
    }

    #[test]
    fn test_header_is_first_line() {
        let values = vec![vec![Datum::Text("x".to_string())]];
        let exporter = Exporter::with_config(ExportConfig::default().with_header("\\tablehead{}"));
        let lines = exporter.render(&ExportTable::new(&values)).unwrap();
        assert_eq!(lines[0], "\\tablehead{}");
        assert_eq!(lines[1], START_DATA);
    }

    #[test]
    fn test_symmetric_error_table_applies_to_both_sides() {
        let values = vec![vec![Datum::Number(5.0)]];
        let errors = vec![vec![Some(0.1)]];
        let lines = Exporter::new()
            .render(&ExportTable::new(&values).with_errors(&errors))
            .unwrap();
        assert_eq!(lines[1], r"$ 5.00 \pm 0.10 $\\");
    }

    #[test]
    fn test_column_format_count_mismatch() {
        let values = vec![vec![Datum::Number(1.0), Datum::Number(2.0)]];
        let config = ExportConfig::default().with_column_formats(vec![fixed(1)]);
        let exporter = Exporter::with_config(config);
        assert!(matches!(
            exporter.render(&ExportTable::new(&values)),
            Err(ScicatError::Dimension(_))
        ));
    }

    #[test]
    fn test_ragged_notes_rejected() {
        let values = vec![vec![Datum::Text("a".to_string())], vec![Datum::Text("b".to_string())]];
        let notes = vec![vec![None]];
        assert!(matches!(
            Exporter::new().render(&ExportTable::new(&values).with_notes(&notes)),
            Err(ScicatError::Dimension(_))
        ));
    }
}
