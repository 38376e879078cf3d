//! Integration tests for AASTeX table export.

use tempfile::TempDir;

use scicat::export::{ExportConfig, ExportTable, Exporter};
use scicat::{Datum, ScicatError};

fn text(s: &str) -> Datum {
    Datum::Text(s.to_string())
}

fn some(s: &str) -> Option<String> {
    Some(s.to_string())
}

struct Stars {
    values: Vec<Vec<Datum>>,
    errors: Vec<Vec<Option<f64>>>,
    notes: Vec<Vec<Option<String>>>,
    references: Vec<Vec<Option<String>>>,
}

fn stars() -> Stars {
    Stars {
        values: vec![
            vec![text("GJ 876"), Datum::Number(3129.0)],
            vec![text("GJ 581"), Datum::Number(3480.0)],
            vec![text("GJ 1214"), Datum::Null],
        ],
        errors: vec![
            vec![None, Some(19.0)],
            vec![None, Some(48.0)],
            vec![None, None],
        ],
        notes: vec![
            vec![None, None],
            vec![some("flare star"), None],
            vec![some("flare star"), some("none")],
        ],
        references: vec![
            vec![None, some("vb14")],
            vec![None, some("vb14, mann15")],
            vec![None, None],
        ],
    }
}

impl Stars {
    fn table(&self) -> ExportTable<'_> {
        ExportTable::new(&self.values)
            .with_errors(&self.errors)
            .with_notes(&self.notes)
            .with_references(&self.references)
    }
}

#[test]
fn test_compact_references() {
    let data = stars();
    let exporter = Exporter::with_config(ExportConfig::default().with_compact_refs(true));
    let lines = exporter.render(&data.table()).unwrap();

    assert_eq!(
        lines,
        vec![
            r"\startdata",
            r"GJ 876 & $ 3129 \pm 19 $ & 1\\",
            r"GJ 581\tablenotemark{a} & $ 3480 \pm 48 $ & 1,2\\",
            r"GJ 1214\tablenotemark{a} & \nodata & \\",
            r"\enddata",
            "",
            r"\tablenotetext{a}{flare star}",
            "",
            r"\tablerefs{(1) \citealt{vb14}; (2) \citealt{mann15}}",
            "",
        ]
    );
}

#[test]
fn test_expanded_references() {
    let data = stars();
    let lines = Exporter::new().render(&data.table()).unwrap();

    assert_eq!(lines[1], r"GJ 876 & $ 3129 \pm 19 $ & \citet{vb14}\\");
    assert_eq!(
        lines[2],
        r"GJ 581\tablenotemark{a} & $ 3480 \pm 48 $ & \citet{vb14},\citet{mann15}\\"
    );
    assert!(!lines.iter().any(|l| l.starts_with(r"\tablerefs")));
}

#[test]
fn test_asymmetric_error_tables() {
    let values = vec![vec![Datum::Number(1.2345)]];
    let negative = vec![vec![Some(0.021)]];
    let positive = vec![vec![Some(0.034)]];
    let lines = Exporter::new()
        .render(&ExportTable::new(&values).with_asymmetric_errors(&negative, &positive))
        .unwrap();
    assert_eq!(lines[1], r"$1.234_{-0.021}^{+0.034}$\\");
}

#[test]
fn test_write_to_joins_lines() {
    let values = vec![vec![text("x")]];
    let mut out = Vec::new();
    Exporter::new()
        .write_to(&ExportTable::new(&values), &mut out)
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "\\startdata\nx\\\\\n\\enddata\n\n");
}

#[test]
fn test_export_writes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.tex");
    let data = stars();
    let exporter = Exporter::with_config(ExportConfig::default().with_header("% Table 1"));

    exporter.export(&path, &data.table()).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("% Table 1\n\\startdata\n"));
    assert!(written.contains("\\tablenotetext{a}{flare star}"));
}

#[test]
fn test_mismatched_rows_fail_before_writing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.tex");
    let data = stars();
    let short_errors = vec![vec![None, Some(19.0)]];

    let result = Exporter::new().export(
        &path,
        &ExportTable::new(&data.values).with_errors(&short_errors),
    );
    assert!(matches!(result, Err(ScicatError::Dimension(_))));
    assert!(!path.exists());
}

#[test]
fn test_ragged_reference_row_rejected() {
    let data = stars();
    let mut references = data.references.clone();
    references[1].pop();

    let table = ExportTable::new(&data.values).with_references(&references);
    let result = Exporter::new().render(&table);
    assert!(matches!(result, Err(ScicatError::Dimension(_))));
}
