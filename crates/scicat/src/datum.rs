//! Shared domain model: a measured value with paired errors and a reference.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal marker used for missing text and missing references.
pub const NULL_MARKER: &str = "none";

/// Leading mark on a stored cell that must reload as text, such as `'876` or `'NaN`.
pub const TEXT_TAG: char = '\'';

/// A single table value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Datum {
    /// Numeric measurement.
    Number(f64),
    /// Categorical or otherwise non-numeric entry, exempt from numeric formatting.
    Text(String),
    /// No data.
    #[default]
    Null,
}

impl Datum {
    /// Check whether this datum carries no data.
    ///
    /// Non-finite numbers and the text `none` (any case) or empty text count as null.
    pub fn is_null(&self) -> bool {
        match self {
            Datum::Number(x) => !x.is_finite(),
            Datum::Text(s) => is_null_text(s),
            Datum::Null => true,
        }
    }

    /// The numeric value, if this is a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Datum::Number(x) if x.is_finite() => Some(*x),
            _ => None,
        }
    }

    /// The text value, if this is non-null text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Datum::Text(s) if !is_null_text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret a raw table cell: empty or `nan` is null, numbers parse, anything else is text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case(NULL_MARKER)
        {
            return Datum::Null;
        }
        match trimmed.parse::<f64>() {
            Ok(x) if x.is_finite() => Datum::Number(x),
            Ok(_) => Datum::Null,
            Err(_) => Datum::Text(trimmed.to_string()),
        }
    }

    /// Stored cell text, or `None` for null.
    ///
    /// Text that [`Datum::parse`] would not give back unchanged is prefixed
    /// with [`TEXT_TAG`].
    pub fn to_cell(&self) -> Option<String> {
        match self {
            Datum::Number(x) if x.is_finite() => Some(number_text(*x)),
            Datum::Text(s) if !is_null_text(s) => {
                let plain = !s.starts_with(TEXT_TAG)
                    && matches!(Datum::parse(s), Datum::Text(ref parsed) if parsed == s);
                Some(if plain { s.clone() } else { format!("{}{}", TEXT_TAG, s) })
            }
            _ => None,
        }
    }

    /// Inverse of [`Datum::to_cell`]: a tagged cell is text verbatim, anything else parses.
    pub fn from_cell(raw: &str) -> Self {
        match raw.strip_prefix(TEXT_TAG) {
            Some(text) => Datum::Text(text.to_string()),
            None => Datum::parse(raw),
        }
    }
}

impl From<f64> for Datum {
    fn from(x: f64) -> Self {
        Datum::Number(x)
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Datum::Text(s.to_string())
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Self {
        Datum::Text(s)
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Datum::Null)
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Number(x) if x.is_finite() => f.write_str(&number_text(*x)),
            Datum::Text(s) if !is_null_text(s) => f.write_str(s),
            _ => f.write_str("nan"),
        }
    }
}

/// Shortest text that parses back to `x`, switching to exponent form for very
/// small or very large magnitudes.
pub fn number_text(x: f64) -> String {
    let magnitude = x.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        format!("{:e}", x)
    } else {
        format!("{}", x)
    }
}

/// Check whether a piece of text is a null marker.
pub fn is_null_text(s: &str) -> bool {
    let trimmed = s.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NULL_MARKER)
}

/// One logical measurement: value, positive error, negative error and reference key.
///
/// Errors and reference are kept even when the value is null, so stored tables
/// round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entry {
    /// The measured value.
    pub value: Datum,
    /// Positive (upper) error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_pos: Option<f64>,
    /// Negative (lower) error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_neg: Option<f64>,
    /// Reference key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Entry {
    /// Create an entry holding only a value.
    pub fn new(value: impl Into<Datum>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// An entry with every field null.
    pub fn null() -> Self {
        Self::default()
    }

    /// Set both errors to the same magnitude.
    pub fn with_error(mut self, err: f64) -> Self {
        self.err_pos = Some(err);
        self.err_neg = Some(err);
        self
    }

    /// Set the negative and positive errors.
    pub fn with_errors(mut self, err_neg: f64, err_pos: f64) -> Self {
        self.err_neg = Some(err_neg);
        self.err_pos = Some(err_pos);
        self
    }

    /// Set the reference key.
    pub fn with_reference(mut self, key: impl Into<String>) -> Self {
        self.reference = Some(key.into());
        self
    }

    /// Read one of the four fields as a datum.
    pub fn field(&self, field: Field) -> Datum {
        match field {
            Field::Value => self.value.clone(),
            Field::ErrPos => Datum::from(self.err_pos),
            Field::ErrNeg => Datum::from(self.err_neg),
            Field::Reference => Datum::from(self.reference.clone()),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let err = |e: Option<f64>| e.map_or_else(|| "nan".to_string(), number_text);
        write!(
            f,
            "{} (+{}, -{}) [{}]",
            self.value,
            err(self.err_pos),
            err(self.err_neg),
            self.reference.as_deref().unwrap_or(NULL_MARKER)
        )
    }
}

/// One of the four parallel stores that make up a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Value,
    ErrPos,
    ErrNeg,
    Reference,
}

impl Field {
    /// All fields, in on-disk table order.
    pub const ALL: [Field; 4] = [Field::Value, Field::ErrPos, Field::ErrNeg, Field::Reference];

    /// File stem of the table holding this field.
    pub fn table_name(&self) -> &'static str {
        match self {
            Field::Value => "values",
            Field::ErrPos => "errors_positive",
            Field::ErrNeg => "errors_negative",
            Field::Reference => "references",
        }
    }

    /// Null marker written to this field's table.
    pub fn null_marker(&self) -> &'static str {
        match self {
            Field::Reference => NULL_MARKER,
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datum_parse() {
        assert_eq!(Datum::parse("1.5"), Datum::Number(1.5));
        assert_eq!(Datum::parse("-2e-3"), Datum::Number(-0.002));
        assert_eq!(Datum::parse(""), Datum::Null);
        assert_eq!(Datum::parse("NaN"), Datum::Null);
        assert_eq!(Datum::parse("None"), Datum::Null);
        assert_eq!(Datum::parse("inf"), Datum::Null);
        assert_eq!(Datum::parse("M4.5V"), Datum::Text("M4.5V".to_string()));
    }

    #[test]
    fn test_numeric_looking_text_survives_cells() {
        for text in ["876", "NaN", "inf", "'quoted", " K2 "] {
            let datum = Datum::Text(text.to_string());
            let cell = datum.to_cell().unwrap();
            assert!(cell.starts_with(TEXT_TAG), "{cell}");
            assert_eq!(Datum::from_cell(&cell), datum);
        }
        assert_eq!(Datum::Text("M4.5V".to_string()).to_cell().as_deref(), Some("M4.5V"));
        assert_eq!(Datum::Number(876.0).to_cell().as_deref(), Some("876"));
        assert_eq!(Datum::from_cell("876"), Datum::Number(876.0));
        assert_eq!(Datum::Text("none".to_string()).to_cell(), None);
        assert_eq!(Datum::Number(f64::NAN).to_cell(), None);
    }

    #[test]
    fn test_datum_is_null() {
        assert!(Datum::Null.is_null());
        assert!(Datum::Number(f64::NAN).is_null());
        assert!(Datum::Text("NONE".to_string()).is_null());
        assert!(!Datum::Number(0.0).is_null());
        assert!(!Datum::Text("K2".to_string()).is_null());
    }

    #[test]
    fn test_number_text() {
        assert_eq!(number_text(0.25), "0.25");
        assert_eq!(number_text(1e-7), "1e-7");
        assert_eq!(number_text(-3.5e20), "-3.5e20");
        assert_eq!(number_text(0.0), "0");
        assert_eq!(number_text(1e-7).parse::<f64>().unwrap(), 1e-7);
    }

    #[test]
    fn test_entry_display() {
        let entry = Entry::new(1.5).with_errors(0.1, 0.2).with_reference("loyd16");
        assert_eq!(entry.to_string(), "1.5 (+0.2, -0.1) [loyd16]");
        assert_eq!(Entry::null().to_string(), "nan (+nan, -nan) [none]");
    }

    #[test]
    fn test_entry_field() {
        let entry = Entry::new(3.0).with_error(0.5);
        assert_eq!(entry.field(Field::Value), Datum::Number(3.0));
        assert_eq!(entry.field(Field::ErrNeg), Datum::Number(0.5));
        assert_eq!(entry.field(Field::Reference), Datum::Null);
    }
}
