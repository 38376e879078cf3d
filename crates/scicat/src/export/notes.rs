//! Footnote and compact-reference bookkeeping for a table export.

use indexmap::IndexMap;

use crate::datum::is_null_text;

/// Footnote mark for the `n`th distinct note: `a`..`z`, then `aa`, `ab`, ...
pub fn note_mark(n: usize) -> String {
    let mut mark = Vec::new();
    let mut k = n + 1;
    while k > 0 {
        k -= 1;
        mark.push(b'a' + (k % 26) as u8);
        k /= 26;
    }
    mark.reverse();
    String::from_utf8_lossy(&mark).into_owned()
}

/// Assigns marks to note texts in first-seen order.
#[derive(Debug, Default)]
pub struct NoteMarks {
    marks: IndexMap<String, String>,
}

impl NoteMarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark for a note, allocating one on first sight. Null notes get none.
    pub fn mark(&mut self, note: Option<&str>) -> Option<&str> {
        let note = note.filter(|n| !is_null_text(n))?;
        let next = note_mark(self.marks.len());
        Some(self.marks.entry(note.to_string()).or_insert(next).as_str())
    }

    /// `(mark, note)` pairs in allocation order.
    pub fn legend(&self) -> impl Iterator<Item = (&str, &str)> {
        self.marks
            .iter()
            .map(|(note, mark)| (mark.as_str(), note.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

/// Numbers reference keys from 1 in first-seen order.
#[derive(Debug, Default)]
pub struct ReferenceNumbers {
    keys: IndexMap<String, ()>,
}

impl ReferenceNumbers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number for a key, allocating one on first sight.
    pub fn number(&mut self, key: &str) -> usize {
        let (index, _) = self.keys.insert_full(key.to_string(), ());
        index + 1
    }

    /// Keys in numbering order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Split a reference cell into its comma-separated keys.
pub fn split_keys(cell: &str) -> Vec<&str> {
    cell.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect()
}
