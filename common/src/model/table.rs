use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single scalar read from a spreadsheet cell.
///
/// Serialised untagged, so a row travels as plain JSON: numbers stay numbers,
/// text stays a string and an empty cell becomes `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// True for `Empty` and for zero-length text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

/// One data row keyed by header name. Cells that were empty in the source
/// are absent rather than stored as `Empty`.
pub type Row = BTreeMap<String, CellValue>;

/// Headers plus row records produced by ingesting an uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl ParsedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}
