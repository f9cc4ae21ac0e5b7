use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the uploaded table
// ---------------------------------------------------------------------------

/// A cell exactly as the underlying reader yields it.
///
/// Delimited text only ever produces `Text` and `Empty`; spreadsheets keep
/// their native cell types. No coercion happens beyond that.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the parsed table
// ---------------------------------------------------------------------------

/// Header row plus data rows of the first sheet/table of an uploaded file.
///
/// Column names are not unique in general, so everything downstream refers to
/// columns by position. Rows may be shorter than the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Split a list of raw rows into header (first row) and data rows.
    ///
    /// Data rows are cut to the header width; a row left with only empty
    /// cells after that is dropped.
    pub fn from_rows(mut rows: Vec<Vec<CellValue>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let header: Vec<String> = rows
            .remove(0)
            .into_iter()
            .map(|cell| cell.to_string())
            .collect();

        let width = header.len();
        let rows = rows
            .into_iter()
            .filter_map(|mut row| {
                row.truncate(width);
                while row.last().is_some_and(CellValue::is_empty) {
                    row.pop();
                }
                (!row.is_empty()).then_some(row)
            })
            .collect();
        Dataset { header, rows }
    }

    /// Number of columns declared by the header.
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_columns(&self) -> bool {
        !self.header.is_empty()
    }

    /// Name of the column at `index`, if it exists.
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.header.get(index).map(String::as_str)
    }

    /// Cell at (`row`, `col`); missing trailing cells read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }
}

// ---------------------------------------------------------------------------
// SourceFile – the uploaded bytes, kept for the outbound request
// ---------------------------------------------------------------------------

/// The file exactly as the user picked it.
///
/// The analysis service re-parses the original bytes, so these (not the
/// parsed [`Dataset`]) are what gets attached to a request.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        SourceFile {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn first_row_becomes_header() {
        let ds = Dataset::from_rows(vec![
            vec![text("t"), text("v")],
            vec![text("1"), text("5")],
            vec![text("2")],
        ]);
        assert_eq!(ds.header, vec!["t", "v"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.cell(1, 0), &text("2"));
        assert_eq!(ds.cell(1, 1), &CellValue::Empty);
        assert_eq!(ds.cell(9, 9), &CellValue::Empty);
    }

    #[test]
    fn rows_wider_than_the_header_are_cut() {
        let ds = Dataset::from_rows(vec![
            vec![text("a"), text("b")],
            vec![text("1"), text("2"), text("3")],
            vec![CellValue::Empty, CellValue::Empty, text("x")],
            vec![text("4"), CellValue::Empty, text("y")],
        ]);
        assert_eq!(ds.rows, vec![vec![text("1"), text("2")], vec![text("4")]]);
    }

    #[test]
    fn typed_header_cells_render_as_text() {
        let ds = Dataset::from_rows(vec![vec![
            CellValue::Int(2024),
            CellValue::Float(1.5),
            CellValue::Empty,
            CellValue::Bool(true),
        ]]);
        assert_eq!(ds.header, vec!["2024", "1.5", "", "true"]);
        assert!(ds.is_empty());
        assert!(ds.has_columns());
    }

    #[test]
    fn no_rows_is_an_empty_dataset() {
        let ds = Dataset::from_rows(Vec::new());
        assert!(!ds.has_columns());
        assert!(ds.is_empty());
        assert_eq!(ds.column_name(0), None);
    }

    #[test]
    fn duplicate_names_are_kept_positionally() {
        let ds = Dataset::from_rows(vec![vec![text("a"), text("a")]]);
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.column_name(1), Some("a"));
    }
}
