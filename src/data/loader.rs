use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader};

use super::model::{CellValue, Dataset, SourceFile};
use crate::error::ParseError;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
const OLE2_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Delimiters tried when sniffing delimited text, in tie-break order.
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Extensions offered by the open-file dialog.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt", "xls", "xlsx", "xlsm", "xlsb", "ods"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a file from disk into a [`SourceFile`] (name + raw bytes).
pub fn read_source(path: &Path) -> Result<SourceFile> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SourceFile::new(name, bytes))
}

/// Parse raw file bytes into a [`Dataset`].
///
/// The format is detected from the content; `name_hint` (usually the file
/// name) only picks the delimiter for text files with a `.tsv`/`.tab`
/// extension. The first row is always the header and only the first sheet of
/// a workbook is read.
pub fn parse(bytes: &[u8], name_hint: Option<&str>) -> Result<Dataset, ParseError> {
    match detect(bytes, name_hint)? {
        FileKind::Workbook => parse_workbook(bytes),
        FileKind::Delimited { text, delimiter } => parse_delimited(text, delimiter),
    }
}

// ---------------------------------------------------------------------------
// Format detection
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum FileKind<'a> {
    /// xlsx / xlsm / xlsb / ods (zip container) or legacy xls (OLE2).
    Workbook,
    Delimited { text: &'a str, delimiter: u8 },
}

fn detect<'a>(bytes: &'a [u8], name_hint: Option<&str>) -> Result<FileKind<'a>, ParseError> {
    if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(ZIP_EMPTY_MAGIC) || bytes.starts_with(OLE2_MAGIC) {
        log::debug!("detected spreadsheet container");
        return Ok(FileKind::Workbook);
    }

    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(body).map_err(|_| {
        ParseError::UnsupportedFormat("content is neither a spreadsheet nor UTF-8 text".to_string())
    })?;
    if text.contains('\0') {
        return Err(ParseError::UnsupportedFormat(
            "content looks binary but has no known spreadsheet signature".to_string(),
        ));
    }

    let delimiter = delimiter_from_hint(name_hint).unwrap_or_else(|| sniff_delimiter(text));
    log::debug!("detected delimited text, delimiter {:?}", delimiter as char);
    Ok(FileKind::Delimited { text, delimiter })
}

fn delimiter_from_hint(name_hint: Option<&str>) -> Option<u8> {
    let ext = Path::new(name_hint?)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match ext.as_str() {
        "tsv" | "tab" => Some(b'\t'),
        _ => None,
    }
}

/// Pick the candidate delimiter occurring most often on the first line.
fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or("");
    let mut best = (b',', 0usize);
    for &candidate in &DELIMITERS {
        let count = first_line.bytes().filter(|&b| b == candidate).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

fn parse_delimited(text: &str, delimiter: u8) -> Result<Dataset, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ParseError::Csv(e.to_string()))?;
        let row = record.iter().map(text_cell).collect();
        push_row(&mut rows, row);
    }

    Ok(Dataset::from_rows(rows))
}

fn text_cell(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Spreadsheets
// ---------------------------------------------------------------------------

fn parse_workbook(bytes: &[u8]) -> Result<Dataset, ParseError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| ParseError::Spreadsheet(e.to_string()))?,
        None => {
            log::debug!("workbook has no sheets");
            return Ok(Dataset::default());
        }
    };

    let mut rows = Vec::with_capacity(range.height());
    for raw in range.rows() {
        push_row(&mut rows, raw.iter().map(spreadsheet_cell).collect());
    }

    Ok(Dataset::from_rows(rows))
}

fn spreadsheet_cell(value: &Data) -> CellValue {
    match value {
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => text_cell(s),
        Data::Bool(b) => CellValue::Bool(*b),
        // Serial day number, as spreadsheet readers report dates by default.
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

// -- shared helpers --

/// Drop trailing empty cells and skip rows that end up with nothing in them.
fn push_row(rows: &mut Vec<Vec<CellValue>>, mut row: Vec<CellValue>) {
    while row.last().is_some_and(CellValue::is_empty) {
        row.pop();
    }
    if !row.is_empty() {
        rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn texts(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| text(c)).collect()
    }

    #[test]
    fn csv_header_and_rows() {
        let ds = parse(b"t,v\n1,5\n2,7\n", Some("series.csv")).unwrap();
        assert_eq!(ds.header, vec!["t", "v"]);
        assert_eq!(ds.rows, vec![texts(&["1", "5"]), texts(&["2", "7"])]);
    }

    #[test]
    fn ragged_rows_never_exceed_the_header_and_do_not_fail() {
        let ds = parse(b"a,b,c\n1\n1,2\n1,2,3\n,,\n4,,\n", None).unwrap();
        assert_eq!(ds.header.len(), 3);
        assert_eq!(ds.rows.len(), 4);
        assert_eq!(ds.rows[0], texts(&["1"]));
        assert_eq!(ds.rows[3], texts(&["4"]));
        assert!(ds.rows.iter().all(|r| r.len() <= ds.header.len()));
    }

    #[test]
    fn csv_rows_wider_than_the_header_are_cut() {
        let ds = parse(b"a,b\n1,2,3\n,,9\n", None).unwrap();
        assert_eq!(ds.header, vec!["a", "b"]);
        assert_eq!(ds.rows, vec![texts(&["1", "2"])]);
    }

    #[test]
    fn trailing_blank_header_cells_are_dropped() {
        let ds = parse(b"a,b,\n1,2,3\n", None).unwrap();
        assert_eq!(ds.header, vec!["a", "b"]);
        assert_eq!(ds.rows, vec![texts(&["1", "2"])]);
    }

    #[test]
    fn xlsx_cells_past_the_header_are_cut() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "t").unwrap();
        sheet.write_string(0, 1, "v").unwrap();
        sheet.write_number(1, 0, 1.0).unwrap();
        sheet.write_number(1, 1, 2.0).unwrap();
        sheet.write_string(1, 3, "note").unwrap();
        sheet.write_string(2, 2, "stray").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let ds = parse(&bytes, None).unwrap();
        assert_eq!(ds.header, vec!["t", "v"]);
        assert_eq!(ds.rows, vec![vec![CellValue::Float(1.0), CellValue::Float(2.0)]]);
        assert!(ds.rows.iter().all(|r| r.len() <= ds.header.len()));
    }

    #[test]
    fn first_row_is_header_even_when_numeric() {
        let ds = parse(b"1,2\n3,4\n", None).unwrap();
        assert_eq!(ds.header, vec!["1", "2"]);
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn empty_input_is_an_empty_dataset() {
        assert_eq!(parse(b"", Some("empty.csv")).unwrap(), Dataset::default());
        assert_eq!(parse(b"\n\n", None).unwrap(), Dataset::default());
        assert_eq!(parse(UTF8_BOM, None).unwrap(), Dataset::default());
    }

    #[test]
    fn header_only_file() {
        let ds = parse(b"x,y\n", None).unwrap();
        assert_eq!(ds.header, vec!["x", "y"]);
        assert!(ds.is_empty());
    }

    #[test]
    fn semicolon_delimiter_is_sniffed() {
        let ds = parse(b"date;cases;deaths\n2024-01-01;3;0\n", None).unwrap();
        assert_eq!(ds.header, vec!["date", "cases", "deaths"]);
        assert_eq!(ds.rows[0], texts(&["2024-01-01", "3", "0"]));
    }

    #[test]
    fn tsv_hint_selects_tab() {
        let ds = parse(b"a,b\tc\n1,2\t3\n", Some("data.TSV")).unwrap();
        assert_eq!(ds.header, vec!["a,b", "c"]);
        assert_eq!(ds.rows[0], texts(&["1,2", "3"]));
    }

    #[test]
    fn quoted_fields_keep_delimiters() {
        let ds = parse(b"name,value\n\"Smith, J\",4\n", None).unwrap();
        assert_eq!(ds.rows[0], texts(&["Smith, J", "4"]));
    }

    #[test]
    fn bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"id,n\n1,2\n");
        let ds = parse(&bytes, None).unwrap();
        assert_eq!(ds.header, vec!["id", "n"]);
    }

    #[test]
    fn duplicate_header_names_are_tolerated() {
        let ds = parse(b"v,v\n1,2\n", None).unwrap();
        assert_eq!(ds.header, vec!["v", "v"]);
    }

    #[test]
    fn extension_does_not_override_content() {
        let ds = parse(b"t,v\n1,5\n", Some("mislabelled.xlsx")).unwrap();
        assert_eq!(ds.header, vec!["t", "v"]);
    }

    #[test]
    fn binary_garbage_is_unsupported() {
        let err = parse(&[0xFF, 0xFE, 0x00, 0x9C, 0x80], Some("data.csv")).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat(_)));

        let err = parse(b"a\0b", None).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat(_)));
    }

    #[test]
    fn corrupt_zip_is_a_spreadsheet_error() {
        let err = parse(b"PK\x03\x04 definitely not a workbook", Some("a.xlsx")).unwrap_err();
        assert!(matches!(err, ParseError::Spreadsheet(_)));
    }

    #[test]
    fn xlsx_first_sheet_only() {
        let mut workbook = Workbook::new();
        {
            let sheet = workbook.add_worksheet();
            sheet.write_string(0, 0, "t").unwrap();
            sheet.write_string(0, 1, "v").unwrap();
            sheet.write_number(1, 0, 1.0).unwrap();
            sheet.write_number(1, 1, 5.5).unwrap();
            sheet.write_number(2, 0, 2.0).unwrap();
            sheet.write_boolean(3, 0, true).unwrap();
            sheet.write_string(3, 1, "late").unwrap();
        }
        {
            let other = workbook.add_worksheet();
            other.write_string(0, 0, "ignored").unwrap();
        }
        let bytes = workbook.save_to_buffer().unwrap();

        let ds = parse(&bytes, Some("upload.bin")).unwrap();
        assert_eq!(ds.header, vec!["t", "v"]);
        assert_eq!(
            ds.rows,
            vec![
                vec![CellValue::Float(1.0), CellValue::Float(5.5)],
                vec![CellValue::Float(2.0)],
                vec![CellValue::Bool(true), text("late")],
            ]
        );
    }

    #[test]
    fn xlsx_numeric_header_renders_as_text() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_number(0, 0, 2024.0).unwrap();
        sheet.write_string(0, 1, "cases").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let ds = parse(&bytes, None).unwrap();
        assert_eq!(ds.header, vec!["2024", "cases"]);
    }

    #[test]
    fn blank_workbook_is_an_empty_dataset() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        let bytes = workbook.save_to_buffer().unwrap();

        let ds = parse(&bytes, Some("blank.xlsx")).unwrap();
        assert!(!ds.has_columns());
        assert!(ds.is_empty());
    }

    #[test]
    fn read_source_keeps_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.csv");
        std::fs::write(&path, b"a,b\n1,2\n").unwrap();

        let source = read_source(&path).unwrap();
        assert_eq!(source.name, "cases.csv");
        assert_eq!(&source.bytes[..], b"a,b\n1,2\n");
        assert!(read_source(&dir.path().join("missing.csv")).is_err());
    }
}
