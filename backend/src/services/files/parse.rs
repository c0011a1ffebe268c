//! Turns uploaded spreadsheet bytes into a `ParsedTable`.
//!
//! Row 1 of the first sheet (or of the CSV) names the columns; every later
//! row becomes a record keyed by those names. Empty cells are left out of the
//! record instead of being stored as nulls, and rows with no cells at all are
//! dropped. Nothing here touches persistent storage.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use common::model::table::{CellValue, ParsedTable, Row};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

const EMPTY_HEADER: &str = "__EMPTY";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("file is empty")]
    Empty,

    #[error("unsupported file type '{0}'")]
    UnsupportedFormat(String),

    #[error("workbook has no sheets")]
    NoSheets,

    #[error("unreadable workbook: {0}")]
    Workbook(String),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Xlsx,
    Xls,
    Csv,
}

impl FileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
            FileFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FileFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            FileFormat::Xls => "application/vnd.ms-excel",
            FileFormat::Csv => "text/csv",
        }
    }

    /// Resolves the format from an extension (`"xlsx"`, `".csv"`) or a MIME
    /// type.
    pub fn from_hint(hint: &str) -> Result<Self, ParseError> {
        let normalized = hint.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "xlsx" | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Ok(FileFormat::Xlsx)
            }
            "xls" | "application/vnd.ms-excel" => Ok(FileFormat::Xls),
            "csv" | "text/csv" | "application/csv" => Ok(FileFormat::Csv),
            _ => Err(ParseError::UnsupportedFormat(hint.to_string())),
        }
    }

    /// Prefers the file name's extension and falls back to the declared
    /// content type.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Result<Self, ParseError> {
        let by_extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(FileFormat::from_hint);
        match (by_extension, content_type) {
            (Some(Ok(format)), _) => Ok(format),
            (_, Some(mime)) => FileFormat::from_hint(mime),
            (Some(Err(err)), None) => Err(err),
            (None, None) => Err(ParseError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

/// Parses `bytes` as `format` into headers and row records.
pub fn parse(bytes: &[u8], format: FileFormat) -> Result<ParsedTable, ParseError> {
    if bytes.is_empty() {
        return Err(ParseError::Empty);
    }
    let grid = match format {
        FileFormat::Csv => read_csv(bytes)?,
        FileFormat::Xlsx | FileFormat::Xls => read_first_sheet(bytes)?,
    };
    Ok(table_from_grid(grid))
}

fn read_csv(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, ParseError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(csv_cell).collect());
    }
    Ok(grid)
}

fn csv_cell(raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Empty;
    }
    match looks_numeric(raw).then(|| raw.trim().parse::<f64>()) {
        Some(Ok(number)) if number.is_finite() => CellValue::Number(number),
        _ => CellValue::Text(raw.to_string()),
    }
}

/// Rejects the spellings `f64::from_str` accepts but a spreadsheet would keep
/// as text, such as `inf` or `NaN`.
fn looks_numeric(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && trimmed.chars().any(|c| c.is_ascii_digit())
}

fn read_first_sheet(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(workbook_error)?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ParseError::NoSheets)?;
    let range = workbook.worksheet_range(&first).map_err(workbook_error)?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(sheet_cell).collect())
        .collect())
}

fn workbook_error(err: calamine::Error) -> ParseError {
    ParseError::Workbook(err.to_string())
}

fn sheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            CellValue::Text(s.clone())
        }
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

/// Column names for a sheet `width` cells wide: blanks become `__EMPTY` and
/// repeats get `_1`, `_2`, ... suffixes.
fn header_names(header_row: &[CellValue], width: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    (0..width)
        .map(|idx| {
            let base = match header_row.get(idx) {
                Some(CellValue::Text(text)) if !text.is_empty() => text.clone(),
                Some(CellValue::Number(n)) => format_number(*n),
                _ => EMPTY_HEADER.to_string(),
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while seen.contains(&name) {
                name = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

fn table_from_grid(grid: Vec<Vec<CellValue>>) -> ParsedTable {
    let mut lines = grid.into_iter();
    let Some(header_row) = lines.next() else {
        return ParsedTable::default();
    };
    let body: Vec<Vec<CellValue>> = lines.collect();
    let width = body
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header_row.len()))
        .max()
        .unwrap_or(0);
    let names = header_names(&header_row, width);

    let rows: Vec<Row> = body
        .into_iter()
        .map(|cells| {
            names
                .iter()
                .zip(cells)
                .filter(|(_, cell)| !cell.is_blank())
                .map(|(name, cell)| (name.clone(), cell))
                .collect::<Row>()
        })
        .filter(|row| !row.is_empty())
        .collect();

    let headers = match rows.first() {
        Some(first) => names
            .into_iter()
            .filter(|name| first.contains_key(name))
            .collect(),
        None => Vec::new(),
    };

    ParsedTable { headers, rows }
}

/// Renders a number the way a spreadsheet user sees it in a label: `15`
/// rather than `15.0`, and exponent form (`1e+21`, `1.5e-7`) outside
/// `1e-6 <= |n| < 1e21`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    let exponent = format!("{:e}", n);
    match exponent.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exponent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn csv_rows_are_keyed_by_header() {
        let table = parse(b"month,sales\nJan,10\nFeb,20.5\n", FileFormat::Csv).unwrap();
        assert_eq!(table.headers, vec!["month", "sales"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.rows[0]["month"], text("Jan"));
        assert_eq!(table.rows[0]["sales"], CellValue::Number(10.0));
        assert_eq!(table.rows[1]["sales"], CellValue::Number(20.5));
    }

    #[rstest]
    #[case::header_only("a,b,c\n", 0)]
    #[case::one_row("a,b,c\n1,2,3\n", 1)]
    #[case::many_rows("a,b\n1,2\n3,4\n5,6\n7,8\n", 4)]
    #[case::no_trailing_newline("a,b\n1,2\n3,4", 2)]
    fn row_count_matches_data_rows(#[case] input: &str, #[case] expected: usize) {
        let table = parse(input.as_bytes(), FileFormat::Csv).unwrap();
        assert_eq!(table.rows.len(), expected);
        assert_eq!(table.column_count(), table.headers.len());
    }

    #[test]
    fn header_only_sheet_has_no_headers() {
        let table = parse(b"a,b,c\n", FileFormat::Csv).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn short_rows_lack_trailing_keys() {
        let table = parse(b"name,age,city\nAda,36,London\nBob\n", FileFormat::Csv).unwrap();
        assert_eq!(table.rows.len(), 2);

        let sparse = &table.rows[1];
        assert_eq!(sparse.len(), 1);
        assert!(sparse.contains_key("name"));
        assert!(!sparse.contains_key("age"));
        assert!(sparse.keys().all(|k| table.headers.contains(k)));
    }

    #[test]
    fn empty_cells_are_absent_and_blank_rows_skipped() {
        let table = parse(b"a,b,c\n1,,3\n,,\n4,5,6\n", FileFormat::Csv).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert!(!table.rows[0].contains_key("b"));
        // headers follow the first data row
        assert_eq!(table.headers, vec!["a", "c"]);
    }

    #[test]
    fn blank_and_duplicate_headers_get_generated_names() {
        let table = parse(b"x,,x,\n1,2,3,4,5\n", FileFormat::Csv).unwrap();
        assert_eq!(
            table.headers,
            vec!["x", "__EMPTY", "x_1", "__EMPTY_1", "__EMPTY_2"]
        );
    }

    #[test]
    fn numeric_looking_text_stays_text() {
        let table = parse(b"v\ninf\nNaN\n1e3\n-2\n12abc\n", FileFormat::Csv).unwrap();
        let values: Vec<_> = table.rows.iter().map(|r| r["v"].clone()).collect();
        assert_eq!(
            values,
            vec![
                text("inf"),
                text("NaN"),
                CellValue::Number(1000.0),
                CellValue::Number(-2.0),
                text("12abc"),
            ]
        );
    }

    #[test]
    fn byte_order_mark_is_not_part_of_the_first_header() {
        let table = parse(b"\xEF\xBB\xBFmonth,sales\nJan,1\n", FileFormat::Csv).unwrap();
        assert_eq!(table.headers[0], "month");
    }

    #[test]
    fn xlsx_first_sheet_is_read() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "region").unwrap();
        sheet.write_string(0, 1, "units").unwrap();
        sheet.write_string(1, 0, "North").unwrap();
        sheet.write_number(1, 1, 12).unwrap();
        sheet.write_string(2, 0, "South").unwrap();
        sheet.write_boolean(3, 1, true).unwrap();
        let second = workbook.add_worksheet();
        second.write_string(0, 0, "ignored").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = parse(&bytes, FileFormat::Xlsx).unwrap();
        assert_eq!(table.headers, vec!["region", "units"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[0]["units"], CellValue::Number(12.0));
        assert!(!table.rows[1].contains_key("units"));
        assert_eq!(table.rows[2]["units"], text("true"));
    }

    #[test]
    fn xlsx_dates_become_serial_numbers() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let date_format = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
        let day = rust_xlsxwriter::ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "day").unwrap();
        sheet.write_string(0, 1, "units").unwrap();
        sheet.write_datetime_with_format(1, 0, &day, &date_format).unwrap();
        sheet.write_number(1, 1, 4).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = parse(&bytes, FileFormat::Xlsx).unwrap();
        assert_eq!(table.rows[0]["day"], CellValue::Number(45306.0));
        assert_eq!(table.rows[0]["units"], CellValue::Number(4.0));
    }

    #[rstest]
    #[case::csv(FileFormat::Csv)]
    #[case::xlsx(FileFormat::Xlsx)]
    #[case::xls(FileFormat::Xls)]
    fn zero_bytes_is_an_error(#[case] format: FileFormat) {
        assert!(matches!(parse(b"", format), Err(ParseError::Empty)));
    }

    #[rstest]
    #[case::xlsx(FileFormat::Xlsx)]
    #[case::xls(FileFormat::Xls)]
    fn garbage_is_not_a_workbook(#[case] format: FileFormat) {
        let result = parse(b"this is definitely not a spreadsheet", format);
        assert!(matches!(result, Err(ParseError::Workbook(_))));
    }

    #[test]
    fn invalid_utf8_is_not_csv() {
        let result = parse(b"name\n\xff\xfe\xfd\n", FileFormat::Csv);
        assert!(matches!(result, Err(ParseError::Csv(_))));
    }

    #[rstest]
    #[case("report.xlsx", None, Ok(FileFormat::Xlsx))]
    #[case("REPORT.XLS", None, Ok(FileFormat::Xls))]
    #[case("data", Some("text/csv"), Ok(FileFormat::Csv))]
    #[case("data.bin", Some("application/vnd.ms-excel"), Ok(FileFormat::Xls))]
    #[case("notes.txt", None, Err(()))]
    #[case("noext", None, Err(()))]
    fn format_detection(
        #[case] name: &str,
        #[case] mime: Option<&str>,
        #[case] expected: Result<FileFormat, ()>,
    ) {
        assert_eq!(FileFormat::detect(name, mime).map_err(|_| ()), expected);
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(format_number(15.0), "15");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1e20), "100000000000000000000");
    }

    #[rstest]
    #[case(1e21, "1e+21")]
    #[case(-1.5e22, "-1.5e+22")]
    #[case(1e-7, "1e-7")]
    #[case(2.5e-9, "2.5e-9")]
    #[case(0.000001, "0.000001")]
    fn extreme_magnitudes_use_exponent_form(#[case] n: f64, #[case] expected: &str) {
        assert_eq!(format_number(n), expected);
    }
}
