//! Tabular input reader with encoding and delimiter auto-detection.
//!
//! Produces a [`RawTable`] of string cells. No inventory-specific logic here:
//! headers are kept verbatim and cells are not trimmed or coerced.

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use crate::error::{InputError, InputResult};
use crate::models::{RawTable, SourceFormat, SourceInfo};

#[cfg(test)]
pub(crate) mod fixtures;

/// File extensions read as workbooks rather than delimited text.
const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Candidate delimiters, in tie-break order.
const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Below this chardet confidence, non-UTF-8 input is read as Windows-1252.
const MIN_DETECTION_CONFIDENCE: f32 = 0.9;

/// Detect the encoding of raw bytes using chardet.
///
/// Returns a normalized charset label and chardet's confidence.
pub fn detect_encoding(bytes: &[u8]) -> (String, f32) {
    let (charset, confidence, _language) = chardet::detect(bytes);

    let label = match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    };
    (label, confidence)
}

/// Decode bytes to text. Returns the content and the encoding used.
///
/// Valid UTF-8 (with or without BOM) is taken as-is. Anything else is
/// decoded with the codec chardet is confident about, or Windows-1252,
/// which maps every byte and covers Latin-1 spreadsheet exports.
pub fn decode_content(bytes: &[u8]) -> InputResult<(String, String)> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok((text.to_string(), "utf-8".to_string()));
    }

    let (detected, confidence) = detect_encoding(bytes);
    let codec = encoding_rs::Encoding::for_label(detected.as_bytes())
        .filter(|enc| *enc != encoding_rs::UTF_8 && confidence >= MIN_DETECTION_CONFIDENCE)
        .unwrap_or(encoding_rs::WINDOWS_1252);

    let (text, used, had_errors) = codec.decode(bytes);
    if had_errors {
        return Err(InputError::Encoding(format!(
            "content is not valid {}",
            used.name()
        )));
    }
    Ok((text.into_owned(), used.name().to_lowercase()))
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Falls back to `,` when no candidate occurs (single-column files).
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text with an explicit delimiter.
///
/// Blank lines are skipped; ragged rows are padded or truncated to the
/// header width.
pub fn parse_delimited(content: &str, delimiter: char, encoding: String) -> InputResult<RawTable> {
    if content.trim().is_empty() {
        return Err(InputError::EmptyFile);
    }

    let delimiter_byte = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(InputError::InvalidDelimiter(delimiter))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(InputError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(
        headers,
        rows,
        SourceInfo {
            format: SourceFormat::Delimited,
            encoding,
            delimiter: Some(delimiter),
        },
    ))
}

/// Parse delimited bytes, detecting the encoding and (unless given) the delimiter.
pub fn parse_bytes_auto(bytes: &[u8], delimiter: Option<char>) -> InputResult<RawTable> {
    if bytes.is_empty() {
        return Err(InputError::EmptyFile);
    }
    let (content, encoding) = decode_content(bytes)?;
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    parse_delimited(&content, delimiter, encoding)
}

/// Read the first worksheet of a workbook. The first row holds the headers.
pub fn read_spreadsheet(path: &Path) -> InputResult<RawTable> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| InputError::Spreadsheet("workbook has no sheets".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let headers: Vec<String> = rows.next().ok_or(InputError::EmptyFile)?.iter().map(cell_text).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(InputError::NoHeaders);
    }

    let rows = rows.map(|row| row.iter().map(cell_text).collect()).collect();

    Ok(RawTable::new(
        headers,
        rows,
        SourceInfo {
            format: SourceFormat::Spreadsheet,
            encoding: sheet_name,
            delimiter: None,
        },
    ))
}

/// Render a workbook cell as text.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether a path is read as a workbook.
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Read a tabular file fully into memory.
///
/// Fails with [`InputError::NotFound`] before opening anything when the
/// path does not exist.
pub fn read_table(path: &Path, delimiter: Option<char>) -> InputResult<RawTable> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }

    if is_spreadsheet(path) {
        read_spreadsheet(path)
    } else {
        let bytes = std::fs::read(path)?;
        parse_bytes_auto(&bytes, delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_simple_csv() {
        let table = parse_bytes_auto(b"Codigo;Articulo\n1;Widget\n2;Gadget", None).unwrap();

        assert_eq!(table.headers, vec!["Codigo", "Articulo"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["2", "Gadget"]);
        assert_eq!(table.source.delimiter, Some(';'));
    }

    #[test]
    fn test_quoted_values_keep_delimiters() {
        let csv = "name,value\n\"Alice, Jr.\",\"Hello World\"";
        let table = parse_delimited(csv, ',', "utf-8".into()).unwrap();

        assert_eq!(table.rows[0], vec!["Alice, Jr.", "Hello World"]);
    }

    #[test]
    fn test_headers_kept_verbatim() {
        let table = parse_delimited(" Color ,Cantidad\nred,1", ',', "utf-8".into()).unwrap();
        assert_eq!(table.headers, vec![" Color ", "Cantidad"]);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let table = parse_delimited("a,b\n1,2\n\n3,4\n", ',', "utf-8".into()).unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_ragged_rows_normalized() {
        let table = parse_delimited("a,b,c\n1,,3\n1\n1,2,3,4", ',', "utf-8".into()).unwrap();

        assert_eq!(table.rows[0], vec!["1", "", "3"]);
        assert_eq!(table.rows[1], vec!["1", "", ""]);
        assert_eq!(table.rows[2], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_headers_only_yields_zero_rows() {
        let table = parse_bytes_auto(b"Codigo,Articulo,Cantidad\n", None).unwrap();
        assert_eq!(table.headers.len(), 3);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_empty_input_error() {
        assert!(matches!(parse_bytes_auto(b"", None), Err(InputError::EmptyFile)));
        assert!(matches!(
            parse_delimited("  \n", ',', "utf-8".into()),
            Err(InputError::EmptyFile)
        ));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let result = parse_delimited("a§b\n1§2", '§', "utf-8".into());
        assert!(matches!(result, Err(InputError::InvalidDelimiter('§'))));
    }

    #[test]
    fn test_detect_delimiter_variants() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single\n1"), ',');
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let table = parse_bytes_auto(b"\xEF\xBB\xBFC\xC3\xB3digo,Articulo\n1,x", None).unwrap();
        assert_eq!(table.headers[0], "Código");
        assert_eq!(table.source.encoding, "utf-8");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Código;Articulo\n1;Té" in ISO-8859-1
        let bytes: &[u8] = b"C\xF3digo;Articulo\n1;T\xE9";
        let table = parse_bytes_auto(bytes, None).unwrap();

        assert_eq!(table.headers[0], "Código");
        assert_eq!(table.rows[0][1], "Té");
        assert_ne!(table.source.encoding, "utf-8");
    }

    #[test]
    fn test_cell_text_rendering() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("Widget".into())), "Widget");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
    }

    #[test]
    fn test_is_spreadsheet() {
        assert!(is_spreadsheet(Path::new("stock.xlsx")));
        assert!(is_spreadsheet(Path::new("STOCK.XLS")));
        assert!(is_spreadsheet(Path::new("stock.ods")));
        assert!(!is_spreadsheet(Path::new("stock.csv")));
        assert!(!is_spreadsheet(Path::new("stock")));
    }

    #[test]
    fn test_read_table_missing_file() {
        let result = read_table(Path::new("/definitely/not/here.csv"), None);
        assert!(matches!(result, Err(InputError::NotFound(_))));
    }

    #[test]
    fn test_read_workbook_first_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.xlsx");
        fixtures::write_workbook(
            &path,
            &[
                (
                    "Inventario",
                    &[
                        &["Código", "Articulo", "Cantidad"],
                        &["123", "Widget", "5"],
                        &["A-7", "Gadget", "2.5"],
                    ],
                ),
                ("Notas", &[&["Otra"], &["x"]]),
            ],
        );

        let table = read_table(&path, None).unwrap();

        assert_eq!(table.headers, vec!["Código", "Articulo", "Cantidad"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0], vec!["123", "Widget", "5"]);
        assert_eq!(table.rows[1], vec!["A-7", "Gadget", "2.5"]);
        assert_eq!(table.source.format, SourceFormat::Spreadsheet);
        assert_eq!(table.source.encoding, "Inventario");
        assert_eq!(table.source.delimiter, None);
    }

    #[test]
    fn test_read_workbook_headers_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        fixtures::write_workbook(&path, &[("Hoja1", &[&["Código", "Articulo"]])]);

        let table = read_table(&path, None).unwrap();

        assert_eq!(table.headers, vec!["Código", "Articulo"]);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_read_workbook_rejects_garbage() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        write!(file, "not a zip archive").unwrap();

        let result = read_table(file.path(), None);
        assert!(matches!(result, Err(InputError::Spreadsheet(_))));
    }

    #[test]
    fn test_read_table_from_disk_with_explicit_delimiter() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "a|b\n1|2\n").unwrap();

        let table = read_table(file.path(), Some('|')).unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows[0], vec!["1", "2"]);
    }
}
