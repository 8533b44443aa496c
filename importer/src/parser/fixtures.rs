//! Minimal xlsx writer for tests.
//!
//! Cells that parse as numbers are written as numeric cells, everything
//! else goes through the shared string table. Empty cells are omitted.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Write a workbook with the given `(sheet name, rows)` in order.
pub fn write_workbook(path: &Path, sheets: &[(&str, &[&[&str]])]) {
    let mut strings: Vec<String> = Vec::new();
    let worksheets: Vec<String> = sheets
        .iter()
        .map(|(_, rows)| worksheet_xml(rows, &mut strings))
        .collect();

    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut put = |name: &str, body: &str| {
        zip.start_file(name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    };

    put("[Content_Types].xml", &content_types_xml(sheets.len()));
    put(
        "_rels/.rels",
        &format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
        ),
    );
    put("xl/workbook.xml", &workbook_xml(sheets));
    put("xl/_rels/workbook.xml.rels", &workbook_rels_xml(sheets.len()));
    put("xl/sharedStrings.xml", &shared_strings_xml(&strings));
    for (i, body) in worksheets.iter().enumerate() {
        put(&format!("xl/worksheets/sheet{}.xml", i + 1), body);
    }

    zip.finish().unwrap();
}

fn worksheet_xml(rows: &[&[&str]], strings: &mut Vec<String>) -> String {
    let mut body = String::new();
    for (r, row) in rows.iter().enumerate() {
        body.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let reference = format!("{}{}", column_name(c), r + 1);
            if cell.parse::<f64>().is_ok() {
                body.push_str(&format!(r#"<c r="{reference}"><v>{cell}</v></c>"#));
            } else {
                let idx = match strings.iter().position(|s| s == cell) {
                    Some(idx) => idx,
                    None => {
                        strings.push(cell.to_string());
                        strings.len() - 1
                    }
                };
                body.push_str(&format!(r#"<c r="{reference}" t="s"><v>{idx}</v></c>"#));
            }
        }
        body.push_str("</row>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{MAIN_NS}"><sheetData>{body}</sheetData></worksheet>"#
    )
}

fn workbook_xml(sheets: &[(&str, &[&[&str]])]) -> String {
    let entries: String = sheets
        .iter()
        .enumerate()
        .map(|(i, (name, _))| {
            format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(name),
                i + 1,
                i + 1
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheets>{entries}</sheets></workbook>"#
    )
}

fn workbook_rels_xml(count: usize) -> String {
    let mut entries: String = (1..=count)
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{i}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{i}.xml"/>"#
            )
        })
        .collect();
    entries.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="{REL_NS}/sharedStrings" Target="sharedStrings.xml"/>"#,
        count + 1
    ));
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PKG_REL_NS}">{entries}</Relationships>"#
    )
}

fn shared_strings_xml(strings: &[String]) -> String {
    let items: String = strings
        .iter()
        .map(|s| format!("<si><t>{}</t></si>", escape(s)))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="{MAIN_NS}" count="{n}" uniqueCount="{n}">{items}</sst>"#,
        n = strings.len()
    )
}

fn content_types_xml(count: usize) -> String {
    let sheets: String = (1..=count)
        .map(|i| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            )
        })
        .collect();
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
            r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
            "{}</Types>"
        ),
        sheets
    )
}

fn column_name(idx: usize) -> String {
    let mut n = idx + 1;
    let mut name = String::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        name.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    name
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
