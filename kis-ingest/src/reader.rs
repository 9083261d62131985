//! Tabular file reading: delimited text via the csv crate, spreadsheets via
//! calamine. Spreadsheet exports from Israeli banks often prepend metadata
//! rows, so the header row is discovered by keyword scoring rather than
//! assumed to be first.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use kis_core::transaction::RawRow;

use crate::error::IngestError;

/// Declared kind of an incoming file. The declaration comes from the file
/// picker; [`FileKind::from_file_name`] gives the usual extension-based
/// guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Delimited,
    Spreadsheet,
}

impl FileKind {
    pub fn from_file_name(name: &str) -> FileKind {
        let lower = name.to_lowercase();
        if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            FileKind::Spreadsheet
        } else {
            FileKind::Delimited
        }
    }
}

/// A rectangular table of string cells plus its header names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Bilingual keywords used to recognize a header row inside a spreadsheet.
const HEADER_KEYWORDS: &[&str] = &[
    "amount", "sum", "total", "charge", "date", "description", "merchant", "name", "details",
    "transaction date",
    "סכום", "חיוב", "סה\"כ", "תאריך", "תאריך עסקה", "תיאור", "שם בית העסק", "שם בית עסק",
    "שם העסק", "פירוט",
];

/// Read raw bytes into a table according to the declared kind.
pub fn read_table(bytes: &[u8], kind: FileKind) -> Result<ParsedTable, IngestError> {
    match kind {
        FileKind::Delimited => read_delimited(bytes),
        FileKind::Spreadsheet => read_spreadsheet(bytes),
    }
}

/// Spreadsheet container magic: xlsx is a zip (`PK..`), legacy xls is OLE2.
fn is_spreadsheet_magic(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK\x03\x04")
        || bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
}

fn read_delimited(bytes: &[u8]) -> Result<ParsedTable, IngestError> {
    if is_spreadsheet_magic(bytes) {
        return Err(IngestError::MalformedFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(bytes);

    let headers = dedupe_headers(
        &reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>(),
    );

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut row = RawRow::new();
        for (index, header) in headers.iter().enumerate() {
            row.insert(
                header.clone(),
                record.get(index).unwrap_or("").trim().to_string(),
            );
        }
        rows.push(row);
    }

    Ok(ParsedTable { headers, rows })
}

fn read_spreadsheet(bytes: &[u8]) -> Result<ParsedTable, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| IngestError::Spreadsheet(e.to_string()))?;

    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(IngestError::NoSheets)?;
    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| IngestError::Spreadsheet(e.to_string()))?;

    let grid: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    build_table_from_grid(grid)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        // Render date cells day-first so they take the same parsing path as
        // CSV date strings.
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
    }
}

/// Score the first 20 rows by header-keyword hits; highest score wins,
/// earliest row on ties.
fn find_header_row(grid: &[Vec<String>]) -> usize {
    let mut best_index = 0;
    let mut best_score = 0;

    for (index, row) in grid.iter().take(20).enumerate() {
        if row.len() < 2 {
            continue;
        }
        let score = row
            .iter()
            .filter(|cell| {
                let lower = cell.to_lowercase();
                HEADER_KEYWORDS.iter().any(|kw| lower.contains(kw))
            })
            .count();
        if score > best_score {
            best_score = score;
            best_index = index;
        }
    }
    best_index
}

/// Blank header names become `Column_N`; repeats get `_2`, `_3`, ... so
/// every column keys its own cell.
fn dedupe_headers(raw: &[String]) -> Vec<String> {
    let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    raw.iter()
        .enumerate()
        .map(|(index, header)| {
            let name = if header.is_empty() {
                format!("Column_{}", index + 1)
            } else {
                header.clone()
            };
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                format!("{}_{}", name, count)
            } else {
                name
            }
        })
        .collect()
}

fn build_table_from_grid(grid: Vec<Vec<String>>) -> Result<ParsedTable, IngestError> {
    if grid.len() < 2 {
        return Err(IngestError::EmptySheet);
    }

    let header_index = find_header_row(&grid);
    let headers = dedupe_headers(&grid[header_index]);

    let mut rows = Vec::new();
    for raw_row in grid.iter().skip(header_index + 1) {
        if raw_row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut row = RawRow::new();
        for (index, header) in headers.iter().enumerate() {
            row.insert(
                header.clone(),
                raw_row.get(index).cloned().unwrap_or_default(),
            );
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(IngestError::EmptySheet);
    }

    Ok(ParsedTable { headers, rows })
}
