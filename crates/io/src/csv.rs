// CSV import/export for roster and attendance tables

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::debug;

use crate::error::IoError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A header row plus raw string records, exactly as read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    /// Every record is at least `headers.len()` long.
    pub records: Vec<Vec<String>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.records
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read a CSV (or TSV/semicolon/pipe separated) file with a header row.
pub fn load(path: &Path) -> Result<Table, IoError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    debug!("{}: delimiter {:?}", path.display(), delimiter as char);
    parse_table(&content, delimiter)
}

/// Separators tried, least likely first; ties go to the later entry.
const DELIMITERS: [u8; 4] = [b'|', b'\t', b';', b','];

/// Cells of one line split with `delimiter`, honoring quotes.
fn split_line(line: &str, delimiter: u8) -> Vec<String> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map(|r| r.iter().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Pick the field separator of a roster or meeting export.
///
/// Both tables carry an email column, so a separator whose header split
/// yields a cell mentioning `email` is taken first (widest header wins).
/// Without one, the separator whose data rows most often match the header
/// width is used. Comma when nothing splits.
pub fn sniff_delimiter(content: &str) -> u8 {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let Some(header) = lines.next() else {
        return b',';
    };
    let rows: Vec<&str> = lines.take(9).collect();

    let with_email = DELIMITERS
        .iter()
        .map(|&d| (d, split_line(header, d)))
        .filter(|(_, cells)| {
            cells.len() > 1 && cells.iter().any(|c| c.to_lowercase().contains("email"))
        })
        .max_by_key(|(_, cells)| cells.len());
    if let Some((d, _)) = with_email {
        return d;
    }

    DELIMITERS
        .iter()
        .filter_map(|&d| {
            let width = split_line(header, d).len();
            if width < 2 {
                return None;
            }
            let agreeing = rows.iter().filter(|r| split_line(r, d).len() == width).count();
            Some((d, (agreeing + 1) * width))
        })
        .max_by_key(|&(_, score)| score)
        .map(|(d, _)| d)
        .unwrap_or(b',')
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
/// A leading byte-order mark is dropped.
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let read_err = |e: std::io::Error| IoError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    let mut file = File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            debug!("{}: not UTF-8, decoding as Windows-1252", path.display());
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Parse delimited text whose first row holds the headers.
/// Headers are trimmed; short records are padded with empty cells.
pub fn parse_table(content: &str, delimiter: u8) -> Result<Table, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(String::is_empty) {
        return Err(IoError::Csv("no header row".into()));
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.len() < headers.len() {
            row.resize(headers.len(), String::new());
        }
        records.push(row);
    }

    Ok(Table { headers, records })
}

/// Write a table as comma-separated UTF-8 with a BOM, so spreadsheet apps
/// pick the right encoding.
pub fn write_table(table: &Table, path: &Path) -> Result<(), IoError> {
    let write_err = |message: String| IoError::Write {
        path: path.display().to_string(),
        message,
    };

    let mut file = File::create(path).map_err(|e| write_err(e.to_string()))?;
    file.write_all(UTF8_BOM).map_err(|e| write_err(e.to_string()))?;

    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
    writer.write_record(&table.headers).map_err(|e| write_err(e.to_string()))?;
    for record in &table.records {
        writer.write_record(record).map_err(|e| write_err(e.to_string()))?;
    }
    writer.flush().map_err(|e| write_err(e.to_string()))?;
    Ok(())
}
