//! Delimited file reading into raw string tables and typed DataFrames.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::decode::decode_bytes;
use crate::error::{IngestError, Result};
use crate::options::CsvOptions;

/// Identity of the file a table was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Lowercase hex SHA-256 of the raw bytes.
    pub sha256: String,
}

/// Raw table: normalized headers and rows of optional cell strings.
///
/// Missing cells (empty, an NA marker, or absent at the end of a short row)
/// are `None`.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    pub source: SourceFile,
}

impl CsvTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Cells of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> Vec<Option<&str>> {
        self.rows
            .iter()
            .map(|row| row.get(index).and_then(|cell| cell.as_deref()))
            .collect()
    }
}

/// A typed table with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub data: DataFrame,
    pub source: SourceFile,
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Rename repeated headers `a, a, a` to `a, a.1, a.2`.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut taken: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        let mut candidate = header.clone();
        while taken.contains(&candidate) {
            let counter = seen.entry(header.clone()).or_insert(0);
            *counter += 1;
            candidate = format!("{header}.{counter}");
        }
        taken.push(candidate);
    }
    taken
}

/// Drop spaces at the start of every unquoted field: after a delimiter and
/// at the start of each line.
fn strip_initial_space(text: &str, delimiter: char, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_quotes = false;
    let mut field_start = true;
    for ch in text.chars() {
        if field_start && ch == ' ' {
            continue;
        }
        field_start = false;
        if ch == quote {
            in_quotes = !in_quotes;
        } else if !in_quotes && (ch == delimiter || ch == '\n' || ch == '\r') {
            field_start = true;
        }
        out.push(ch);
    }
    out
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Read a delimited file into a raw [`CsvTable`].
///
/// The first non-empty record is the header. Rows longer than the header are
/// rejected; shorter rows are padded with missing cells.
pub fn read_csv_table(path: &Path, options: &CsvOptions) -> Result<CsvTable> {
    let bytes = read_source(path)?;
    let source = SourceFile {
        path: path.to_path_buf(),
        size_bytes: bytes.len() as u64,
        sha256: hex::encode(Sha256::digest(&bytes)),
    };
    let text = decode_bytes(&bytes, options.encoding).map_err(|reason| IngestError::Decode {
        path: path.to_path_buf(),
        encoding: options.encoding.as_str(),
        reason,
    })?;
    let text = if options.skip_initial_space {
        strip_initial_space(&text, options.delimiter, options.quote)
    } else {
        text
    };
    parse_text(&text, options, source)
}

fn parse_text(text: &str, options: &CsvOptions, source: SourceFile) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter_byte()?)
        .quote(options.quote_byte()?)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let header_record = match records.next() {
        Some(record) => record.map_err(|source_error| IngestError::CsvParse {
            path: source.path.clone(),
            source: source_error,
        })?,
        None => {
            return Err(IngestError::EmptyCsv { path: source.path });
        }
    };
    let headers = dedupe_headers(header_record.iter().map(normalize_header).collect());
    if headers.is_empty() {
        return Err(IngestError::EmptyCsv { path: source.path });
    }

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|source_error| IngestError::CsvParse {
            path: source.path.clone(),
            source: source_error,
        })?;
        if record.len() > headers.len() {
            return Err(IngestError::RowLength {
                path: source.path.clone(),
                line: record.position().map_or(0, csv::Position::line),
                expected: headers.len(),
                found: record.len(),
            });
        }
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let cell = record
                .get(idx)
                .filter(|value| !options.is_na(value))
                .map(str::to_string);
            row.push(cell);
        }
        rows.push(row);
    }
    debug!(
        path = %source.path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "parsed delimited file"
    );
    Ok(CsvTable {
        headers,
        rows,
        source,
    })
}

/// Build a typed DataFrame, inferring one dtype per column.
///
/// A column whose present cells all parse as integers becomes `Int64`; else
/// all floats `Float64`; else all `true`/`false` `Boolean`; else `String`.
/// A column with no present cells becomes `Float64` of nulls.
pub fn build_frame(table: &CsvTable) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(table.column_count());
    for (idx, header) in table.headers.iter().enumerate() {
        let values = table.column_values(idx);
        columns.push(infer_column(header, &values));
    }
    Ok(DataFrame::new(columns)?)
}

fn infer_column(name: &str, values: &[Option<&str>]) -> Column {
    let present: Vec<&str> = values.iter().flatten().copied().collect();
    let name = name.into();
    if present.is_empty() {
        let nulls: Vec<Option<f64>> = vec![None; values.len()];
        return Series::new(name, nulls).into_column();
    }
    if present.iter().all(|value| value.trim().parse::<i64>().is_ok()) {
        let parsed: Vec<Option<i64>> = values
            .iter()
            .map(|value| value.and_then(|v| v.trim().parse::<i64>().ok()))
            .collect();
        return Series::new(name, parsed).into_column();
    }
    if present.iter().all(|value| value.trim().parse::<f64>().is_ok()) {
        let parsed: Vec<Option<f64>> = values
            .iter()
            .map(|value| value.and_then(|v| v.trim().parse::<f64>().ok()))
            .collect();
        return Series::new(name, parsed).into_column();
    }
    if present.iter().all(|value| parse_bool(value).is_some()) {
        let parsed: Vec<Option<bool>> = values
            .iter()
            .map(|value| value.and_then(parse_bool))
            .collect();
        return Series::new(name, parsed).into_column();
    }
    let text: Vec<Option<String>> = values
        .iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Series::new(name, text).into_column()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Read and type a delimited file in one step.
pub fn load_table(path: &Path, options: &CsvOptions) -> Result<LoadedTable> {
    let table = read_csv_table(path, options)?;
    let data = build_frame(&table)?;
    info!(
        path = %path.display(),
        encoding = %options.encoding,
        rows = data.height(),
        columns = data.width(),
        "loaded table"
    );
    Ok(LoadedTable {
        data,
        source: table.source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_spaces_after_delimiters_only_outside_quotes() {
        let text = "a; b;\"x;  y\"; \"q\"\n1;  2";
        assert_eq!(
            strip_initial_space(text, ';', '"'),
            "a;b;\"x;  y\";\"q\"\n1;2"
        );
    }

    #[test]
    fn strips_spaces_at_line_starts_outside_quotes() {
        let text = "  a; b\r\n c;d\n\"\n e\"; f";
        assert_eq!(
            strip_initial_space(text, ';', '"'),
            "a;b\r\nc;d\n\"\n e\";f"
        );
    }

    #[test]
    fn dedupes_repeated_headers() {
        let headers = vec![
            "a".to_string(),
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
        ];
        assert_eq!(dedupe_headers(headers), vec!["a", "a.1", "b", "a.2"]);
    }

    #[test]
    fn parses_booleans_case_variants() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }
}
