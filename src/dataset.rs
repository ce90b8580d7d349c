//! Lead file loading.
//!
//! A [`Dataset`] is held column-major: one [`CellValue`] vector per header,
//! all of equal length. Delimited text is read through `csv` and typed per
//! column after the whole file is read; spreadsheets are read through
//! `calamine` and keep the workbook's own cell types.

use std::{collections::HashSet, path::Path};

use calamine::{Data, Reader, open_workbook_auto};
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::{
    data::{CellValue, is_na_token, parse_bool_literal, parse_number},
    error::SummaryError,
    io_utils,
};

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    columns: Vec<Vec<CellValue>>,
    row_count: usize,
}

impl Dataset {
    /// Loads a lead file, picking the reader from the file extension.
    ///
    /// Fails with [`SummaryError::EmptyDataset`] when the file has a header
    /// row but no data rows.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self, SummaryError> {
        let dataset = if io_utils::is_spreadsheet(path) {
            Self::load_spreadsheet(path)?
        } else {
            Self::load_delimited(path, options)?
        };
        debug!(
            "Loaded {} row(s) across {} column(s) from {:?}",
            dataset.row_count,
            dataset.headers.len(),
            path
        );
        if dataset.is_empty() {
            return Err(SummaryError::EmptyDataset);
        }
        Ok(dataset)
    }

    fn load_delimited(path: &Path, options: &LoadOptions) -> Result<Self, SummaryError> {
        let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)
            .map_err(|err| SummaryError::file_read(format!("{err:#}")))?;
        let headers = io_utils::reader_headers(&mut reader, options.encoding)
            .map_err(|err| SummaryError::file_read(format!("{err:#}")))?;
        if headers.is_empty() {
            return Err(SummaryError::file_read("No columns to parse from file"));
        }

        let mut records = Vec::new();
        for (idx, record) in reader.byte_records().enumerate() {
            let row_error = |err: &dyn std::fmt::Display| {
                SummaryError::file_read(format!("Reading row {}: {err}", idx + 2))
            };
            let record = record.map_err(|err| row_error(&err))?;
            let decoded = io_utils::decode_record(&record, options.encoding)
                .map_err(|err| row_error(&err))?;
            if decoded.len() > headers.len() {
                return Err(SummaryError::file_read(format!(
                    "Row {} has {} field(s) but the header defines {}",
                    idx + 2,
                    decoded.len(),
                    headers.len()
                )));
            }
            records.push(decoded);
        }
        Ok(Self::from_text_records(headers, records))
    }

    fn load_spreadsheet(path: &Path) -> Result<Self, SummaryError> {
        let mut workbook = open_workbook_auto(path).map_err(SummaryError::file_read)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| SummaryError::file_read("Workbook does not contain any sheets"))?
            .map_err(SummaryError::file_read)?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            // A blank first sheet is an empty dataset, not an unreadable file.
            return Ok(Self::from_columns(Vec::new(), Vec::new()));
        };
        let headers = unique_headers(header_row.iter().map(|cell| cell.to_string()).collect());
        let mut columns = vec![Vec::new(); headers.len()];
        let mut row_count = 0;
        for row in rows {
            for (idx, column) in columns.iter_mut().enumerate() {
                column.push(row.get(idx).map(spreadsheet_cell).unwrap_or(CellValue::Missing));
            }
            row_count += 1;
        }
        Ok(Self {
            headers,
            columns,
            row_count,
        })
    }

    /// Builds a dataset from raw text cells, typing each column the way a
    /// dataframe reader would: all-`true`/`false` columns become booleans,
    /// all-numeric columns become numbers, everything else stays text.
    pub fn from_text_records(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let headers = unique_headers(headers);
        let row_count = records.len();
        let columns = (0..headers.len())
            .map(|idx| {
                let raw = records
                    .iter()
                    .map(|record| record.get(idx).map(String::as_str).unwrap_or(""))
                    .collect::<Vec<_>>();
                type_text_column(&raw)
            })
            .collect();
        Self {
            headers,
            columns,
            row_count,
        }
    }

    /// Builds a dataset from already-typed columns. Columns shorter than the
    /// longest one are padded with [`CellValue::Missing`].
    pub fn from_columns(headers: Vec<String>, mut columns: Vec<Vec<CellValue>>) -> Self {
        let headers = unique_headers(headers);
        columns.resize(headers.len(), Vec::new());
        columns.truncate(headers.len());
        let row_count = columns.iter().map(Vec::len).max().unwrap_or(0);
        for column in &mut columns {
            column.resize(row_count, CellValue::Missing);
        }
        Self {
            headers,
            columns,
            row_count,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn column(&self, name: &str) -> Option<&[CellValue]> {
        self.column_index(name)
            .map(|idx| self.columns[idx].as_slice())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty() || is_na_token(value)
}

fn type_text_column(raw: &[&str]) -> Vec<CellValue> {
    let present = raw
        .iter()
        .filter(|value| !is_blank(value))
        .collect::<Vec<_>>();
    let all_bool = !present.is_empty() && present.iter().all(|v| parse_bool_literal(v).is_some());
    let all_numeric = !present.is_empty() && present.iter().all(|v| parse_number(v).is_some());

    raw.iter()
        .map(|value| {
            if is_blank(value) {
                CellValue::Missing
            } else if all_bool {
                parse_bool_literal(value)
                    .map(CellValue::Bool)
                    .unwrap_or(CellValue::Missing)
            } else if all_numeric {
                parse_number(value)
                    .map(CellValue::Number)
                    .unwrap_or(CellValue::Missing)
            } else {
                CellValue::Text((*value).to_string())
            }
        })
        .collect()
}

fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Missing,
        Data::String(s) if s.is_empty() || is_na_token(s) => CellValue::Missing,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Text(dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Invalid(e.to_string()),
    }
}

/// Trims labels, names blank ones `Unnamed: N`, and suffixes repeats with
/// `.1`, `.2`, ... so every label is unique.
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(idx, label)| {
            let trimmed = label.trim();
            let base = if trimmed.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                trimmed.to_string()
            };
            let mut candidate = base.clone();
            let mut suffix = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{base}.{suffix}");
                suffix += 1;
            }
            candidate
        })
        .collect()
}
