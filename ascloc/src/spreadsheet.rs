//! Conversion of spreadsheet exports into localization records.
//!
//! The first row is the header. Each remaining row becomes one record whose
//! attributes are taken from the kind's columns. Columns are matched by exact,
//! case-sensitive header name; a column that is missing from the header, or a
//! blank cell, leaves the attribute out. A missing or blank locale cell yields
//! `locale: null`, which never matches a server record.
//!
//! Excel and OpenDocument workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`,
//! `.ods`) are read from their first worksheet. Comma separated files are read
//! from `.csv`; `.tsv` and `.txt` are read as tab separated.
use std::{fs::File, io::Read, path::Path};

use calamine::{Data, Reader, open_workbook_auto};
use serde_json::Value;

use crate::{
    error::Error,
    kind::LocalizationKind,
    types::{Attributes, LOCALE_ATTRIBUTE, LocalizationRecord},
};

/// How a spreadsheet file is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Binary or zipped workbook, read with calamine.
    Workbook,
    /// Delimited text with the given field separator.
    Delimited(u8),
}

impl SheetFormat {
    /// Picks the format from the file extension. Unknown extensions are
    /// read as comma separated text.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => SheetFormat::Workbook,
            Some("tsv" | "txt") => SheetFormat::Delimited(b'\t'),
            _ => SheetFormat::Delimited(b','),
        }
    }
}

/// Reads a spreadsheet file into records with no identifiers, in row order.
pub fn read_spreadsheet<P: AsRef<Path>>(
    path: P,
    kind: &LocalizationKind,
) -> Result<Vec<LocalizationRecord>, Error> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }
    match SheetFormat::from_path(path) {
        SheetFormat::Workbook => read_workbook(path, kind),
        SheetFormat::Delimited(delimiter) => from_reader(File::open(path)?, delimiter, kind),
    }
}

/// Reads the first worksheet of a workbook.
pub fn read_workbook<P: AsRef<Path>>(
    path: P,
    kind: &LocalizationKind,
) -> Result<Vec<LocalizationRecord>, Error> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::InvalidResource(format!("{} has no worksheet", path.display())))??;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let Some(headers) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = ColumnMap::new(&headers, kind);
    Ok(rows
        .map(|row| columns.record(|i| row.get(i).map(String::as_str)))
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Parse delimited text from any reader.
pub fn from_reader<R: Read>(
    reader: R,
    delimiter: u8,
    kind: &LocalizationKind,
) -> Result<Vec<LocalizationRecord>, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let columns = ColumnMap::new(&headers, kind);

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        records.push(columns.record(|i| row.get(i)));
    }
    Ok(records)
}

/// Header positions of the locale column and the kind's editable columns.
struct ColumnMap<'k> {
    kind: &'k LocalizationKind,
    locale: Option<usize>,
    columns: Vec<(&'static str, Option<usize>)>,
}

impl<'k> ColumnMap<'k> {
    fn new(headers: &[String], kind: &'k LocalizationKind) -> Self {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
        };
        ColumnMap {
            kind,
            locale: position(kind.locale_column),
            columns: kind
                .columns
                .iter()
                .map(|column| (column.attribute, position(column.header)))
                .collect(),
        }
    }

    /// Builds one record; `cell` returns the raw text at a column index.
    fn record<'r, F>(&self, cell: F) -> LocalizationRecord
    where
        F: Fn(usize) -> Option<&'r str>,
    {
        let value = |index: Option<usize>| {
            index
                .and_then(&cell)
                .filter(|value| !value.trim().is_empty())
        };

        let mut attributes = Attributes::new();
        attributes.insert(
            LOCALE_ATTRIBUTE.to_string(),
            value(self.locale)
                .map(|locale| Value::String(locale.trim().to_string()))
                .unwrap_or(Value::Null),
        );
        for (attribute, index) in &self.columns {
            if let Some(text) = value(*index) {
                attributes.insert(attribute.to_string(), Value::String(text.to_string()));
            }
        }
        LocalizationRecord::new(self.kind.resource_type, attributes)
    }
}
