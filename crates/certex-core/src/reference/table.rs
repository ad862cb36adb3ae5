//! Tabular reference datasets loaded from workbooks or CSV.

use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::DatasetError;
use crate::models::config::DatasetConfig;

/// Where a dataset lives.
///
/// `path` is a spreadsheet workbook (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`,
/// `.ods`), a CSV file, or a directory holding one CSV file per sheet. For a
/// workbook `sheet` names the worksheet and defaults to the first one; for a
/// directory it names the file stem and defaults to the first CSV file in name
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSource {
    pub path: PathBuf,
    pub sheet: Option<String>,
}

impl TableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
        }
    }

    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    /// Source described by a configuration entry, if it names a path.
    pub fn from_config(config: &DatasetConfig) -> Option<Self> {
        config
            .path
            .as_ref()
            .map(|path| Self::new(path).with_sheet(config.sheet.clone()))
    }

    /// Resolve the file to read.
    pub fn resolve(&self) -> Result<PathBuf, DatasetError> {
        if self.path.is_file() {
            return Ok(self.path.clone());
        }
        if !self.path.is_dir() {
            return Err(DatasetError::NotFound(self.path.clone()));
        }

        if let Some(sheet) = &self.sheet {
            let file = self.path.join(format!("{}.csv", sheet));
            return if file.is_file() {
                Ok(file)
            } else {
                Err(DatasetError::NotFound(file))
            };
        }

        let entries = std::fs::read_dir(&self.path).map_err(|source| DatasetError::Read {
            path: self.path.clone(),
            source,
        })?;
        let mut sheets: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_csv(p))
            .collect();
        sheets.sort();
        sheets
            .into_iter()
            .next()
            .ok_or_else(|| DatasetError::NotFound(self.path.clone()))
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

fn is_csv(path: &Path) -> bool {
    has_extension(path, &["csv"])
}

fn is_workbook(path: &Path) -> bool {
    has_extension(path, &["xlsx", "xlsm", "xlsb", "xls", "ods"])
}

/// In-memory table of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Load the table a source points at.
    pub fn load(source: &TableSource) -> Result<Self, DatasetError> {
        let path = source.resolve()?;
        let table = if is_workbook(&path) {
            Self::from_workbook(&path, source.sheet.as_deref())?
        } else {
            let bytes = std::fs::read(&path).map_err(|source| DatasetError::Read {
                path: path.clone(),
                source,
            })?;
            Self::parse(&decode_text(&bytes))?
        };
        debug!(
            "Loaded {} rows with columns {:?} from {}",
            table.len(),
            table.columns,
            path.display()
        );
        Ok(table)
    }

    /// Parse CSV content with a header row.
    ///
    /// The delimiter is taken from the header line (`;`, tab or `,`). Short
    /// rows are padded with empty cells.
    pub fn parse(content: &str) -> Result<Self, DatasetError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let header = content.lines().next().unwrap_or_default();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(detect_delimiter(header))
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(columns.len().max(row.len()), String::new());
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Read one worksheet; the first row is the header.
    ///
    /// Without `sheet` the first worksheet is read.
    pub fn from_workbook(path: &Path, sheet: Option<&str>) -> Result<Self, DatasetError> {
        let mut workbook = open_workbook_auto(path)?;
        let names = workbook.sheet_names();
        let name = match sheet {
            Some(sheet) => names
                .iter()
                .find(|n| n.trim() == sheet.trim())
                .cloned()
                .ok_or_else(|| DatasetError::MissingSheet {
                    path: path.to_path_buf(),
                    sheet: sheet.to_string(),
                })?,
            None => names
                .first()
                .cloned()
                .ok_or_else(|| DatasetError::NotFound(path.to_path_buf()))?,
        };
        debug!("Reading sheet {:?} of {}", name, path.display());

        let range = workbook.worksheet_range(&name)?;
        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
        let columns = rows.next().unwrap_or_default();
        let rows = rows
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .map(|mut row| {
                row.resize(columns.len().max(row.len()), String::new());
                row
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text, empty when the row is shorter than `col`.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Whether every non-empty cell of `col` is a date (and at least one is).
    pub fn is_date_column(&self, col: usize) -> bool {
        let mut seen = false;
        for row in 0..self.len() {
            let cell = self.cell(row, col);
            if cell.is_empty() {
                continue;
            }
            if parse_date_cell(cell).is_none() {
                return false;
            }
            seen = true;
        }
        seen
    }
}

/// Text of a CSV export: UTF-8 when valid, otherwise Windows-1251.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("Dataset is not UTF-8, decoding as Windows-1251");
            let (text, _, _) = encoding_rs::WINDOWS_1251.decode(bytes);
            text.into_owned()
        }
    }
}

/// Worksheet cell as table text. Date cells become `DD.MM.YYYY`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(n) => n.to_string(),
        Data::Float(n) => n.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%d.%m.%Y").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
    }
}

fn detect_delimiter(header: &str) -> u8 {
    [b';', b'\t', b',']
        .into_iter()
        .map(|d| (d, header.bytes().filter(|&b| b == d).count()))
        .filter(|&(_, n)| n > 0)
        .max_by_key(|&(_, n)| n)
        .map(|(d, _)| d)
        .unwrap_or(b',')
}

/// Parse a date cell in any of the layouts spreadsheet exports produce.
pub fn parse_date_cell(cell: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 4] = ["%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y", "%d.%m.%y"];
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%d.%m.%Y %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    let cell = cell.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(cell, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(cell, f).ok())
                .map(|dt| dt.date())
        })
}
