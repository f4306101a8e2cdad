//! In-memory tables read from and written to CSV or Excel files.

pub mod delimited;
pub mod sample;
pub mod workbook;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::EmotionError;

/// One cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl Cell {
    /// Text a classifier should see for this cell; empty cells read as "".
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            other => other.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// Header row plus rectangular data rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table; every row must have one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, EmotionError> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(EmotionError::MalformedInput(format!(
                "row {} has {} cells but the header has {} columns",
                i + 1,
                row.len(),
                headers.len()
            )));
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of column `index`, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// New table with `values` appended as the last column.
    pub fn with_column(&self, name: &str, values: Vec<Cell>) -> Result<Self, EmotionError> {
        if values.len() != self.rows.len() {
            return Err(EmotionError::MalformedInput(format!(
                "column '{}' has {} values for {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }
        let mut headers = self.headers.clone();
        headers.push(name.to_string());
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut row = row.clone();
                row.push(value);
                row
            })
            .collect();
        Ok(Self { headers, rows })
    }

    /// Rows as strings, for terminal display.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Cell::to_string).collect())
            .collect()
    }
}

/// Supported tabular file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    /// Format implied by the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, EmotionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(TableFormat::Csv),
            Some("xlsx") => Ok(TableFormat::Xlsx),
            Some(other) => Err(EmotionError::UnsupportedFormat(format!(".{}", other))),
            None => Err(EmotionError::UnsupportedFormat(format!(
                "'{}' has no file extension",
                path.display()
            ))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            TableFormat::Csv => "text/csv",
            TableFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Table, EmotionError> {
        match self {
            TableFormat::Csv => delimited::read_csv(bytes),
            TableFormat::Xlsx => workbook::read_xlsx(bytes),
        }
    }

    pub fn encode(&self, table: &Table) -> Result<Vec<u8>, EmotionError> {
        match self {
            TableFormat::Csv => delimited::write_csv(table),
            TableFormat::Xlsx => workbook::write_xlsx(table),
        }
    }
}

/// Read a CSV or XLSX file; any other extension is rejected before reading.
pub fn read_table(path: &Path) -> Result<Table, EmotionError> {
    let format = TableFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    let table = format.decode(&bytes)?;
    tracing::info!(
        "Read {} rows x {} columns from {}",
        table.len(),
        table.headers().len(),
        path.display()
    );
    Ok(table)
}

/// Write a table in the given format.
pub fn write_table(path: &Path, table: &Table, format: TableFormat) -> Result<(), EmotionError> {
    let bytes = format.encode(table)?;
    std::fs::write(path, bytes)?;
    tracing::info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}
