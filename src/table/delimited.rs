//! CSV reading and writing.

use crate::table::{Cell, Table};
use crate::EmotionError;

/// Parse UTF-8 CSV with a header row. Empty fields become [`Cell::Empty`],
/// numbers that print back unchanged become [`Cell::Number`], and the rest
/// stays text.
pub fn read_csv(bytes: &[u8]) -> Result<Table, EmotionError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(EmotionError::MalformedInput(
            "CSV file has no header row".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .map(parse_field)
            .collect();
        rows.push(row);
    }

    Table::new(headers, rows)
}

/// "007", "1e3" and "+5" stay text: a number would not write them back.
fn parse_field(field: &str) -> Cell {
    if field.is_empty() {
        return Cell::Empty;
    }
    match field.parse::<f64>() {
        Ok(n) if n.is_finite() && n.to_string() == field => Cell::Number(n),
        _ => Cell::Text(field.to_string()),
    }
}

/// Serialize to UTF-8 CSV: header row, then data rows, no index column.
pub fn write_csv(table: &Table) -> Result<Vec<u8>, EmotionError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(Cell::to_string))?;
    }
    writer
        .into_inner()
        .map_err(|e| EmotionError::Io(std::io::Error::other(e.to_string())))
}
