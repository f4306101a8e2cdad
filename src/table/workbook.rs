//! Excel (.xlsx) reading via calamine and writing via rust_xlsxwriter.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};

use crate::table::{Cell, Table};
use crate::EmotionError;

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}

/// Read the first worksheet; its first row is the header.
pub fn read_xlsx(bytes: &[u8]) -> Result<Table, EmotionError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| EmotionError::MalformedInput("workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| EmotionError::MalformedInput("worksheet is empty".to_string()))?
        .iter()
        .map(|data| to_cell(data).as_text())
        .collect();

    let body = rows
        .map(|row| row.iter().map(to_cell).collect())
        .collect();

    Table::new(headers, body)
}

/// Write a single worksheet with a bold header row.
pub fn write_xlsx(table: &Table) -> Result<Vec<u8>, EmotionError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (c, header) in table.headers().iter().enumerate() {
        worksheet.write_string_with_format(0, column(c)?, header, &bold)?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let r = u32::try_from(r + 1).map_err(|_| {
            EmotionError::MalformedInput("too many rows for an Excel worksheet".to_string())
        })?;
        for (c, cell) in row.iter().enumerate() {
            let c = column(c)?;
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                Cell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column(index: usize) -> Result<u16, EmotionError> {
    u16::try_from(index).map_err(|_| {
        EmotionError::MalformedInput("too many columns for an Excel worksheet".to_string())
    })
}
