//! Downloadable sample input showing the expected layout.

use crate::table::{Table, TableFormat};
use crate::EmotionError;

pub const SAMPLE_CSV_NAME: &str = "sample_input.csv";
pub const SAMPLE_XLSX_NAME: &str = "sample_input.xlsx";

const SAMPLE_REVIEWS: [&str; 3] = [
    "Saya sangat senang dengan layanannya",
    "Produk ini sangat mengecewakan",
    "Pengiriman cepat, terima kasih!",
];

/// Three example reviews under the given text column.
pub fn sample_table(text_column: &str) -> Table {
    Table {
        headers: vec![text_column.to_string()],
        rows: SAMPLE_REVIEWS.iter().map(|r| vec![(*r).into()]).collect(),
    }
}

/// Default file name for a sample in `format`.
pub fn sample_file_name(format: TableFormat) -> &'static str {
    match format {
        TableFormat::Csv => SAMPLE_CSV_NAME,
        TableFormat::Xlsx => SAMPLE_XLSX_NAME,
    }
}

/// Encoded sample file.
pub fn sample_bytes(format: TableFormat, text_column: &str) -> Result<Vec<u8>, EmotionError> {
    format.encode(&sample_table(text_column))
}
