//! Bulk classification of a tabular file's text column.

use std::collections::BTreeMap;

use tracing::info;

use crate::pipeline::InferencePipeline;
use crate::table::{Cell, Table};
use crate::EmotionError;

/// Classify every row of `text_column` and append the labels as
/// `prediction_column`.
///
/// The whole column is scored in one batch. Non-text cells are stringified
/// and written back as text; empty cells are classified as "" and stay
/// empty. Other columns keep their cell types. The input table is left
/// untouched.
pub fn classify_table(
    pipeline: &InferencePipeline,
    table: &Table,
    text_column: &str,
    prediction_column: &str,
) -> Result<Table, EmotionError> {
    let index = table.column_index(text_column).ok_or_else(|| {
        EmotionError::MalformedInput(format!(
            "column '{}' not found (available: {})",
            text_column,
            table.headers().join(", ")
        ))
    })?;

    let texts: Vec<String> = table.column(index).map(Cell::as_text).collect();
    info!("Classifying {} rows from column '{}'", texts.len(), text_column);

    let labels = pipeline.predict_batch(&texts)?;

    let rows = table
        .rows()
        .iter()
        .zip(texts)
        .map(|(row, text)| {
            let mut row = row.clone();
            if !row[index].is_empty() {
                row[index] = Cell::Text(text);
            }
            row
        })
        .collect();
    Table::new(table.headers().to_vec(), rows)?
        .with_column(prediction_column, labels.into_iter().map(Cell::Text).collect())
}

/// Count of each label in `column`, for a short summary after a bulk run.
pub fn label_counts(table: &Table, column: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    if let Some(index) = table.column_index(column) {
        for cell in table.column(index) {
            *counts.entry(cell.as_text()).or_insert(0) += 1;
        }
    }
    counts
}
