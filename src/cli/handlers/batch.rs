//! Bulk classification of a CSV or Excel file.

use std::path::Path;

use anyhow::Result;

use crate::cli::output::{
    create_spinner, output_json, print_hint, print_kv, print_success, print_table, OutputMode,
};
use crate::init::AppContext;
use crate::services::bulk::{classify_table, label_counts};
use crate::table::{read_table, write_table, TableFormat};

/// Output format: explicit flag, else the output extension, else CSV.
pub fn output_format(explicit: Option<TableFormat>, output: Option<&Path>) -> TableFormat {
    explicit
        .or_else(|| output.and_then(|p| TableFormat::from_path(p).ok()))
        .unwrap_or(TableFormat::Csv)
}

pub fn handle_batch(
    ctx: &AppContext,
    file: &Path,
    output: Option<&Path>,
    format: Option<TableFormat>,
    column: Option<&str>,
    mode: OutputMode,
) -> Result<()> {
    let table = read_table(file)?;
    let text_column = column.unwrap_or(&ctx.config.table.text_column);
    let prediction_column = &ctx.config.table.prediction_column;

    let spinner = create_spinner(&format!("Classifying {} reviews...", table.len()), mode);
    let result = classify_table(&ctx.pipeline, &table, text_column, prediction_column);
    spinner.finish_and_clear();
    let result = result?;

    if let Some(path) = output {
        let format = output_format(format, Some(path));
        write_table(path, &result, format)?;
        if mode == OutputMode::Json {
            output_json(&serde_json::json!({
                "path": path.display().to_string(),
                "format": format,
                "rows": result.len(),
                "counts": label_counts(&result, prediction_column),
            }));
        } else {
            print_success(&format!(
                "Classified {} rows -> {}",
                result.len(),
                path.display()
            ));
            for (label, count) in label_counts(&result, prediction_column) {
                print_kv(&label, &count.to_string());
            }
        }
        return Ok(());
    }

    match (mode, format) {
        (OutputMode::Json, _) => output_json(&result),
        (OutputMode::Human, Some(fmt)) => {
            use std::io::Write;
            std::io::stdout().write_all(&fmt.encode(&result)?)?;
        }
        (OutputMode::Human, None) => {
            print_table(result.headers(), result.display_rows());
            print_hint("Use --output <FILE> to save the result as CSV or Excel.");
        }
    }
    Ok(())
}
