//! Sample input file generation. Never loads the model.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::output::{output_json, print_hint, print_success, OutputMode};
use crate::config::load_config;
use crate::init::resolve_data_path;
use crate::table::sample::{sample_bytes, sample_file_name};
use crate::table::TableFormat;

pub fn handle_sample(
    data_path: Option<PathBuf>,
    format: TableFormat,
    output: Option<&Path>,
    mode: OutputMode,
) -> Result<()> {
    let config = load_config(&resolve_data_path(data_path))?;
    let text_column = &config.table.text_column;

    let destination = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(sample_file_name(format)));
    std::fs::write(&destination, sample_bytes(format, text_column)?)?;

    if mode == OutputMode::Json {
        output_json(&serde_json::json!({
            "path": destination.display().to_string(),
            "format": format,
            "mime_type": format.mime_type(),
        }));
    } else {
        print_success(&format!("Sample written to {}", destination.display()));
        print_hint(&format!(
            "Put one review per row in the '{}' column, then run: review-emotion batch {}",
            text_column,
            destination.display()
        ));
    }
    Ok(())
}
