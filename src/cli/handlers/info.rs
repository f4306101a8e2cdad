//! Loaded artifact summary.

use anyhow::Result;

use crate::cli::output::{output_json, print_header, print_kv, print_table, OutputMode};
use crate::init::AppContext;
use crate::model::ScoreModel;

pub fn handle_info(ctx: &AppContext, mode: OutputMode) -> Result<()> {
    let manifest = ctx.model.manifest();
    let padding = ctx.pipeline.padding();

    if mode == OutputMode::Json {
        output_json(&serde_json::json!({
            "data_path": ctx.data_path.display().to_string(),
            "artifacts": {
                "manifest": ctx.files.manifest.display().to_string(),
                "weights": ctx.files.weights.display().to_string(),
                "vocabulary": ctx.files.vocabulary.display().to_string(),
                "labels": ctx.files.labels.display().to_string(),
            },
            "model": manifest,
            "maxlen": ctx.model.maxlen(),
            "sequence": padding,
            "vocab_size": ctx.pipeline.vocab_size(),
            "labels": ctx.labels.classes(),
        }));
        return Ok(());
    }

    print_header(&format!("Model '{}'", ctx.model.name()));
    print_kv("Data path", &ctx.data_path.display().to_string());
    print_kv("Manifest", &ctx.files.manifest.display().to_string());
    print_kv("Weights", &ctx.files.weights.display().to_string());
    print_kv("Vocabulary", &ctx.files.vocabulary.display().to_string());
    print_kv("Labels file", &ctx.files.labels.display().to_string());
    print_kv(
        "Sequence",
        &format!(
            "maxlen {} (model {}), padding {:?}, truncating {:?}",
            padding.maxlen,
            ctx.model.maxlen(),
            padding.padding,
            padding.truncating
        ),
    );
    print_kv("Vocabulary size", &ctx.pipeline.vocab_size().to_string());
    print_kv("Labels", &ctx.labels.classes().join(", "));

    print_header("Layers");
    print_table(
        &["Name", "Class", "Config"],
        manifest
            .layers
            .iter()
            .map(|spec| vec![spec.name.clone(), spec.class_name.clone(), spec.config.to_string()])
            .collect(),
    );
    Ok(())
}
