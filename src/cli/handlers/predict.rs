//! Single-review prediction.

use anyhow::Result;
use colored::Colorize;

use crate::cli::output::{output_json, print_hint, print_table, OutputMode};
use crate::init::AppContext;
use crate::EmotionError;

pub const EMPTY_TEXT_PROMPT: &str = "Please enter a review text to predict.";

pub fn handle_predict(ctx: &AppContext, text: &str, show_scores: bool, mode: OutputMode) -> Result<()> {
    let prediction = match ctx.pipeline.predict_one_scored(text) {
        Ok(prediction) => prediction,
        Err(EmotionError::EmptyInput) => {
            if mode == OutputMode::Json {
                output_json(&serde_json::json!({ "label": null, "message": EMPTY_TEXT_PROMPT }));
            } else {
                print_hint(EMPTY_TEXT_PROMPT);
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if mode == OutputMode::Json {
        output_json(&prediction);
        return Ok(());
    }

    println!(
        "Predicted Emotion: {} ({:.1}%)",
        prediction.label.green().bold(),
        prediction.confidence * 100.0
    );

    if show_scores {
        let mut rows: Vec<(&str, f32)> = ctx
            .labels
            .classes()
            .iter()
            .map(String::as_str)
            .zip(prediction.scores.iter().copied())
            .collect();
        rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        print_table(
            &["Emotion", "Score"],
            rows.into_iter()
                .map(|(label, score)| vec![label.to_string(), format!("{:.4}", score)])
                .collect(),
        );
    }

    Ok(())
}
