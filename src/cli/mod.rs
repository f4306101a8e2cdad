//! CLI interface for review-emotion.

pub mod handlers;
pub mod output;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::table::TableFormat;
use output::OutputMode;

/// Review emotion classifier - single reviews or whole CSV/Excel files
#[derive(Parser)]
#[command(name = "review-emotion", version, about, long_about = None)]
pub struct Cli {
    /// Override artifact/data directory (default: ~/.review-emotion)
    #[arg(long, env = "REVIEW_EMOTION_DATA_PATH", global = true)]
    pub data_path: Option<PathBuf>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict the emotion of one review
    Predict {
        /// Review text
        text: String,
        /// Show every class score
        #[arg(long)]
        scores: bool,
    },

    /// Classify every row of a CSV or Excel file
    Batch {
        /// Input file (.csv or .xlsx)
        file: PathBuf,
        /// Write the result here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format (default: from the output extension, else csv)
        #[arg(long, value_enum)]
        format: Option<TableFormat>,
        /// Column holding the review text (default from config: Review)
        #[arg(long)]
        column: Option<String>,
    },

    /// Write a sample input file showing the expected layout
    Sample {
        /// Sample format
        #[arg(long, value_enum, default_value = "csv")]
        format: TableFormat,
        /// Destination (default: sample_input.csv / sample_input.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the loaded model, vocabulary and labels
    Info,

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, elvish, powershell)
        shell: clap_complete::Shell,
    },
}

impl Commands {
    /// Whether the command needs the model loaded.
    pub fn needs_model(&self) -> bool {
        !matches!(self, Commands::Sample { .. } | Commands::Completions { .. })
    }

    fn name(&self) -> &'static str {
        match self {
            Commands::Predict { .. } => "predict",
            Commands::Batch { .. } => "batch",
            Commands::Sample { .. } => "sample",
            Commands::Info => "info",
            Commands::Completions { .. } => "completions",
        }
    }
}

/// Run a command that does not need the model.
pub fn execute_standalone(cli: &Cli, mode: OutputMode) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Sample { format, output } => {
            handlers::sample::handle_sample(cli.data_path.clone(), *format, output.as_deref(), mode)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "review-emotion",
                &mut std::io::stdout(),
            );
            Ok(())
        }
        other => anyhow::bail!("'{}' needs the model loaded", other.name()),
    }
}

/// Run a command against a loaded context.
pub fn execute(
    command: &Commands,
    ctx: &crate::init::AppContext,
    mode: OutputMode,
) -> anyhow::Result<()> {
    match command {
        Commands::Predict { text, scores } => {
            handlers::predict::handle_predict(ctx, text, *scores, mode)
        }
        Commands::Batch {
            file,
            output,
            format,
            column,
        } => handlers::batch::handle_batch(
            ctx,
            file,
            output.as_deref(),
            *format,
            column.as_deref(),
            mode,
        ),
        Commands::Info => handlers::info::handle_info(ctx, mode),
        other => anyhow::bail!("'{}' runs without the model; use execute_standalone", other.name()),
    }
}
