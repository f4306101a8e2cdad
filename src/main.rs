//! review-emotion - emotion classification for product reviews
//!
//! Usage:
//!   review-emotion predict "text"          Classify one review
//!   review-emotion batch reviews.xlsx      Classify every row of a file
//!   review-emotion sample --format xlsx    Write a sample input file
//!   review-emotion info                    Show the loaded model
//!   review-emotion --help                  Show all commands

use anyhow::Result;
use clap::Parser;

use review_emotion::cli::output::{create_spinner, print_error, OutputMode};
use review_emotion::cli::Cli;
use review_emotion::init::AppContext;

fn main() {
    if let Err(e) = run() {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Tracing to stderr so stdout stays clean for JSON and piped tables
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("review_emotion=info".parse()?),
        )
        .init();

    let mode = OutputMode::from_json_flag(cli.json);

    if !cli.command.needs_model() {
        return review_emotion::cli::execute_standalone(&cli, mode);
    }

    let spinner = create_spinner("Loading emotion model...", mode);
    let ctx = AppContext::new(cli.data_path.clone());
    spinner.finish_and_clear();

    review_emotion::cli::execute(&cli.command, &ctx?, mode)
}
