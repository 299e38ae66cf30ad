//! LearnSphere CLI binary.
//!
//! Study helpers on the command line:
//! - Tutor answers, image questions and video summaries, streamed
//! - Notes turned into quizzes, flashcards, explanations and recaps
//! - Study plans and daily challenges

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, connect, handle_command};

    // `.env` may hold the API keys
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing on stderr so streamed answers stay clean on stdout
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // A missing key list stops here, before any command runs
    let companion = connect(&cli)?;

    handle_command(&companion, cli.command).await
}
