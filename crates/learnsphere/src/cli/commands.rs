//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// LearnSphere - AI study companion on the command line
#[derive(Parser, Debug)]
#[command(name = "learnsphere")]
#[command(about = "AI study companion backed by a rotating pool of Gemini API keys", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Comma-separated API keys, overriding the configured environment variable
    #[arg(long, global = true, env = "LEARNSPHERE_API_KEYS", hide_env_values = true)]
    pub api_keys: Option<String>,

    /// Configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the tutor a question (answers use web search and cite sources)
    Solve {
        /// The question or problem
        prompt: String,
    },

    /// Ask a question about an image, e.g. a photographed whiteboard
    AskImage {
        /// Path to the image
        image: PathBuf,

        /// Question about the image
        #[arg(long, default_value = "First, transcribe the problem in this image. Then, solve it.")]
        question: String,

        /// MIME type; guessed from the file extension when omitted
        #[arg(long)]
        mime: Option<String>,
    },

    /// Summarize a YouTube video
    Summarize {
        /// Video URL
        url: String,
    },

    /// Chat with the tutor (type `exit` or send EOF to leave)
    Chat,

    /// Get feedback and a suggested grade for an essay
    Grade {
        #[command(flatten)]
        input: TextInput,
    },

    /// Generate a multiple-choice question
    Quiz {
        /// Topic of the question
        subject: String,

        /// Difficulty, e.g. easy, medium, hard
        #[arg(long, default_value = "medium")]
        difficulty: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Turn a raw transcript into a structured note
    OptimizeNote {
        #[command(flatten)]
        input: TextInput,
    },

    /// Generate quiz questions from a note
    NoteQuiz {
        #[command(flatten)]
        input: TextInput,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Generate flashcards from a note
    Flashcards {
        #[command(flatten)]
        input: TextInput,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Generate a read-aloud explanation and an illustration for a note
    Explain {
        #[command(flatten)]
        input: TextInput,

        /// Where to write the illustration, if one is generated
        #[arg(long)]
        image_out: Option<PathBuf>,
    },

    /// Build a day-by-day study plan
    Plan {
        /// What the student wants to achieve
        #[arg(long)]
        goal: String,

        /// Primary subject
        #[arg(long)]
        subject: String,

        /// Education level
        #[arg(long, default_value = "University")]
        level: String,

        /// Student's country
        #[arg(long)]
        country: String,

        /// Plan length in days
        #[arg(long, default_value = "7")]
        days: u32,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Turn a note into a podcast-style recap script
    Recap {
        #[command(flatten)]
        input: TextInput,
    },

    /// A study tip or fun fact
    Fact {
        /// Field of study
        field: String,
    },

    /// Today's challenge question
    Challenge {
        /// Field of study
        field: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Send feedback about the app
    Suggest {
        /// Feedback category, e.g. "Feature Request"
        #[arg(long, default_value = "General")]
        category: String,

        /// The feedback itself
        message: String,
    },
}

/// Text given inline, from a file, or on stdin
#[derive(Args, Debug)]
pub struct TextInput {
    /// The text itself
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
