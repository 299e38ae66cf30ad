//! Command handlers.

use super::commands::{Cli, Commands, OutputFormat, TextInput};
use futures_util::StreamExt;
use learnsphere::{
    CredentialPool, Flashcard, GeminiTransport, JsonError, LearnSphereConfig, LearnSphereResult,
    Message, QuizQuestion, RotatingClient, StudyCompanion, StudyDay, StudyPlanParams, TextStream,
    explanation_failure,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, info, instrument};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

type Companion = StudyCompanion<GeminiTransport>;

/// Load configuration and credentials and build the study companion.
///
/// Fails when no usable API key is configured.
#[instrument(skip_all)]
pub fn connect(cli: &Cli) -> LearnSphereResult<Companion> {
    let config = LearnSphereConfig::load_with(cli.config.as_ref())?;
    let pool = match &cli.api_keys {
        Some(raw) => CredentialPool::parse(raw)?,
        None => CredentialPool::from_env(&config.credentials.env_var)?,
    };
    info!(
        credentials = pool.len(),
        model = %config.gemini.text_model,
        "Gemini client ready"
    );

    let client = RotatingClient::new(GeminiTransport::new(&config.gemini), pool)
        .with_settings(&config.rotation);
    Ok(StudyCompanion::new(client, &config.gemini))
}

/// Run one command.
pub async fn handle_command(companion: &Companion, command: Commands) -> CliResult<()> {
    match command {
        Commands::Solve { prompt } => {
            print_stream(companion.solve_problem_stream(&prompt).await).await?;
        }

        Commands::AskImage {
            image,
            question,
            mime,
        } => {
            let mime = match mime {
                Some(mime) => mime,
                None => guess_mime(&image)?.to_string(),
            };
            let bytes = tokio::fs::read(&image).await?;
            debug!(bytes = bytes.len(), %mime, "Image loaded");
            print_stream(
                companion
                    .ask_about_image_stream(&bytes, &mime, &question)
                    .await,
            )
            .await?;
        }

        Commands::Summarize { url } => {
            print_stream(companion.summarize_video_stream(&url).await).await?;
        }

        Commands::Chat => chat(companion).await?,

        Commands::Grade { input } => {
            let essay = read_text(input).await?;
            print_stream(companion.grade_essay_stream(&essay).await).await?;
        }

        Commands::Quiz {
            subject,
            difficulty,
            format,
        } => {
            let question = companion
                .generate_quiz_question(&subject, &difficulty)
                .await
                .ok_or("Could not generate a quiz question")?;
            emit(format, &question, |q| print_question(None, q))?;
        }

        Commands::OptimizeNote { input } => {
            let transcript = read_text(input).await?;
            println!("{}", companion.optimize_note(&transcript).await);
        }

        Commands::NoteQuiz { input, format } => {
            let note = read_text(input).await?;
            let questions = companion
                .quiz_from_note(&note)
                .await
                .ok_or("Could not generate a quiz from the note")?;
            emit(format, &questions, |questions| {
                for (i, question) in questions.iter().enumerate() {
                    print_question(Some(i + 1), question);
                }
            })?;
        }

        Commands::Flashcards { input, format } => {
            let note = read_text(input).await?;
            let cards = companion
                .flashcards_from_note(&note)
                .await
                .ok_or("Could not generate flashcards from the note")?;
            emit(format, &cards, |cards: &Vec<Flashcard>| {
                for card in cards {
                    println!("{}", card.front);
                    println!("  {}", card.back);
                    println!();
                }
            })?;
        }

        Commands::Explain { input, image_out } => {
            let note = read_text(input).await?;
            let explanation = match companion.generate_explanation(&note).await {
                Ok(explanation) => explanation,
                Err(e) => {
                    eprintln!("{}", explanation_failure(&e));
                    std::process::exit(1);
                }
            };
            println!("{}", explanation.script);

            match (&explanation.image, image_out) {
                (Some(image), Some(path)) => {
                    tokio::fs::write(&path, image.data()).await?;
                    eprintln!("Illustration saved to {}", path.display());
                }
                (Some(_), None) => eprintln!("Illustration generated; pass --image-out to save it"),
                (None, _) => eprintln!("No illustration could be generated"),
            }
        }

        Commands::Plan {
            goal,
            subject,
            level,
            country,
            days,
            format,
        } => {
            let params = StudyPlanParams::builder()
                .goal(goal)
                .subject(subject)
                .level(level)
                .country(country)
                .duration(days)
                .build()?;
            let plan = companion
                .study_plan(&params)
                .await
                .ok_or("Could not generate a study plan")?;
            emit(format, &plan, |plan: &Vec<StudyDay>| {
                for day in plan {
                    println!("{} - {}", day.day, day.focus);
                    for task in &day.tasks {
                        println!("  - {}", task);
                    }
                }
            })?;
        }

        Commands::Recap { input } => {
            let note = read_text(input).await?;
            println!("{}", companion.audio_recap_script(&note).await);
        }

        Commands::Fact { field } => {
            println!("{}", companion.study_fact(&field).await);
        }

        Commands::Challenge { field, format } => {
            let challenge = companion.daily_challenge(&field).await;
            emit(format, &challenge, |c| print_question(None, c))?;
        }

        Commands::Suggest { category, message } => {
            println!("{}", companion.suggestion_reply(&category, &message).await);
        }
    }

    Ok(())
}

/// Line-oriented tutor chat keeping the whole conversation as history.
async fn chat(companion: &Companion) -> CliResult<()> {
    let mut history: Vec<Message> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let prompt = line.trim().to_string();
        if prompt.is_empty() {
            continue;
        }
        if matches!(prompt.as_str(), "exit" | "quit") {
            break;
        }

        let reply = print_stream(companion.tutor_chat_stream(&history, &prompt).await).await?;
        history.push(Message::user(prompt));
        history.push(Message::model(reply));
    }

    Ok(())
}

/// Print fragments as they arrive and return the full text.
async fn print_stream(mut fragments: TextStream) -> std::io::Result<String> {
    let mut stdout = std::io::stdout();
    let mut full = String::new();
    while let Some(fragment) = fragments.next().await {
        write!(stdout, "{}", fragment)?;
        stdout.flush()?;
        full.push_str(&fragment);
    }
    writeln!(stdout)?;
    Ok(full)
}

async fn read_text(input: TextInput) -> CliResult<String> {
    let text = match (input.text, input.file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(&path).await?,
        (None, None) => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        }
    };

    if text.trim().is_empty() {
        return Err("No input text given".into());
    }
    Ok(text)
}

fn guess_mime(path: &Path) -> CliResult<&'static str> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => Ok("image/png"),
        Some("jpg" | "jpeg") => Ok("image/jpeg"),
        Some("webp") => Ok("image/webp"),
        Some("gif") => Ok("image/gif"),
        Some("heic") => Ok("image/heic"),
        _ => Err(format!("Cannot guess the MIME type of {}; pass --mime", path.display()).into()),
    }
}

fn emit<V: Serialize>(format: OutputFormat, value: &V, human: impl FnOnce(&V)) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Human => human(value),
    }
    Ok(())
}

fn print_question(number: Option<usize>, question: &QuizQuestion) {
    match number {
        Some(n) => println!("{}. {}", n, question.question),
        None => println!("{}", question.question),
    }
    for (letter, option) in ('A'..='Z').zip(&question.options) {
        println!("   {}) {}", letter, option);
    }
    println!("   Answer: {}", question.correct_answer);
    println!();
}
