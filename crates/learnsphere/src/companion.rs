//! Study operations over a rotating Gemini client.

use crate::apology::{apology_for, generic_apology};
use crate::study::{Explanation, ExplanationDraft, Flashcard, QuizQuestion, StudyDay, StudyPlanParams};
use crate::{prompts, schema};
use futures_util::stream;
use learnsphere_core::{GenerateRequest, ImageRequest, Input, Message, Role, Tool, parse_structured};
use learnsphere_error::{JsonError, LearnSphereResult};
use learnsphere_interface::{TextStream, Transport};
use learnsphere_rate_limit::{GeminiSettings, RotatingClient};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{debug, instrument, warn};

/// The study features of LearnSphere.
///
/// Every operation shares one [`RotatingClient`], and so one credential
/// cursor. Failures never escape as errors except from
/// [`generate_explanation`](Self::generate_explanation):
///
/// - streams end with an apology fragment
/// - text operations return the apology in place of the answer
/// - structured operations return `None` (or a canned question)
///
/// # Examples
///
/// ```
/// use futures_util::StreamExt;
/// use learnsphere::{
///     CredentialPool, GeminiSettings, MockBehavior, MockTransport, RotatingClient,
///     StudyCompanion,
/// };
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = MockTransport::new(MockBehavior::chunks(["Light ", "scatters."]));
/// let client = RotatingClient::new(transport, CredentialPool::parse("k1")?);
/// let companion = StudyCompanion::new(client, &GeminiSettings::default());
///
/// let answer: String = companion
///     .solve_problem_stream("Why is the sky blue?")
///     .await
///     .collect()
///     .await;
/// assert_eq!(answer, "Light scatters.");
/// # Ok(())
/// # }
/// ```
pub struct StudyCompanion<T> {
    client: RotatingClient<T>,
    text_model: String,
    image_model: String,
}

impl<T> Clone for StudyCompanion<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            text_model: self.text_model.clone(),
            image_model: self.image_model.clone(),
        }
    }
}

impl<T> fmt::Debug for StudyCompanion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudyCompanion")
            .field("client", &self.client)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}

impl<T: Transport> StudyCompanion<T> {
    /// Wrap a client, taking model names from `settings`.
    pub fn new(client: RotatingClient<T>, settings: &GeminiSettings) -> Self {
        Self {
            client,
            text_model: settings.text_model.clone(),
            image_model: settings.image_model.clone(),
        }
    }

    /// The underlying rotating client.
    pub fn client(&self) -> &RotatingClient<T> {
        &self.client
    }

    // ---------------------------------------------------------------------
    // Streaming
    // ---------------------------------------------------------------------

    /// Tutor answer with web search; sources are appended at the end.
    #[instrument(skip_all)]
    pub async fn solve_problem_stream(&self, prompt: &str) -> TextStream {
        let req = GenerateRequest {
            system_instruction: Some(prompts::AI_TUTOR_INSTRUCTION.to_string()),
            tools: vec![Tool::GoogleSearch],
            ..self.prompt(prompt)
        };
        self.stream(req, "solve_problem_stream").await
    }

    /// Tutor answer to a question about an image.
    #[instrument(skip(self, image, question), fields(bytes = image.len()))]
    pub async fn ask_about_image_stream(
        &self,
        image: &[u8],
        mime: &str,
        question: &str,
    ) -> TextStream {
        let message = Message {
            role: Role::User,
            content: vec![
                Input::InlineData {
                    mime: mime.to_string(),
                    data: image.to_vec(),
                },
                Input::Text(question.to_string()),
            ],
        };
        let req = GenerateRequest {
            system_instruction: Some(prompts::AI_TUTOR_INSTRUCTION.to_string()),
            ..self.conversation(vec![message])
        };
        self.stream(req, "ask_about_image_stream").await
    }

    /// Summary of a video, researched through web search.
    #[instrument(skip(self))]
    pub async fn summarize_video_stream(&self, url: &str) -> TextStream {
        let req = GenerateRequest {
            tools: vec![Tool::GoogleSearch],
            ..self.prompt(prompts::video_summary(url))
        };
        self.stream(req, "summarize_video_stream").await
    }

    /// Next tutor turn in a conversation.
    ///
    /// `history` holds the earlier turns, oldest first; `prompt` is the new
    /// user turn.
    #[instrument(skip_all, fields(turns = history.len()))]
    pub async fn tutor_chat_stream(&self, history: &[Message], prompt: &str) -> TextStream {
        let messages = history
            .iter()
            .cloned()
            .chain(std::iter::once(Message::user(prompt)))
            .collect();
        let req = GenerateRequest {
            system_instruction: Some(prompts::AI_TUTOR_CHAT_INSTRUCTION.to_string()),
            ..self.conversation(messages)
        };
        self.stream(req, "tutor_chat_stream").await
    }

    /// Structured Markdown feedback on an essay.
    #[instrument(skip_all)]
    pub async fn grade_essay_stream(&self, essay: &str) -> TextStream {
        self.stream(self.prompt(prompts::essay_feedback(essay)), "grade_essay_stream")
            .await
    }

    // ---------------------------------------------------------------------
    // Text
    // ---------------------------------------------------------------------

    /// Turn a raw transcript into a structured Markdown note.
    #[instrument(skip_all)]
    pub async fn optimize_note(&self, transcript: &str) -> String {
        self.text(self.prompt(prompts::optimize_note(transcript)), "optimize_note")
            .await
    }

    /// Friendly acknowledgement of user feedback.
    #[instrument(skip(self, message))]
    pub async fn suggestion_reply(&self, category: &str, message: &str) -> String {
        self.text(
            self.prompt(prompts::suggestion_reply(category, message)),
            "suggestion_reply",
        )
        .await
    }

    /// Podcast-style script recapping a note.
    #[instrument(skip_all)]
    pub async fn audio_recap_script(&self, note: &str) -> String {
        self.text(self.prompt(prompts::audio_recap(note)), "audio_recap_script")
            .await
    }

    /// A short tip or fun fact for a field of study.
    #[instrument(skip(self))]
    pub async fn study_fact(&self, field: &str) -> String {
        self.text(self.prompt(prompts::study_fact(field)), "study_fact")
            .await
    }

    // ---------------------------------------------------------------------
    // Structured
    // ---------------------------------------------------------------------

    /// One multiple-choice question with its options shuffled.
    #[instrument(skip(self))]
    pub async fn generate_quiz_question(
        &self,
        subject: &str,
        difficulty: &str,
    ) -> Option<QuizQuestion> {
        let req = GenerateRequest {
            response_schema: Some(schema::quiz_question()),
            ..self.prompt(prompts::quiz_question(subject, difficulty))
        };
        let mut question: QuizQuestion =
            logged(self.structured(&req).await, "generate_quiz_question")?;
        question.shuffle_options(&mut rand::thread_rng());
        Some(question)
    }

    /// Three questions testing a note.
    #[instrument(skip_all)]
    pub async fn quiz_from_note(&self, note: &str) -> Option<Vec<QuizQuestion>> {
        let req = GenerateRequest {
            response_schema: Some(schema::quiz_list()),
            ..self.prompt(prompts::quiz_from_note(note))
        };
        logged(self.structured(&req).await, "quiz_from_note")
    }

    /// Five flashcards from a note.
    #[instrument(skip_all)]
    pub async fn flashcards_from_note(&self, note: &str) -> Option<Vec<Flashcard>> {
        let req = GenerateRequest {
            response_schema: Some(schema::flashcard_list()),
            ..self.prompt(prompts::flashcards_from_note(note))
        };
        logged(self.structured(&req).await, "flashcards_from_note")
    }

    /// A day-by-day plan.
    #[instrument(skip(self))]
    pub async fn study_plan(&self, params: &StudyPlanParams) -> Option<Vec<StudyDay>> {
        let req = GenerateRequest {
            response_schema: Some(schema::study_plan()),
            ..self.prompt(prompts::study_plan(params))
        };
        logged(self.structured(&req).await, "study_plan")
    }

    /// A thought-provoking question; never fails.
    ///
    /// Falls back to [`QuizQuestion::fallback_challenge`] when generation or
    /// parsing fails.
    #[instrument(skip(self))]
    pub async fn daily_challenge(&self, field: &str) -> QuizQuestion {
        let req = GenerateRequest {
            response_schema: Some(schema::daily_challenge()),
            ..self.prompt(prompts::daily_challenge(field))
        };
        match logged(self.structured::<QuizQuestion>(&req).await, "daily_challenge") {
            Some(mut challenge) => {
                challenge.shuffle_options(&mut rand::thread_rng());
                challenge
            }
            None => QuizQuestion::fallback_challenge(),
        }
    }

    /// A read-aloud script plus an illustration.
    ///
    /// # Errors
    ///
    /// Fails when the script cannot be generated, or when the model leaves
    /// the script or image prompt empty. A failed illustration is not an
    /// error; the explanation comes back without an image.
    #[instrument(skip_all)]
    pub async fn generate_explanation(&self, note: &str) -> LearnSphereResult<Explanation> {
        let req = GenerateRequest {
            response_schema: Some(schema::explanation()),
            ..self.prompt(prompts::explanation(note))
        };
        let draft: ExplanationDraft = self.structured(&req).await?;
        if draft.script.trim().is_empty() || draft.image_prompt.trim().is_empty() {
            return Err(JsonError::new("Failed to generate script or image prompt.").into());
        }

        let image_req = ImageRequest {
            model: Some(self.image_model.clone()),
            ..ImageRequest::new(draft.image_prompt)
        };
        let image = match self.client.generate_images(&image_req).await {
            Ok(images) => {
                let first = images.into_iter().next();
                if first.is_none() {
                    warn!("Image generation succeeded but returned no image data");
                }
                first
            }
            Err(e) => {
                warn!(error = %e, "Image generation failed, returning script only");
                None
            }
        };

        Ok(Explanation {
            script: draft.script,
            image,
        })
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    fn conversation(&self, messages: Vec<Message>) -> GenerateRequest {
        GenerateRequest {
            model: Some(self.text_model.clone()),
            messages,
            ..GenerateRequest::default()
        }
    }

    fn prompt(&self, prompt: impl Into<String>) -> GenerateRequest {
        self.conversation(vec![Message::user(prompt)])
    }

    async fn stream(&self, req: GenerateRequest, context: &'static str) -> TextStream {
        match self
            .client
            .generate_stream_with(&req, move |_| generic_apology(context))
            .await
        {
            Ok(fragments) => fragments,
            Err(e) => Box::pin(stream::iter([apology_for(&e, context)])),
        }
    }

    async fn text(&self, req: GenerateRequest, context: &str) -> String {
        match self.client.generate(&req).await {
            Ok(response) => response.decorated_text(),
            Err(e) => apology_for(&e, context),
        }
    }

    async fn structured<R: DeserializeOwned>(&self, req: &GenerateRequest) -> LearnSphereResult<R> {
        let response = self.client.generate(req).await?;
        debug!(bytes = response.text.len(), "Parsing structured response");
        Ok(parse_structured(&response.text)?)
    }
}

fn logged<R>(result: LearnSphereResult<R>, context: &str) -> Option<R> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(context, error = %e, "Structured generation failed");
            None
        }
    }
}
