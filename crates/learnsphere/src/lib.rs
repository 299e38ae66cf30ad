//! LearnSphere - an AI study companion on a resilient Gemini client.
//!
//! The interesting part lives below the study operations: a pool of API
//! keys shared by every call, rotated when the backend reports a quota
//! error, with each key tried at most once per call. Streams that fail
//! mid-way end with an apology fragment instead of an error, and
//! search-grounded answers carry a deduplicated source list.
//!
//! # Quick Start
//!
//! ```no_run
//! use futures_util::StreamExt;
//! use learnsphere::{
//!     CredentialPool, GeminiTransport, LearnSphereConfig, RotatingClient, StudyCompanion,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LearnSphereConfig::load()?;
//! let pool = CredentialPool::from_env(&config.credentials.env_var)?;
//! let client = RotatingClient::new(GeminiTransport::new(&config.gemini), pool)
//!     .with_settings(&config.rotation);
//! let companion = StudyCompanion::new(client, &config.gemini);
//!
//! let mut answer = companion.solve_problem_stream("Why is the sky blue?").await;
//! while let Some(fragment) = answer.next().await {
//!     print!("{}", fragment);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `learnsphere_error` - Error types
//! - `learnsphere_core` - Requests, responses, citations, structured output
//! - `learnsphere_interface` - The `Transport` trait and stream types
//! - `learnsphere_rate_limit` - Credential pool, classification, rotation
//! - `learnsphere_models` - Gemini REST transport and a scripted mock
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod apology;
mod companion;
mod prompts;
mod schema;
mod study;

pub use apology::{HIGH_DEMAND_APOLOGY, apology_for, explanation_failure, generic_apology};
pub use companion::StudyCompanion;
pub use study::{
    Explanation, Flashcard, QuizQuestion, StudyDay, StudyPlanParams, StudyPlanParamsBuilder,
};

pub use learnsphere_core::{
    Citation, GenerateRequest, GenerateRequestBuilder, GenerateResponse, GeneratedImage,
    ImageRequest, Input, Message, Role, Tool, citation_section, decorate_with_citations,
    parse_structured,
};
pub use learnsphere_error::{
    BuilderError, ConfigError, GeminiError, GeminiErrorKind, JsonError, LearnSphereError,
    LearnSphereErrorKind, LearnSphereResult, PoolExhaustedError, StatusCarrier,
};
pub use learnsphere_interface::{ChunkStream, FinishReason, StreamChunk, TextStream, Transport};
pub use learnsphere_models::{
    GeminiTransport, MockBehavior, MockCall, MockOperation, MockTransport, decode_sse,
};
pub use learnsphere_rate_limit::{
    BoundClient, Credential, CredentialPool, CredentialSettings, FailureClass, GeminiSettings,
    LearnSphereConfig, RotatingClient, RotationSettings, STREAM_INTERRUPTED_MESSAGE,
    classify_error,
};
