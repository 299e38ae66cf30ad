//! Generation request and response types.

use crate::{Citation, Message, Tool, decorate_with_citations};
use serde::{Deserialize, Serialize};

/// A single generation call.
///
/// Built once and never mutated; retries on another credential reuse the
/// same request.
///
/// # Examples
///
/// ```
/// use learnsphere_core::{GenerateRequest, Message, Tool};
///
/// let request = GenerateRequest::builder()
///     .model(Some("gemini-2.5-flash".to_string()))
///     .messages(vec![Message::user("Who discovered penicillin?")])
///     .tools(vec![Tool::GoogleSearch])
///     .build()
///     .unwrap();
///
/// assert!(request.uses_search());
/// assert!(!request.wants_json());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(default, build_fn(error = "learnsphere_error::BuilderError"))]
pub struct GenerateRequest {
    /// Model identifier; `None` means the transport's configured default
    pub model: Option<String>,
    /// Conversation history, oldest first, ending with the new user turn
    pub messages: Vec<Message>,
    /// System instruction applied to the whole conversation
    pub system_instruction: Option<String>,
    /// Backend tools to enable
    pub tools: Vec<Tool>,
    /// JSON schema the response text must conform to
    pub response_schema: Option<serde_json::Value>,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// A request holding a single user prompt and nothing else.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(prompt)],
            ..Self::default()
        }
    }

    /// True when web-search grounding is enabled.
    pub fn uses_search(&self) -> bool {
        self.tools.contains(&Tool::GoogleSearch)
    }

    /// True when the response must be schema-constrained JSON.
    pub fn wants_json(&self) -> bool {
        self.response_schema.is_some()
    }
}

/// A completed generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text as the backend returned it
    pub text: String,
    /// Grounding sources, in backend order, possibly with duplicates
    pub citations: Vec<Citation>,
}

impl GenerateResponse {
    /// Response text with the deduplicated source list appended.
    pub fn decorated_text(&self) -> String {
        decorate_with_citations(&self.text, &self.citations)
    }
}
