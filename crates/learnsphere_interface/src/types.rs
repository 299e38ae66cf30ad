//! Streaming types.

use futures_util::stream::Stream;
use learnsphere_core::Citation;
use learnsphere_error::GeminiError;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// A stream of raw chunks from one backend call.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, GeminiError>> + Send>>;

/// A stream of display-ready text fragments.
///
/// Errors have already been folded into the text, so consumers simply
/// concatenate.
pub type TextStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// A single chunk from a streaming response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Incremental text; may be empty for metadata-only chunks
    pub text: String,
    /// Grounding sources reported with this chunk
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
    /// Set on the final chunk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

impl StreamChunk {
    /// A text-only chunk.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Why generation stopped.
///
/// Parses from the backend's wire names; anything unrecognized becomes
/// [`FinishReason::Other`].
///
/// # Examples
///
/// ```
/// use learnsphere_interface::FinishReason;
///
/// assert_eq!(FinishReason::from_wire("MAX_TOKENS"), FinishReason::MaxTokens);
/// assert_eq!(FinishReason::from_wire("SOMETHING_NEW"), FinishReason::Other);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Model completed naturally.
    Stop,
    /// Hit the output token limit.
    MaxTokens,
    /// Blocked by safety filters.
    Safety,
    /// Blocked for reciting training data.
    Recitation,
    /// Other/unknown reason.
    Other,
}

impl FinishReason {
    /// Map a wire value, defaulting unknown values to `Other`.
    pub fn from_wire(value: &str) -> Self {
        value.parse().unwrap_or(FinishReason::Other)
    }
}
