//! Input parts for a conversation turn.

use serde::{Deserialize, Serialize};

/// One part of a turn: text or inline binary media.
///
/// # Examples
///
/// ```
/// use learnsphere_core::Input;
///
/// let text = Input::Text("What is 6 x 7?".to_string());
/// let image = Input::InlineData {
///     mime: "image/png".to_string(),
///     data: vec![0x89, 0x50, 0x4E, 0x47],
/// };
/// assert!(text.as_text().is_some());
/// assert!(image.as_text().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text.
    Text(String),

    /// Inline media such as a photographed whiteboard.
    InlineData {
        /// MIME type, e.g. "image/png"
        mime: String,
        /// Raw bytes (base64-encoded on the wire)
        data: Vec<u8>,
    },
}

impl Input {
    /// Text content, if this part is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Input::Text(text) => Some(text),
            Input::InlineData { .. } => None,
        }
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Text(text.to_string())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}
