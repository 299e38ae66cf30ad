//! Message types for conversation history.

use crate::{Input, Role};
use serde::{Deserialize, Serialize};

/// A multimodal turn in a conversation.
///
/// # Examples
///
/// ```
/// use learnsphere_core::{Message, Role};
///
/// let message = Message::user("Explain photosynthesis");
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.content.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(build_fn(error = "learnsphere_error::BuilderError"))]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The parts of the message, in order
    pub content: Vec<Input>,
}

impl Message {
    /// A single-part user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![Input::Text(text.into())],
        }
    }

    /// A single-part model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: vec![Input::Text(text.into())],
        }
    }
}
