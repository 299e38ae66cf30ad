//! Backend-side tool capabilities a request may enable.

use serde::{Deserialize, Serialize};

/// A capability the backend runs on the model's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    /// Ground the answer in web search results; responses carry citations.
    GoogleSearch,
}
