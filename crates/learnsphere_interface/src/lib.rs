//! Trait definitions for the LearnSphere generative backend.
//!
//! A [`Transport`] performs exactly one call with exactly one API key. It
//! knows nothing about pools or rotation; that policy lives in
//! `learnsphere_rate_limit`, which drives any `Transport` implementation.

mod traits;
mod types;

pub use traits::Transport;
pub use types::{ChunkStream, FinishReason, StreamChunk, TextStream};
