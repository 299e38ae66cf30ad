//! Google Gemini REST transport.
//!
//! Requests go to `{base_url}/v1beta/models/{model}:{method}` with the key
//! in the `x-goog-api-key` header. Non-2xx responses become
//! [`GeminiErrorKind::HttpError`](learnsphere_error::GeminiErrorKind) with
//! the raw body, so the rotation layer sees the status code directly.

mod client;
mod dto;
mod sse;

pub use client::GeminiTransport;
pub use sse::decode_sse;
