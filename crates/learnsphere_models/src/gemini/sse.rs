//! Server-sent event decoding for `streamGenerateContent?alt=sse`.

use super::dto::{ApiErrorEnvelope, GenerateContentResponse};
use async_stream::stream;
use futures_util::{Stream, StreamExt};
use learnsphere_error::{GeminiError, GeminiErrorKind};
use learnsphere_interface::{FinishReason, StreamChunk};
use std::fmt::Display;
use tracing::{debug, trace};

/// Decode a raw SSE byte stream into chunks.
///
/// Events may span byte chunks and one byte chunk may hold several events.
/// A transport error ends the stream with
/// [`GeminiErrorKind::StreamInterrupted`]; an `{"error": ...}` event ends it
/// with [`GeminiErrorKind::ApiRequest`] carrying the event body, so a quota
/// error reported inside the stream still classifies as one.
///
/// # Examples
///
/// ```
/// use futures::StreamExt;
/// use learnsphere_models::decode_sse;
///
/// # #[tokio::main]
/// # async fn main() {
/// let raw = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hi\"}]}}]}\n\n";
/// let bytes = futures::stream::iter(vec![Ok::<_, std::io::Error>(raw.as_bytes().to_vec())]);
/// let chunks: Vec<_> = decode_sse(bytes).collect().await;
/// assert_eq!(chunks[0].as_ref().unwrap().text, "Hi");
/// # }
/// ```
pub fn decode_sse<S, B, E>(bytes: S) -> impl Stream<Item = Result<StreamChunk, GeminiError>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Display + Send,
{
    stream! {
        let mut bytes = Box::pin(bytes);
        let mut buffer: Vec<u8> = Vec::new();
        let mut finished = false;

        while let Some(item) = bytes.next().await {
            let received = match item {
                Ok(received) => received,
                Err(e) => {
                    yield Err(GeminiError::new(GeminiErrorKind::StreamInterrupted(e.to_string())));
                    finished = true;
                    break;
                }
            };
            buffer.extend(received.as_ref().iter().filter(|&&b| b != b'\r'));

            while let Some(end) = find_event_end(&buffer) {
                let event: Vec<u8> = buffer.drain(..end + 2).collect();
                match parse_event(&event[..end]) {
                    Some(Ok(chunk)) => yield Ok(chunk),
                    Some(Err(e)) => {
                        yield Err(e);
                        finished = true;
                        break;
                    }
                    None => {}
                }
            }
            if finished {
                break;
            }
        }

        if !finished && !buffer.iter().all(u8::is_ascii_whitespace) {
            trace!(remaining = buffer.len(), "Decoding unterminated final event");
            if let Some(result) = parse_event(&buffer) {
                yield result;
            }
        }
        debug!("SSE stream ended");
    }
}

fn find_event_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

/// Parse one event block; `None` for comments, keep-alives and `[DONE]`.
///
/// Blocks are cut from the reassembled byte buffer, so a character split
/// across reads is whole again here; invalid UTF-8 is a backend fault.
fn parse_event(block: &[u8]) -> Option<Result<StreamChunk, GeminiError>> {
    let text = match std::str::from_utf8(block) {
        Ok(text) => text,
        Err(e) => {
            return Some(Err(GeminiError::new(GeminiErrorKind::InvalidResponse(
                format!("Stream event is not valid UTF-8: {}", e),
            ))));
        }
    };
    let data: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|value| value.strip_prefix(' ').unwrap_or(value))
        .collect();
    if data.is_empty() {
        return None;
    }

    let payload = data.join("\n");
    if payload.trim().is_empty() || payload.trim() == "[DONE]" {
        return None;
    }

    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(&payload) {
        debug!(code = ?envelope.error.code, "Error event inside stream");
        return Some(Err(GeminiError::new(GeminiErrorKind::ApiRequest(payload))));
    }

    Some(
        serde_json::from_str::<GenerateContentResponse>(&payload)
            .map(|response| StreamChunk {
                text: response.text(),
                citations: response.citations(),
                finish_reason: response.finish_reason().map(FinishReason::from_wire),
            })
            .map_err(|e| {
                GeminiError::new(GeminiErrorKind::InvalidResponse(format!(
                    "Failed to parse stream event: {}",
                    e
                )))
            }),
    )
}
