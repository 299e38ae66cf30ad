//! Scripted transport for tests.

use async_trait::async_trait;
use learnsphere_core::{
    Citation, GenerateRequest, GenerateResponse, GeneratedImage, ImageRequest,
};
use learnsphere_error::GeminiError;
use learnsphere_interface::{ChunkStream, FinishReason, StreamChunk, Transport};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// How the mock answers calls made with a given key.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Succeed with this response. Streams deliver it as a single chunk.
    Respond(GenerateResponse),
    /// Fail every call with this error. Streams fail to open.
    Fail(GeminiError),
    /// Deliver these chunks, then optionally fail.
    ///
    /// `generate` answers with the concatenated text and all citations, or
    /// with the error if one is scripted.
    Stream {
        /// Chunks in delivery order
        chunks: Vec<StreamChunk>,
        /// Error delivered after the last chunk
        fail_with: Option<GeminiError>,
    },
}

impl MockBehavior {
    /// Succeed with plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Respond(GenerateResponse {
            text: text.into(),
            citations: Vec::new(),
        })
    }

    /// Succeed with text grounded in the given sources.
    pub fn cited(text: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self::Respond(GenerateResponse {
            text: text.into(),
            citations,
        })
    }

    /// Fail with a structured HTTP 429.
    pub fn quota() -> Self {
        Self::Fail(GeminiError::http(
            429,
            r#"{"error":{"code":429,"message":"Resource has been exhausted (e.g. check quota).","status":"RESOURCE_EXHAUSTED"}}"#,
        ))
    }

    /// Fail with a non-quota HTTP status.
    pub fn http_error(status_code: u16, body: impl Into<String>) -> Self {
        Self::Fail(GeminiError::http(status_code, body))
    }

    /// Stream plain-text chunks that all succeed.
    pub fn chunks<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Stream {
            chunks: texts.into_iter().map(StreamChunk::text).collect(),
            fail_with: None,
        }
    }

    /// Stream plain-text chunks, then fail.
    pub fn chunks_then_fail<I, S>(texts: I, error: GeminiError) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Stream {
            chunks: texts.into_iter().map(StreamChunk::text).collect(),
            fail_with: Some(error),
        }
    }
}

/// Which transport method a recorded call used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    /// `generate`
    Generate,
    /// `generate_stream`
    Stream,
    /// `generate_images`
    Images,
}

/// One recorded call.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct MockCall {
    /// Key the call was made with
    api_key: String,
    /// Transport method used
    operation: MockOperation,
    /// Text request, for `Generate` and `Stream`
    request: Option<GenerateRequest>,
    /// Image request, for `Images`
    image_request: Option<ImageRequest>,
}

/// A [`Transport`] that answers from a per-key script.
///
/// Keys without a script use the fallback behavior. Every call is recorded,
/// including failed ones, so tests can assert exactly which credentials were
/// tried and in what order.
///
/// # Examples
///
/// ```
/// use learnsphere_models::{MockBehavior, MockTransport};
///
/// let mock = MockTransport::new(MockBehavior::text("42")).with_key("k1", MockBehavior::quota());
/// assert!(mock.calls().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MockTransport {
    behaviors: HashMap<String, MockBehavior>,
    fallback: MockBehavior,
    images: Result<Vec<GeneratedImage>, GeminiError>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockTransport {
    /// A mock where every key behaves as `fallback`.
    pub fn new(fallback: MockBehavior) -> Self {
        Self {
            behaviors: HashMap::new(),
            fallback,
            images: Ok(vec![GeneratedImage::new(
                "image/jpeg",
                vec![0xFF, 0xD8, 0xFF, 0xD9],
            )]),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script a specific key.
    pub fn with_key(mut self, key: impl Into<String>, behavior: MockBehavior) -> Self {
        self.behaviors.insert(key.into(), behavior);
        self
    }

    /// Script the image endpoint (shared by all keys).
    pub fn with_images(mut self, images: Result<Vec<GeneratedImage>, GeminiError>) -> Self {
        self.images = images;
        self
    }

    /// Every call so far, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Keys used so far, oldest first.
    pub fn keys_used(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.api_key).collect()
    }

    /// Number of calls so far.
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn record(&self, call: MockCall) {
        debug!(operation = ?call.operation, "Mock transport called");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn behavior_for(&self, api_key: &str) -> &MockBehavior {
        self.behaviors.get(api_key).unwrap_or(&self.fallback)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn generate(
        &self,
        api_key: &str,
        req: &GenerateRequest,
    ) -> Result<GenerateResponse, GeminiError> {
        self.record(MockCall {
            api_key: api_key.to_string(),
            operation: MockOperation::Generate,
            request: Some(req.clone()),
            image_request: None,
        });

        match self.behavior_for(api_key) {
            MockBehavior::Respond(response) => Ok(response.clone()),
            MockBehavior::Fail(error) => Err(error.clone()),
            MockBehavior::Stream {
                fail_with: Some(error),
                ..
            } => Err(error.clone()),
            MockBehavior::Stream {
                chunks,
                fail_with: None,
            } => Ok(GenerateResponse {
                text: chunks.iter().map(|c| c.text.as_str()).collect(),
                citations: chunks
                    .iter()
                    .flat_map(|c| c.citations.iter().cloned())
                    .collect(),
            }),
        }
    }

    async fn generate_stream(
        &self,
        api_key: &str,
        req: &GenerateRequest,
    ) -> Result<ChunkStream, GeminiError> {
        self.record(MockCall {
            api_key: api_key.to_string(),
            operation: MockOperation::Stream,
            request: Some(req.clone()),
            image_request: None,
        });

        let items: Vec<Result<StreamChunk, GeminiError>> = match self.behavior_for(api_key) {
            MockBehavior::Respond(response) => vec![Ok(StreamChunk {
                text: response.text.clone(),
                citations: response.citations.clone(),
                finish_reason: Some(FinishReason::Stop),
            })],
            MockBehavior::Fail(error) => return Err(error.clone()),
            MockBehavior::Stream { chunks, fail_with } => chunks
                .iter()
                .cloned()
                .map(Ok)
                .chain(fail_with.iter().cloned().map(Err))
                .collect(),
        };

        Ok(Box::pin(futures_util::stream::iter(items)))
    }

    async fn generate_images(
        &self,
        api_key: &str,
        req: &ImageRequest,
    ) -> Result<Vec<GeneratedImage>, GeminiError> {
        self.record(MockCall {
            api_key: api_key.to_string(),
            operation: MockOperation::Images,
            request: None,
            image_request: Some(req.clone()),
        });

        match self.behavior_for(api_key) {
            MockBehavior::Fail(error) => Err(error.clone()),
            _ => self.images.clone(),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
