//! The rotating client: runs a call against the pool until it succeeds,
//! fails permanently, or every credential has hit its quota.

use crate::{Credential, CredentialPool, FailureClass, RotationSettings, classify_error};
use async_stream::stream;
use futures_util::{Stream, StreamExt};
use learnsphere_core::{
    GenerateRequest, GenerateResponse, GeneratedImage, ImageRequest, citation_section,
};
use learnsphere_error::{GeminiError, GeminiErrorKind, LearnSphereResult, PoolExhaustedError};
use learnsphere_interface::{ChunkStream, StreamChunk, TextStream, Transport};
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry2::{Retry, RetryError, strategy::FixedInterval};
use tracing::{debug, error, instrument, warn};

/// Trailing fragment for a stream that failed after it started, when the
/// caller did not supply its own.
pub const STREAM_INTERRUPTED_MESSAGE: &str =
    "\n\nSorry, the response was interrupted. Please try again.";

/// A transport paired with the one credential an attempt may use.
pub struct BoundClient<T> {
    transport: Arc<T>,
    index: usize,
    credential: Credential,
}

impl<T> fmt::Debug for BoundClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundClient")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> BoundClient<T> {
    /// Pool index of the bound credential.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Generate a complete response with the bound credential.
    pub async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, GeminiError> {
        self.transport.generate(self.credential.expose(), req).await
    }

    /// Open a stream with the bound credential.
    pub async fn generate_stream(&self, req: &GenerateRequest) -> Result<ChunkStream, GeminiError> {
        self.transport
            .generate_stream(self.credential.expose(), req)
            .await
    }

    /// Generate images with the bound credential.
    pub async fn generate_images(
        &self,
        req: &ImageRequest,
    ) -> Result<Vec<GeneratedImage>, GeminiError> {
        self.transport
            .generate_images(self.credential.expose(), req)
            .await
    }
}

/// Executes calls against a [`CredentialPool`], rotating on quota errors.
///
/// Calls handed to [`execute`](Self::execute) may run more than once, each
/// time with a different credential, so they must be free of side effects.
pub struct RotatingClient<T> {
    transport: Arc<T>,
    pool: CredentialPool,
    rotation_delay: Duration,
    request_timeout: Option<Duration>,
}

impl<T> Clone for RotatingClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            pool: self.pool.clone(),
            rotation_delay: self.rotation_delay,
            request_timeout: self.request_timeout,
        }
    }
}

impl<T> fmt::Debug for RotatingClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingClient")
            .field("pool", &self.pool)
            .field("rotation_delay", &self.rotation_delay)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> RotatingClient<T> {
    /// Wrap a transport with no delay between rotations and no timeout.
    #[instrument(skip_all, fields(provider = transport.provider_name(), pool_size = pool.len()))]
    pub fn new(transport: T, pool: CredentialPool) -> Self {
        debug!("Creating rotating client");
        Self {
            transport: Arc::new(transport),
            pool,
            rotation_delay: Duration::ZERO,
            request_timeout: None,
        }
    }

    /// Apply delay and timeout from configuration.
    pub fn with_settings(self, settings: &RotationSettings) -> Self {
        self.with_rotation_delay(settings.rotation_delay())
            .with_request_timeout(settings.request_timeout())
    }

    /// Pause between a quota failure and the retry on the next credential.
    pub fn with_rotation_delay(mut self, delay: Duration) -> Self {
        self.rotation_delay = delay;
        self
    }

    /// Bound every attempt; expiry is a permanent failure.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The shared pool.
    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    /// The wrapped transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run `op`, rotating through the pool on quota errors.
    ///
    /// Each credential is tried at most once, absent concurrent rotation by
    /// other callers sharing the pool. Success leaves the cursor on the
    /// credential that worked.
    ///
    /// # Errors
    ///
    /// - [`PoolExhaustedError`] when every attempt failed with a quota error
    /// - the first permanent error, unchanged, otherwise
    pub async fn execute<F, Fut, R>(&self, op: F) -> LearnSphereResult<R>
    where
        F: Fn(BoundClient<T>) -> Fut,
        Fut: Future<Output = Result<R, GeminiError>>,
    {
        let strategy = FixedInterval::new(self.rotation_delay).take(self.pool.len() - 1);
        let mut attempts = 0usize;

        let outcome = Retry::spawn(strategy, || {
            attempts += 1;
            let (index, credential) = self.pool.current();
            let client = BoundClient {
                transport: Arc::clone(&self.transport),
                index,
                credential: credential.clone(),
            };
            let call = self.bounded(op(client));

            async move {
                match call.await {
                    Ok(value) => {
                        debug!(index, "Attempt succeeded");
                        Ok(value)
                    }
                    Err(e) => match classify_error(&e) {
                        FailureClass::Quota => {
                            warn!(index, error = %e, "API credential rate-limited");
                            self.pool.rotate_from(index);
                            Err(RetryError::Transient {
                                err: e,
                                retry_after: None,
                            })
                        }
                        FailureClass::Permanent => {
                            error!(index, error = %e, "Permanent failure, not retrying");
                            Err(RetryError::Permanent(e))
                        }
                    },
                }
            }
        })
        .await;

        match outcome {
            Ok(value) => Ok(value),
            Err(e) if classify_error(&e) == FailureClass::Quota => {
                warn!(attempts, "All API credentials are rate-limited");
                Err(PoolExhaustedError::new(attempts).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Streaming counterpart of [`execute`](Self::execute).
    ///
    /// Uses [`STREAM_INTERRUPTED_MESSAGE`] for failures after the first chunk.
    pub async fn execute_stream<F, Fut>(&self, op: F) -> LearnSphereResult<TextStream>
    where
        F: Fn(BoundClient<T>) -> Fut,
        Fut: Future<Output = Result<ChunkStream, GeminiError>>,
    {
        self.execute_stream_with(op, |_| STREAM_INTERRUPTED_MESSAGE.to_string())
            .await
    }

    /// Open a stream with rotation, then hand back its text fragments.
    ///
    /// Opening and everything up to the first chunk with text are retried
    /// exactly like [`execute`](Self::execute); their failures are returned
    /// as `Err`. Text-less chunks seen before that point are held back so
    /// their sources still reach the citation section.
    /// After that the stream never fails: a transport error ends it with the
    /// fragment produced by `on_interrupt`. A stream that completes normally
    /// ends with the citation section, if any sources were reported.
    #[instrument(skip_all)]
    pub async fn execute_stream_with<F, Fut, I>(
        &self,
        op: F,
        on_interrupt: I,
    ) -> LearnSphereResult<TextStream>
    where
        F: Fn(BoundClient<T>) -> Fut,
        Fut: Future<Output = Result<ChunkStream, GeminiError>>,
        I: FnOnce(&GeminiError) -> String + Send + 'static,
    {
        let (opening, rest) = self
            .execute(|client| {
                let open = op(client);
                async move {
                    let mut stream = open.await?;
                    let mut opening = Vec::new();
                    while let Some(item) = stream.next().await {
                        let chunk = item?;
                        let has_text = !chunk.text.is_empty();
                        opening.push(chunk);
                        if has_text {
                            break;
                        }
                    }
                    Ok((opening, stream))
                }
            })
            .await?;

        debug!(buffered = opening.len(), "Stream opened");
        Ok(Box::pin(text_fragments(opening, rest, on_interrupt)))
    }

    /// One complete generation with rotation.
    pub async fn generate(&self, req: &GenerateRequest) -> LearnSphereResult<GenerateResponse> {
        self.execute(|client| {
            let req = req.clone();
            async move { client.generate(&req).await }
        })
        .await
    }

    /// One streaming generation with rotation and the default interruption
    /// message.
    pub async fn generate_stream(&self, req: &GenerateRequest) -> LearnSphereResult<TextStream> {
        self.generate_stream_with(req, |_| STREAM_INTERRUPTED_MESSAGE.to_string())
            .await
    }

    /// One streaming generation with rotation and a caller-chosen
    /// interruption fragment.
    pub async fn generate_stream_with<I>(
        &self,
        req: &GenerateRequest,
        on_interrupt: I,
    ) -> LearnSphereResult<TextStream>
    where
        I: FnOnce(&GeminiError) -> String + Send + 'static,
    {
        self.execute_stream_with(
            |client| {
                let req = req.clone();
                async move { client.generate_stream(&req).await }
            },
            on_interrupt,
        )
        .await
    }

    /// Image generation with rotation.
    pub async fn generate_images(
        &self,
        req: &ImageRequest,
    ) -> LearnSphereResult<Vec<GeneratedImage>> {
        self.execute(|client| {
            let req = req.clone();
            async move { client.generate_images(&req).await }
        })
        .await
    }

    async fn bounded<Fut, R>(&self, call: Fut) -> Result<R, GeminiError>
    where
        Fut: Future<Output = Result<R, GeminiError>>,
    {
        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                Err(GeminiError::new(GeminiErrorKind::Timeout(limit.as_secs())))
            }),
            None => call.await,
        }
    }
}

/// Flatten a started chunk stream into display fragments.
fn text_fragments<I>(
    opening: Vec<StreamChunk>,
    mut rest: ChunkStream,
    on_interrupt: I,
) -> impl Stream<Item = String> + Send + 'static
where
    I: FnOnce(&GeminiError) -> String + Send + 'static,
{
    stream! {
        let mut on_interrupt = Some(on_interrupt);
        let mut pending = VecDeque::from(opening);
        let mut citations = Vec::new();
        let mut interrupted = false;

        loop {
            let chunk = match pending.pop_front() {
                Some(chunk) => chunk,
                None => match rest.next().await {
                    Some(Ok(chunk)) => chunk,
                    Some(Err(e)) => {
                        error!(error = %e, "Stream failed after it started");
                        let apology = on_interrupt
                            .take()
                            .map(|f| f(&e))
                            .filter(|text| !text.is_empty())
                            .unwrap_or_else(|| STREAM_INTERRUPTED_MESSAGE.to_string());
                        yield apology;
                        interrupted = true;
                        break;
                    }
                    None => break,
                },
            };

            citations.extend(chunk.citations);
            if !chunk.text.is_empty() {
                yield chunk.text;
            }
        }

        if !interrupted {
            let section = citation_section(&citations);
            if !section.is_empty() {
                yield section;
            }
        }
    }
}
