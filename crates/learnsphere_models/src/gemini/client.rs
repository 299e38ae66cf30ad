//! `reqwest`-based Gemini transport.

use super::dto::{
    GenerateContentRequest, GenerateContentResponse, PredictInstance, PredictParameters,
    PredictRequest, PredictResponse,
};
use super::sse::decode_sse;
use async_trait::async_trait;
use base64::Engine;
use learnsphere_core::{GenerateRequest, GenerateResponse, GeneratedImage, ImageRequest};
use learnsphere_error::{GeminiError, GeminiErrorKind};
use learnsphere_interface::{ChunkStream, Transport};
use learnsphere_rate_limit::GeminiSettings;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini REST API transport.
///
/// Holds no credentials; every call receives its key from the rotation
/// layer. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GeminiTransport {
    http: reqwest::Client,
    base_url: String,
    text_model: String,
    image_model: String,
}

impl GeminiTransport {
    /// Create a transport with a fresh HTTP client.
    #[instrument(name = "gemini_transport_new", skip(settings), fields(base_url = %settings.base_url))]
    pub fn new(settings: &GeminiSettings) -> Self {
        Self::with_client(reqwest::Client::new(), settings)
    }

    /// Create a transport over an existing HTTP client.
    pub fn with_client(http: reqwest::Client, settings: &GeminiSettings) -> Self {
        debug!(
            text_model = %settings.text_model,
            image_model = %settings.image_model,
            "Creating Gemini transport"
        );
        Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            text_model: settings.text_model.clone(),
            image_model: settings.image_model.clone(),
        }
    }

    /// Default text model.
    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    /// Default image model.
    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, model, method)
    }

    /// POST a JSON body, returning the response only if it is 2xx.
    async fn post<B: Serialize + ?Sized>(
        &self,
        api_key: &str,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, GeminiError> {
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Request failed");
                GeminiError::new(GeminiErrorKind::Network(e.to_string()))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), "Gemini returned error status");
        Err(GeminiError::http(status.as_u16(), body))
    }

    async fn post_json<B, R>(&self, api_key: &str, url: &str, body: &B) -> Result<R, GeminiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.post(api_key, url, body).await?;
        let raw = response
            .text()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::Network(e.to_string())))?;
        serde_json::from_str(&raw).map_err(|e| {
            GeminiError::new(GeminiErrorKind::InvalidResponse(format!(
                "Failed to parse response: {}",
                e
            )))
        })
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    #[instrument(skip(self, api_key, req), fields(model))]
    async fn generate(
        &self,
        api_key: &str,
        req: &GenerateRequest,
    ) -> Result<GenerateResponse, GeminiError> {
        let model = req.model.as_deref().unwrap_or(&self.text_model);
        tracing::Span::current().record("model", model);

        let url = self.endpoint(model, "generateContent");
        let body = GenerateContentRequest::from(req);
        let response: GenerateContentResponse = self.post_json(api_key, &url, &body).await?;

        if let Some(reason) = response.block_reason() {
            return Err(GeminiError::new(GeminiErrorKind::InvalidResponse(format!(
                "Prompt blocked: {}",
                reason
            ))));
        }
        if response.candidates.is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::EmptyResponse));
        }

        debug!("Generation complete");
        Ok(GenerateResponse {
            text: response.text(),
            citations: response.citations(),
        })
    }

    #[instrument(skip(self, api_key, req), fields(model))]
    async fn generate_stream(
        &self,
        api_key: &str,
        req: &GenerateRequest,
    ) -> Result<ChunkStream, GeminiError> {
        let model = req.model.as_deref().unwrap_or(&self.text_model);
        tracing::Span::current().record("model", model);

        let url = format!("{}?alt=sse", self.endpoint(model, "streamGenerateContent"));
        let body = GenerateContentRequest::from(req);
        let response = self.post(api_key, &url, &body).await?;

        debug!("Streaming request accepted, decoding SSE");
        Ok(Box::pin(decode_sse(response.bytes_stream())))
    }

    #[instrument(skip(self, api_key, req), fields(model))]
    async fn generate_images(
        &self,
        api_key: &str,
        req: &ImageRequest,
    ) -> Result<Vec<GeneratedImage>, GeminiError> {
        let model = req.model.as_deref().unwrap_or(&self.image_model);
        tracing::Span::current().record("model", model);

        let url = self.endpoint(model, "predict");
        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: req.prompt.clone(),
            }],
            parameters: PredictParameters {
                sample_count: req.sample_count,
                aspect_ratio: req.aspect_ratio.clone(),
                output_mime_type: req.output_mime_type.clone(),
            },
        };
        let response: PredictResponse = self.post_json(api_key, &url, &body).await?;

        let images = response
            .predictions
            .into_iter()
            .filter_map(|p| {
                let encoded = p.bytes_base64_encoded?;
                let mime = p.mime_type.unwrap_or_else(|| req.output_mime_type.clone());
                Some((mime, encoded))
            })
            .map(|(mime, encoded)| {
                base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map(|data| GeneratedImage::new(mime, data))
                    .map_err(|e| {
                        GeminiError::new(GeminiErrorKind::InvalidResponse(format!(
                            "Invalid image payload: {}",
                            e
                        )))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if images.is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::EmptyResponse));
        }
        debug!(count = images.len(), "Images generated");
        Ok(images)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
