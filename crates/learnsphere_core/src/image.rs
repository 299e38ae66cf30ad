//! Image generation types.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// An image generation call.
///
/// # Examples
///
/// ```
/// use learnsphere_core::ImageRequest;
///
/// let request = ImageRequest::new("A labelled diagram of a plant cell");
/// assert_eq!(request.sample_count, 1);
/// assert_eq!(request.aspect_ratio, "16:9");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(build_fn(error = "learnsphere_error::BuilderError"))]
pub struct ImageRequest {
    /// Model identifier; `None` means the transport's configured default
    #[builder(default)]
    pub model: Option<String>,
    /// Text description of the image
    #[builder(setter(into))]
    pub prompt: String,
    /// Number of images to produce
    #[builder(default = "1")]
    pub sample_count: u32,
    /// Aspect ratio such as "16:9"
    #[builder(setter(into), default = "\"16:9\".to_string()")]
    pub aspect_ratio: String,
    /// Output encoding
    #[builder(setter(into), default = "\"image/jpeg\".to_string()")]
    pub output_mime_type: String,
}

impl ImageRequest {
    /// One 16:9 JPEG for the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: None,
            prompt: prompt.into(),
            sample_count: 1,
            aspect_ratio: "16:9".to_string(),
            output_mime_type: "image/jpeg".to_string(),
        }
    }

    /// Start building an image request.
    pub fn builder() -> ImageRequestBuilder {
        ImageRequestBuilder::default()
    }
}

/// A generated image.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct GeneratedImage {
    /// MIME type of `data`
    mime: String,
    /// Decoded image bytes
    data: Vec<u8>,
}

impl GeneratedImage {
    /// Wrap decoded image bytes.
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            data,
        }
    }

    /// Render as a `data:` URL suitable for an `<img>` tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use learnsphere_core::GeneratedImage;
    ///
    /// let image = GeneratedImage::new("image/jpeg", vec![1, 2, 3]);
    /// assert_eq!(image.to_data_url(), "data:image/jpeg;base64,AQID");
    /// ```
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}
