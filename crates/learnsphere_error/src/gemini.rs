//! Gemini-specific error types and status inspection.

/// Gemini-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// HTTP error with status code and the raw response body
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message or response body
        message: String,
    },
    /// Backend failure reported without a structured status code
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
    /// The request never reached the backend (DNS, TLS, connection reset)
    #[display("Network error: {}", _0)]
    Network(String),
    /// Response body could not be decoded
    #[display("Invalid response from Gemini: {}", _0)]
    InvalidResponse(String),
    /// Response decoded but carried no usable content
    #[display("Received an empty response from the API")]
    EmptyResponse,
    /// Stream failed after it had started delivering chunks
    #[display("Stream interrupted: {}", _0)]
    StreamInterrupted(String),
    /// Attempt exceeded the configured deadline
    #[display("Request timed out after {} seconds", _0)]
    Timeout(u64),
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use learnsphere_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::EmptyResponse);
/// assert!(format!("{}", err).contains("empty response"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an HTTP error with the given status and body.
    #[track_caller]
    pub fn http(status_code: u16, message: impl Into<String>) -> Self {
        Self::new(GeminiErrorKind::HttpError {
            status_code,
            message: message.into(),
        })
    }
}

/// Exposes where a backend error may carry its HTTP status.
///
/// The backend is inconsistent about placement: sometimes the code is a
/// structured field, sometimes it is only embedded in a stringified body.
/// Implementors report both and leave the precedence decision to the
/// classifier.
///
/// # Examples
///
/// ```
/// use learnsphere_error::{GeminiError, GeminiErrorKind, StatusCarrier};
///
/// let structured = GeminiError::http(429, "quota");
/// assert_eq!(structured.status_code(), Some(429));
///
/// let embedded = GeminiError::new(GeminiErrorKind::ApiRequest(
///     r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED"}}"#.to_string(),
/// ));
/// assert_eq!(embedded.status_code(), None);
/// assert!(embedded.error_body().is_some());
/// ```
pub trait StatusCarrier {
    /// Structured status code, if the error has one.
    fn status_code(&self) -> Option<u16>;

    /// Stringified error body that may embed a status code.
    ///
    /// Returns `None` for failures that never came from the backend
    /// (timeouts, network errors, decode errors).
    fn error_body(&self) -> Option<&str>;
}

impl StatusCarrier for GeminiError {
    fn status_code(&self) -> Option<u16> {
        match &self.kind {
            GeminiErrorKind::HttpError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    fn error_body(&self) -> Option<&str> {
        match &self.kind {
            GeminiErrorKind::HttpError { message, .. } => Some(message),
            GeminiErrorKind::ApiRequest(body) => Some(body),
            _ => None,
        }
    }
}
