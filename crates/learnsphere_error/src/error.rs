//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, GeminiError, JsonError, PoolExhaustedError};

/// Every failure the LearnSphere crates can surface.
///
/// # Examples
///
/// ```
/// use learnsphere_error::{LearnSphereError, PoolExhaustedError};
///
/// let err: LearnSphereError = PoolExhaustedError::new(2).into();
/// assert!(err.is_pool_exhausted());
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum LearnSphereErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Gemini backend error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// All credentials rate-limited
    #[from(PoolExhaustedError)]
    PoolExhausted(PoolExhaustedError),
    /// Structured-output decode error
    #[from(JsonError)]
    Json(JsonError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// LearnSphere error with kind discrimination.
///
/// # Examples
///
/// ```
/// use learnsphere_error::{ConfigError, LearnSphereResult};
///
/// fn might_fail() -> LearnSphereResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("LearnSphere Error: {}", _0)]
pub struct LearnSphereError(Box<LearnSphereErrorKind>);

impl LearnSphereError {
    /// Create a new error from a kind.
    pub fn new(kind: LearnSphereErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LearnSphereErrorKind {
        &self.0
    }

    /// True when every credential in the pool was rate-limited.
    pub fn is_pool_exhausted(&self) -> bool {
        matches!(self.kind(), LearnSphereErrorKind::PoolExhausted(_))
    }
}

// Generic From implementation for any type that converts to LearnSphereErrorKind
impl<T> From<T> for LearnSphereError
where
    T: Into<LearnSphereErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for LearnSphere operations.
pub type LearnSphereResult<T> = std::result::Result<T, LearnSphereError>;
