//! Credential pool exhaustion.

/// Every credential in the pool failed with a quota error during one call.
///
/// Kept distinct from a single 429 so callers can show a "high demand, try
/// later" message instead of a generic failure.
///
/// # Examples
///
/// ```
/// use learnsphere_error::PoolExhaustedError;
///
/// let err = PoolExhaustedError::new(3);
/// assert_eq!(err.attempts, 3);
/// assert!(format!("{}", err).contains("3 credential"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "All API credentials are rate-limited ({} credential attempts) at line {} in {}",
    attempts,
    line,
    file
)]
pub struct PoolExhaustedError {
    /// Number of credentials tried before giving up
    pub attempts: usize,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl PoolExhaustedError {
    /// Create a new PoolExhaustedError with automatic location tracking.
    #[track_caller]
    pub fn new(attempts: usize) -> Self {
        let location = std::panic::Location::caller();
        Self {
            attempts,
            line: location.line(),
            file: location.file(),
        }
    }
}
