//! Quota-versus-permanent failure classification.

use learnsphere_error::StatusCarrier;
use regex::Regex;
use std::sync::LazyLock;

/// Matches a quota signal inside a stringified error body.
static QUOTA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b429\b|RESOURCE_EXHAUSTED").expect("Valid quota regex"));

/// How the rotation loop treats a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// The credential hit its quota; rotate and retry.
    Quota,
    /// Anything else; return to the caller untouched.
    Permanent,
}

/// Decide whether a failure is a quota error.
///
/// A structured status code wins when present: 429 is quota, any other code
/// is permanent even if the body happens to mention 429. Without a code the
/// body is searched for a standalone `429` or `RESOURCE_EXHAUSTED`. Errors
/// with neither are permanent.
///
/// # Examples
///
/// ```
/// use learnsphere_error::{GeminiError, GeminiErrorKind};
/// use learnsphere_rate_limit::{FailureClass, classify_error};
///
/// assert_eq!(classify_error(&GeminiError::http(429, "slow down")), FailureClass::Quota);
/// assert_eq!(classify_error(&GeminiError::http(500, "429")), FailureClass::Permanent);
///
/// let embedded = GeminiError::new(GeminiErrorKind::ApiRequest(
///     r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED"}}"#.to_string(),
/// ));
/// assert_eq!(classify_error(&embedded), FailureClass::Quota);
///
/// let timeout = GeminiError::new(GeminiErrorKind::Timeout(30));
/// assert_eq!(classify_error(&timeout), FailureClass::Permanent);
/// ```
pub fn classify_error(error: &impl StatusCarrier) -> FailureClass {
    if let Some(code) = error.status_code() {
        return if code == 429 {
            FailureClass::Quota
        } else {
            FailureClass::Permanent
        };
    }

    match error.error_body() {
        Some(body) if QUOTA_PATTERN.is_match(body) => FailureClass::Quota,
        _ => FailureClass::Permanent,
    }
}
