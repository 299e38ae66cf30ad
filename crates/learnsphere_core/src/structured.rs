//! Structured (schema-constrained) output decoding.

use learnsphere_error::JsonError;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Decode schema-constrained response text into `T`.
///
/// Surrounding whitespace is ignored. Empty text is an error rather than a
/// default value.
///
/// # Examples
///
/// ```
/// use learnsphere_core::parse_structured;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Card { front: String }
///
/// let card: Card = parse_structured("  {\"front\": \"Mitochondria\"}\n").unwrap();
/// assert_eq!(card.front, "Mitochondria");
/// assert!(parse_structured::<Card>("   ").is_err());
/// ```
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, JsonError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(JsonError::new("response text was empty"));
    }

    serde_json::from_str(trimmed).map_err(|e| {
        debug!(error = %e, length = trimmed.len(), "structured output did not parse");
        JsonError::new(e.to_string())
    })
}
