//! User-facing messages for failed operations.

use learnsphere_error::LearnSphereError;
use tracing::error;

/// Shown when every API key is rate-limited.
pub const HIGH_DEMAND_APOLOGY: &str =
    "I'm sorry, our service is currently experiencing high demand. Please try again later.";

/// The apology for any failure other than pool exhaustion.
pub fn generic_apology(context: &str) -> String {
    format!(
        "Sorry, I encountered an error while performing the action in {}. Please try again.",
        context
    )
}

/// Turn an error into text that can be shown in place of an answer.
///
/// # Examples
///
/// ```
/// use learnsphere::{HIGH_DEMAND_APOLOGY, LearnSphereError, PoolExhaustedError, apology_for};
///
/// let err: LearnSphereError = PoolExhaustedError::new(3).into();
/// assert_eq!(apology_for(&err, "optimize_note"), HIGH_DEMAND_APOLOGY);
/// ```
pub fn apology_for(err: &LearnSphereError, context: &str) -> String {
    error!(context, error = %err, "Operation failed");
    if err.is_pool_exhausted() {
        HIGH_DEMAND_APOLOGY.to_string()
    } else {
        generic_apology(context)
    }
}

/// Message shown when an explanation could not be produced at all.
///
/// # Examples
///
/// ```
/// use learnsphere::{HIGH_DEMAND_APOLOGY, LearnSphereError, PoolExhaustedError, explanation_failure};
///
/// let err: LearnSphereError = PoolExhaustedError::new(2).into();
/// assert!(explanation_failure(&err).ends_with(HIGH_DEMAND_APOLOGY));
/// ```
pub fn explanation_failure(err: &LearnSphereError) -> String {
    format!(
        "Failed to generate explanation. {}",
        apology_for(err, "generate_explanation")
    )
}
