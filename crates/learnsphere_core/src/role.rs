//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Who authored a conversation turn.
///
/// System instructions are not a turn; they travel separately on
/// [`GenerateRequest`](crate::GenerateRequest).
///
/// # Examples
///
/// ```
/// use learnsphere_core::Role;
///
/// assert_ne!(Role::User, Role::Model);
/// assert_eq!(format!("{}", Role::Model), "Model");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Turns written by the student
    User,
    /// Turns written by the model
    Model,
}
