//! Errors from the `derive_builder` builders.

/// What was wrong with a builder's input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BuilderErrorKind {
    /// A field without a default was never set
    #[display("Missing required field: {}", _0)]
    MissingField(&'static str),
}

/// A builder could not produce its value.
///
/// # Examples
///
/// ```
/// use derive_builder::UninitializedFieldError;
/// use learnsphere_error::{BuilderError, BuilderErrorKind};
///
/// let err = BuilderError::from(UninitializedFieldError::new("goal"));
/// assert_eq!(err.kind(), &BuilderErrorKind::MissingField("goal"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Builder Error: {} at line {} in {}", kind, line, file)]
pub struct BuilderError {
    kind: BuilderErrorKind,
    line: u32,
    file: &'static str,
}

impl BuilderError {
    /// Create a builder error at the caller's location.
    #[track_caller]
    pub fn new(kind: BuilderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// The failure condition.
    pub fn kind(&self) -> &BuilderErrorKind {
        &self.kind
    }
}

impl From<derive_builder::UninitializedFieldError> for BuilderError {
    #[track_caller]
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Self::new(BuilderErrorKind::MissingField(err.field_name()))
    }
}
