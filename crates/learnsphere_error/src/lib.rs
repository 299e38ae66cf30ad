//! Error types for the LearnSphere library.
//!
//! This crate provides the foundation error types used throughout the LearnSphere workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! The failure taxonomy of the generative client maps onto these types:
//!
//! | Condition | Type |
//! |---|---|
//! | no credentials configured | [`ConfigError`] |
//! | one credential over quota | [`GeminiErrorKind::HttpError`] with status 429 |
//! | every credential over quota | [`PoolExhaustedError`] |
//! | anything else from the backend | [`GeminiError`] |
//! | structured output did not decode | [`JsonError`] |
//!
//! # Examples
//!
//! ```
//! use learnsphere_error::{ConfigError, LearnSphereResult};
//!
//! fn load() -> LearnSphereResult<String> {
//!     Err(ConfigError::new("API_KEY is not set"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod gemini;
mod json;
mod pool;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{LearnSphereError, LearnSphereErrorKind, LearnSphereResult};
pub use gemini::{GeminiError, GeminiErrorKind, StatusCarrier};
pub use json::JsonError;
pub use pool::PoolExhaustedError;
