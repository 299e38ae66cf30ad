//! Backend transports for LearnSphere.
//!
//! - [`GeminiTransport`] talks to the Gemini REST API over `reqwest`
//!   (`generateContent`, `streamGenerateContent` as server-sent events, and
//!   Imagen `predict`).
//! - [`MockTransport`] replays scripted outcomes per API key and records
//!   every call, for tests that need deterministic quota failures.
//!
//! # Example
//!
//! ```no_run
//! use learnsphere_core::GenerateRequest;
//! use learnsphere_models::GeminiTransport;
//! use learnsphere_rate_limit::{CredentialPool, GeminiSettings, RotatingClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = GeminiTransport::new(&GeminiSettings::default());
//! let client = RotatingClient::new(transport, CredentialPool::from_env("API_KEY")?);
//! let response = client
//!     .generate(&GenerateRequest::from_prompt("What is a prime number?"))
//!     .await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;
mod mock;

pub use gemini::{GeminiTransport, decode_sse};
pub use mock::{MockBehavior, MockCall, MockOperation, MockTransport};
