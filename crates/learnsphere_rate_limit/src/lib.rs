//! Credential rotation and error recovery.
//!
//! The backend enforces quotas per API key. This crate spreads load over a
//! pool of keys: a call runs against the key under a shared cursor and, when
//! the backend answers 429, the cursor moves to the next key and the call is
//! retried. Each key is tried at most once per logical call; if all of them
//! are rate-limited the call fails with
//! [`PoolExhaustedError`](learnsphere_error::PoolExhaustedError).
//!
//! Any other failure is permanent and returned immediately.
//!
//! ```no_run
//! use learnsphere_rate_limit::{CredentialPool, RotatingClient};
//! # use learnsphere_interface::Transport;
//! # async fn demo<T: Transport>(transport: T) -> learnsphere_error::LearnSphereResult<()> {
//! use learnsphere_core::GenerateRequest;
//!
//! let pool = CredentialPool::parse("key-one, key-two")?;
//! let client = RotatingClient::new(transport, pool);
//! let response = client.generate(&GenerateRequest::from_prompt("Hi")).await?;
//! println!("{}", response.decorated_text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod client;
mod config;
mod credential;
mod pool;

pub use classify::{FailureClass, classify_error};
pub use client::{BoundClient, RotatingClient, STREAM_INTERRUPTED_MESSAGE};
pub use config::{CredentialSettings, GeminiSettings, LearnSphereConfig, RotationSettings};
pub use credential::Credential;
pub use pool::CredentialPool;
