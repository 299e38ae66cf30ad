//! Core data types for the LearnSphere library.
//!
//! This crate provides the request/response model shared by every other
//! LearnSphere crate, plus two pure post-processing helpers that operate on
//! text the backend already returned:
//!
//! - [`decorate_with_citations`] appends a deduplicated source list
//! - [`parse_structured`] decodes schema-constrained JSON output

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod citation;
mod image;
mod input;
mod message;
mod request;
mod role;
mod structured;
mod tool;

pub use citation::{Citation, citation_section, decorate_with_citations, dedup_citations};
pub use image::{GeneratedImage, ImageRequest, ImageRequestBuilder};
pub use input::Input;
pub use message::{Message, MessageBuilder};
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse};
pub use role::Role;
pub use structured::parse_structured;
pub use tool::Tool;
