//! Content analyzer backed by an OpenAI-compatible chat-completions
//! endpoint.
//!
//! Implements [`paperhub_core::traits::analyzer::ContentAnalyzer`]: one
//! request per document, strict-JSON response parsed into a
//! [`paperhub_core::traits::analyzer::DocumentSuggestion`]. Archives and
//! executables are rejected before any network call.

pub mod http;
pub mod mime;
pub mod prompt;

pub use http::HttpAnalyzer;
