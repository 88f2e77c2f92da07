//! GoldenDict OpenAI Translator - translate dictionary lookups through an
//! OpenAI-compatible chat-completion endpoint
//!
//! The host dictionary runs the binary once per lookup and displays its
//! stdout: the original text, a blank line, then the translation or a
//! `!! Error:` / `!Warning:` line.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod core;

// Re-export key types for convenience
pub use crate::core::{
    client::{translate, ChatCompletion, OpenAiClient},
    config::Settings,
    errors::{ConfigError, TranslationError},
    models::{ChatMessage, Role, TranslationOutcome, TranslationRequest},
    prompt::build_request,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
