//! Prompt construction from the configured language list

use crate::core::errors::{Result, TranslationError};
use crate::core::models::TranslationRequest;

const OUTPUT_ONLY: &str = "Only output the translated text result without other words.";

/// Derive the system instruction for a language list of one or two names
pub fn instruction_for(languages: &[String]) -> Result<String> {
    if languages.iter().any(|lang| lang.is_empty()) {
        return Err(TranslationError::InvalidLanguageConfig);
    }

    match languages {
        [a, b] => Ok(format!(
            "Translate the input text from {a} to {b} or from {b} to {a}. {OUTPUT_ONLY}"
        )),
        [a] => Ok(format!("Translate the input text to {a}. {OUTPUT_ONLY}")),
        _ => Err(TranslationError::InvalidLanguageConfig),
    }
}

/// Wrap the raw input as the user message. Embedded quotes are left as-is.
pub fn wrap_user_text(text: &str) -> String {
    format!("Text to translate: \"{}\"", text)
}

/// Build the request for `text`. Blank input is rejected before the
/// language list is looked at.
pub fn build_request(languages: &[String], text: &str) -> Result<TranslationRequest> {
    if text.trim().is_empty() {
        return Err(TranslationError::EmptyInput);
    }

    Ok(TranslationRequest {
        instruction: instruction_for(languages)?,
        user_text: wrap_user_text(text),
    })
}
