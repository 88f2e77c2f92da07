//! Chat-completion client and the translation pipeline

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::config::Settings;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{ChatMessage, TranslationOutcome, TranslationRequest};
use crate::core::prompt::build_request;

/// Issues one chat completion and returns the raw content of the first choice
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send `request` and return the untrimmed reply text
    async fn complete(&self, request: &TranslationRequest) -> Result<String>;
}

/// Request body for `POST /chat/completions`
#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completion endpoint
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAiClient {
    /// Create a client from settings. Only the language list is not used here.
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| TranslationError::UnexpectedError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: completions_url(&settings.base_url),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }

    /// Full URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Append the chat-completions route to a base URL
pub fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    async fn complete(&self, request: &TranslationRequest) -> Result<String> {
        let body = ChatCompletionBody {
            model: &self.model,
            messages: request.messages(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!("POST {} (model {})", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslationError::ConnectionError {
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let status_code = status.as_u16();
            warn!("Chat completion failed with status {}", status_code);

            if status_code == 429 {
                return Err(TranslationError::RateLimitError {
                    message: format!("Error code: {} - {}", status_code, text),
                });
            }

            return Err(TranslationError::ApiStatusError {
                status: status_code,
                body: text,
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|e| TranslationError::ProviderError {
                message: format!("invalid response body: {}", e),
            })?;

        if let Some(error) = parsed.error {
            return Err(TranslationError::ProviderError {
                message: error.to_string(),
            });
        }

        parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TranslationError::UnexpectedError {
                message: "response contained no choices".to_string(),
            })?
            .message
            .content
            .ok_or_else(|| TranslationError::UnexpectedError {
                message: "first choice has no text content".to_string(),
            })
    }
}

/// Run one translation: build the prompt, call `client`, normalize the reply.
///
/// Never fails. Every error is folded into the returned outcome, and blank
/// input or a bad language list returns without calling `client`.
pub async fn translate<C>(client: &C, languages: &[String], text: &str) -> TranslationOutcome
where
    C: ChatCompletion + ?Sized,
{
    let request = match build_request(languages, text) {
        Ok(request) => request,
        Err(e) => {
            warn!("Not sending request: {}", e);
            return e.into();
        }
    };

    match client.complete(&request).await {
        Ok(content) => {
            let outcome = TranslationOutcome::from_content(&content);
            if outcome.is_translated() {
                info!("Translation received ({} chars)", content.trim().chars().count());
            } else {
                warn!("Provider returned an empty translation");
            }
            outcome
        }
        Err(e) => {
            warn!("Translation failed: {}", e);
            e.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url() {
        assert_eq!(
            completions_url("https://api.openai.com/v1"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(completions_url(""), "/chat/completions");
    }

    #[test]
    fn test_client_creation() {
        let settings = Settings {
            base_url: "https://test.com/v1".to_string(),
            ..Default::default()
        };
        let client = OpenAiClient::new(&settings).unwrap();
        assert_eq!(client.endpoint(), "https://test.com/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_empty_endpoint_is_connection_error() {
        let client = OpenAiClient::new(&Settings::default()).unwrap();
        let outcome = translate(&client, &Settings::default().languages, "hello").await;
        assert!(matches!(
            outcome,
            TranslationOutcome::Failed(TranslationError::ConnectionError { .. })
        ));
    }
}
