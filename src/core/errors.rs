//! Custom error types for configuration and translation

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-stage errors. Any of these aborts before a request is made.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No config file at the resolved path
    #[error("Config file not found at {}", .path.display())]
    NotFound {
        path: PathBuf,
    },

    /// Host OS has no known config location
    #[error("Unsupported platform: {os}")]
    UnsupportedPlatform {
        os: String,
    },

    /// Config file exists but has no `[OpenAI]` section
    #[error("Failed to load configuration: no [OpenAI] section in {}", .path.display())]
    MissingSection {
        path: PathBuf,
    },

    /// Field present but not parsable as its declared type
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        key: String,
        message: String,
    },

    /// Config file could not be read or is not valid INI
    #[error("Failed to load configuration: {0}")]
    Read(#[from] config::ConfigError),
}

/// Translation-stage errors, rendered to the host as `!! Error:` lines
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Input text blank after trimming
    #[error("Input text is empty.")]
    EmptyInput,

    /// Language list is not one or two non-empty names
    #[error("Invalid language configuration in config.ini.")]
    InvalidLanguageConfig,

    /// Endpoint unreachable, timed out, or malformed
    #[error("Failed to connect to OpenAI API: {message}")]
    ConnectionError {
        message: String,
    },

    /// Provider throttled the request (HTTP 429)
    #[error("OpenAI API request exceeded rate limit: {message}")]
    RateLimitError {
        message: String,
    },

    /// Any other non-2xx status
    #[error("OpenAI API returned an API Error: Status {status}, Response: {body}")]
    ApiStatusError {
        status: u16,
        body: String,
    },

    /// Provider reported a failure in an otherwise successful response
    #[error("An OpenAI error occurred: {message}")]
    ProviderError {
        message: String,
    },

    /// Anything else
    #[error("An unexpected error occurred: {message}")]
    UnexpectedError {
        message: String,
    },
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TranslationError::ProviderError {
                message: err.to_string(),
            }
        } else {
            TranslationError::ConnectionError {
                message: err.to_string(),
            }
        }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_status_message_includes_code_and_body() {
        let err = TranslationError::ApiStatusError {
            status: 401,
            body: r#"{"error":"bad key"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"OpenAI API returned an API Error: Status 401, Response: {"error":"bad key"}"#
        );
    }

    #[test]
    fn test_config_not_found_names_path() {
        let err = ConfigError::NotFound {
            path: PathBuf::from("/tmp/missing.ini"),
        };
        assert_eq!(err.to_string(), "Config file not found at /tmp/missing.ini");
    }
}
